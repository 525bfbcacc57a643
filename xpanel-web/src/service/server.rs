//! Host status queries

use std::io;
use xpanel_common::sys::{self, ProcNet, Protocol};

/// Source of live connection counts
pub trait ConnectionCounter: Send + Sync {
    fn count(&self, protocol: Protocol) -> io::Result<usize>;
}

/// Counts connections of the host the panel runs on
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConnectionCounter;

impl ConnectionCounter for SystemConnectionCounter {
    fn count(&self, protocol: Protocol) -> io::Result<usize> {
        match protocol {
            Protocol::Tcp => sys::count_tcp(),
            Protocol::Udp => sys::count_udp(),
        }
    }
}

impl ConnectionCounter for ProcNet {
    fn count(&self, protocol: Protocol) -> io::Result<usize> {
        ProcNet::count(self, protocol)
    }
}
