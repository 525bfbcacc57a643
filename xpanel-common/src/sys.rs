//! Host connection counting
//!
//! Counts entries in the kernel's live socket tables. On Linux these are the
//! `/proc/net/{tcp,tcp6,udp,udp6}` files: one header line, then one line per
//! socket. IPv4 and IPv6 tables are summed.
//!
//! Errors from the OS are returned unchanged: no retry, no partial count.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Transport protocol whose connection table is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }

    /// (IPv4 table, IPv6 table) file names under `/proc/net`
    fn tables(self) -> (&'static str, &'static str) {
        match self {
            Protocol::Tcp => ("tcp", "tcp6"),
            Protocol::Udp => ("udp", "udp6"),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader for procfs socket tables
#[derive(Debug, Clone)]
pub struct ProcNet {
    root: PathBuf,
}

impl Default for ProcNet {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/proc/net"),
        }
    }
}

impl ProcNet {
    /// Read tables from `root` instead of `/proc/net`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Number of sockets of `protocol` across the IPv4 and IPv6 tables
    ///
    /// The IPv6 table is absent on kernels built without IPv6 and then
    /// counts as zero. A missing IPv4 table is an error.
    pub fn count(&self, protocol: Protocol) -> io::Result<usize> {
        let (v4, v6) = protocol.tables();
        let v4_count = count_table(&self.root.join(v4))?;
        let v6_count = match count_table(&self.root.join(v6)) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e),
        };
        Ok(v4_count + v6_count)
    }
}

fn count_table(path: &Path) -> io::Result<usize> {
    let file = File::open(path)?;
    count_entries(BufReader::new(file))
}

/// Count socket lines in a procfs table, skipping the header line
pub fn count_entries<R: BufRead>(reader: R) -> io::Result<usize> {
    let mut count = 0;
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line_num == 0 || line.trim().is_empty() {
            continue;
        }
        count += 1;
    }
    Ok(count)
}

/// Count live connections of `protocol` on this host
#[cfg(target_os = "linux")]
pub fn count_connections(protocol: Protocol) -> io::Result<usize> {
    ProcNet::default().count(protocol)
}

/// Count live connections of `protocol` on this host
#[cfg(not(target_os = "linux"))]
pub fn count_connections(protocol: Protocol) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{} connection table is not available on this platform", protocol),
    ))
}

/// Number of active TCP connections
pub fn count_tcp() -> io::Result<usize> {
    count_connections(Protocol::Tcp)
}

/// Number of active UDP sockets
pub fn count_udp() -> io::Result<usize> {
    count_connections(Protocol::Udp)
}
