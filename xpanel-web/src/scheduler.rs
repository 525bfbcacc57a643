//! Delayed task scheduling
//!
//! Fire-and-forget work (the delayed panel restart) goes through a
//! [`Scheduler`] instead of a raw `tokio::spawn`, so tests can substitute a
//! recording scheduler or run [`TokioScheduler`] under a paused clock.

use futures::future::BoxFuture;
use std::time::Duration;
use tracing::debug;

/// Unit of deferred work
pub type Task = BoxFuture<'static, ()>;

/// Runs tasks after a delay, detached from the caller
///
/// Scheduled tasks are neither cancellable nor awaited by the caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task);
}

/// Scheduler backed by the tokio runtime and clock
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        debug!(delay_ms = delay.as_millis() as u64, "Scheduling task");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}
