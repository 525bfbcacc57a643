//! Panel lifecycle service
//!
//! A restart is a signal to the server loop in `main`: the loop stops the
//! HTTP server gracefully, re-reads the settings and serves again. Each
//! restart bumps a generation counter on a watch channel that the loop
//! subscribes to.

use crate::error::{PanelError, PanelResult};
use crate::scheduler::Scheduler;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

/// Grace period between a restart request and the restart itself
pub const RESTART_GRACE: Duration = Duration::from_secs(3);

#[derive(Clone)]
pub struct PanelService {
    scheduler: Arc<dyn Scheduler>,
    restart_tx: Arc<watch::Sender<u64>>,
}

impl PanelService {
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        let (restart_tx, _) = watch::channel(0);
        Self {
            scheduler,
            restart_tx: Arc::new(restart_tx),
        }
    }

    /// Receiver that observes every restart (value = restart generation)
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.restart_tx.subscribe()
    }

    /// Schedule a panel restart `delay` from now and return immediately
    ///
    /// Fails when no server loop is subscribed to restarts.
    pub fn restart_panel(&self, delay: Duration) -> PanelResult<()> {
        if self.restart_tx.receiver_count() == 0 {
            return Err(PanelError::RestartUnavailable);
        }

        info!(delay_ms = delay.as_millis() as u64, "Panel restart scheduled");
        let restart_tx = self.restart_tx.clone();
        self.scheduler.schedule(
            delay,
            Box::pin(async move {
                restart_tx.send_modify(|generation| *generation += 1);
                info!("Panel restart signalled");
            }),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TokioScheduler;
    use tokio::time::Instant;

    #[test]
    fn test_restart_without_server_loop_fails() {
        let panel = PanelService::new(Arc::new(TokioScheduler));

        assert!(matches!(
            panel.restart_panel(RESTART_GRACE),
            Err(PanelError::RestartUnavailable)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_signalled_after_delay() {
        let panel = PanelService::new(Arc::new(TokioScheduler));
        let mut restarts = panel.subscribe();
        let start = Instant::now();

        panel.restart_panel(RESTART_GRACE).unwrap();
        restarts.changed().await.unwrap();

        assert!(start.elapsed() >= RESTART_GRACE);
        assert_eq!(*restarts.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_restart_bumps_generation() {
        let panel = PanelService::new(Arc::new(TokioScheduler));
        let mut restarts = panel.subscribe();

        panel.restart_panel(Duration::ZERO).unwrap();
        restarts.changed().await.unwrap();
        panel.restart_panel(Duration::ZERO).unwrap();
        restarts.changed().await.unwrap();

        assert_eq!(*restarts.borrow_and_update(), 2);
    }
}
