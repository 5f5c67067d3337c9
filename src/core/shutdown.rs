//! Signal-driven shutdown coordination
//!
//! The first interrupt asks the running command to wind down (for a scan,
//! that means cancelling it and printing partial results). A second interrupt
//! exits the process immediately with status 130.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when the user interrupts the process
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the application
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    signal_count: Arc<AtomicUsize>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (shutdown_tx, shutdown_rx) = broadcast::channel(8);
        let coordinator = Self {
            shutdown_tx,
            signal_count: Arc::new(AtomicUsize::new(0)),
        };
        (coordinator, shutdown_rx)
    }

    pub fn trigger_shutdown(&self) {
        // no receivers left just means nothing is listening any more
        let _ = self.shutdown_tx.send(());
    }

    /// Record one received signal; true if the process should exit now
    fn note_signal(&self) -> bool {
        let previous = self.signal_count.fetch_add(1, Ordering::AcqRel);
        self.trigger_shutdown();
        previous >= 1
    }

    /// Run `future_fn` with signal handlers installed for its duration
    pub async fn guard<F, Fut, R, E>(future_fn: F) -> Result<R, E>
    where
        F: FnOnce(broadcast::Receiver<()>) -> Fut,
        Fut: std::future::Future<Output = Result<R, E>>,
    {
        let (coordinator, shutdown_rx) = Self::new();
        setup_signal_handlers(&coordinator);
        future_fn(shutdown_rx).await
    }
}

fn on_signal(coordinator: &ShutdownCoordinator, name: &str) {
    if coordinator.note_signal() {
        log::warn!("{} received again; exiting", name);
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
    log::info!("{} received; stopping (repeat to exit immediately)", name);
}

fn setup_signal_handlers(coordinator: &ShutdownCoordinator) {
    #[cfg(unix)]
    {
        // Let a closed stdout pipe end the process quietly
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }

        use tokio::signal::unix::{signal, SignalKind};
        let signals = [
            (SignalKind::interrupt(), "SIGINT"),
            (SignalKind::terminate(), "SIGTERM"),
            (SignalKind::hangup(), "SIGHUP"),
        ];

        for (kind, name) in signals {
            let coordinator = coordinator.clone();
            tokio::spawn(async move {
                match signal(kind) {
                    Ok(mut stream) => {
                        while stream.recv().await.is_some() {
                            on_signal(&coordinator, name);
                        }
                    }
                    Err(e) => log::debug!("Cannot listen for {}: {}", name, e),
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                on_signal(&coordinator, "Ctrl-C");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn test_shutdown_coordinator_trigger() {
        let (coordinator, mut rx) = ShutdownCoordinator::new();

        coordinator.trigger_shutdown();

        assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_signal_requests_exit() {
        let (coordinator, mut rx) = ShutdownCoordinator::new();
        assert!(!coordinator.note_signal());
        assert!(rx.recv().await.is_ok());
        assert!(coordinator.note_signal());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let (coordinator, mut rx) = ShutdownCoordinator::new();
        let clone = coordinator.clone();
        assert!(!clone.note_signal());
        assert!(rx.recv().await.is_ok());
        assert!(coordinator.note_signal());
    }

    #[tokio::test]
    async fn test_guard_runs_future() {
        let result = ShutdownCoordinator::guard(|mut shutdown_rx| async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(20)) => Ok::<i32, &str>(42),
                _ = shutdown_rx.recv() => Ok(-1),
            }
        })
        .await;

        assert_eq!(result, Ok(42));
    }
}
