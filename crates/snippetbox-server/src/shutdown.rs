//! Graceful shutdown.
//!
//! [`ShutdownSignal`] tells the accept loop and every open connection to
//! stop; [`ConnectionTracker`] lets the server wait for in-flight
//! connections to finish before it returns.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};

/// A cloneable, one-shot shutdown flag.
///
/// # Example
///
/// ```rust
/// use snippetbox_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let observer = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(observer.is_shutdown());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Creates a signal that triggers on SIGTERM or SIGINT (Ctrl+C
    /// elsewhere). Must be called inside a tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });
        signal
    }

    /// Triggers shutdown. Idempotent.
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }

    /// Returns `true` once shutdown has been triggered.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.sender.borrow()
    }

    /// Completes when shutdown is triggered, immediately if it already was.
    pub async fn recv(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = receiver.wait_for(|triggered| *triggered).await;
    }
}

/// Waits for SIGTERM or SIGINT (Ctrl+C on other platforms).
///
/// If the handlers cannot be installed the failure is logged and the future
/// never completes, so only an explicit trigger shuts the server down.
async fn wait_for_os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::error!(error = %e, "failed to install signal handlers");
                    return std::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "initiating graceful shutdown"),
            _ = sigint.recv() => tracing::info!(signal = "SIGINT", "initiating graceful shutdown"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            return std::future::pending().await;
        }
        tracing::info!(signal = "ctrl-c", "initiating graceful shutdown");
    }
}

/// Counts open connections.
///
/// ```rust
/// use snippetbox_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    active: AtomicUsize,
    idle: Notify,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection until the returned token drops.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        ConnectionToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Returns the number of open connections.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Completes once no connection is open.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.active_connections() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Held for the lifetime of one connection.
#[derive(Debug)]
pub struct ConnectionToken {
    inner: Arc<TrackerInner>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        if self.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_is_idempotent_and_shared() {
        let signal = ShutdownSignal::new();
        let clone = signal.clone();
        assert!(!clone.is_shutdown());

        signal.trigger();
        signal.trigger();
        assert!(clone.is_shutdown());
    }

    #[tokio::test]
    async fn test_recv_completes_when_triggered() {
        let signal = ShutdownSignal::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger();
        });

        tokio::time::timeout(Duration::from_secs(1), signal.recv())
            .await
            .expect("recv should complete");
    }

    #[tokio::test]
    async fn test_recv_after_trigger_is_immediate() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .expect("recv should complete immediately");
    }

    #[test]
    fn test_tracker_counts_tokens() {
        let tracker = ConnectionTracker::new();
        let first = tracker.acquire();
        let second = tracker.acquire();
        assert_eq!(tracker.active_connections(), 2);

        drop(first);
        assert_eq!(tracker.active_connections(), 1);
        drop(second);
        assert_eq!(tracker.active_connections(), 0);
    }

    #[tokio::test]
    async fn test_wait_idle_without_connections() {
        let tracker = ConnectionTracker::new();
        tokio::time::timeout(Duration::from_millis(10), tracker.wait_idle())
            .await
            .expect("no connections, no wait");
    }

    #[tokio::test]
    async fn test_wait_idle_after_last_token_drops() {
        let tracker = ConnectionTracker::new();
        let token = tracker.acquire();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(token);
        });

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait should complete")
            .expect("task should not panic");
    }
}
