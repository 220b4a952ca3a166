//! Graceful shutdown
//!
//! A service stops on Ctrl+C, on SIGTERM (Unix), or when its
//! [`ShutdownTrigger`] fires. The trigger lets tests and embedding code stop a
//! server without sending signals.

use tokio::sync::watch;
use tracing::{info, warn};

/// Handle that requests shutdown; cheap to clone
#[derive(Debug, Clone)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    pub fn trigger(&self) {
        // receivers may already be gone
        let _ = self.tx.send(true);
    }
}

/// Future side of the shutdown channel
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve on the first of: trigger, Ctrl+C, SIGTERM
    pub async fn wait(self) {
        tokio::select! {
            _ = self.triggered() => info!("Shutdown requested"),
            _ = os_signal() => info!("Shutdown signal received"),
        }
    }

    /// Resolve only when the trigger fires
    pub async fn triggered(mut self) {
        while !*self.rx.borrow_and_update() {
            if self.rx.changed().await.is_err() {
                // every trigger dropped without firing
                std::future::pending::<()>().await;
            }
        }
    }
}

pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

/// Wait for Ctrl+C or, on Unix, SIGTERM
pub async fn os_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term_signal = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                warn!(
                    "Failed to install SIGTERM handler: {}. Service will only respond to Ctrl+C",
                    e
                );
                None
            },
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                match term_signal {
                    Some(mut sig) => { sig.recv().await; },
                    None => std::future::pending::<()>().await,
                }
            } => {},
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_resolves_signal() {
        let (trigger, signal) = shutdown_channel();
        let waiter = tokio::spawn(signal.wait());

        trigger.clone().trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_trigger_before_wait() {
        let (trigger, signal) = shutdown_channel();
        trigger.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.triggered())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_trigger_does_not_resolve() {
        let (trigger, signal) = shutdown_channel();
        drop(trigger);
        let result = tokio::time::timeout(Duration::from_millis(50), signal.triggered()).await;
        assert!(result.is_err());
    }
}
