//! Periodic reachability check.
//!
//! Checks once immediately, then every `interval`. Each result is
//! reported as [`SessionEvent::HealthChecked`]. The task is aborted on
//! [`HealthMonitor::stop`] and when the monitor is dropped, so no check
//! outlives the session that started it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::events::SessionEvent;
use crate::api::ChatBackend;

pub const DEFAULT_HEALTH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// One health check. A hang past `timeout` counts as offline.
pub async fn check_once(backend: &dyn ChatBackend, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, backend.check_health()).await {
        Ok(online) => online,
        Err(_) => {
            tracing::debug!("Health check timed out after {:?}", timeout);
            false
        }
    }
}

pub struct HealthMonitor {
    interval: Duration,
    check_timeout: Duration,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    pub fn new(interval: Duration, check_timeout: Duration) -> Self {
        Self {
            interval,
            check_timeout,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start polling. No-op if already running.
    pub fn start(&mut self, backend: Arc<dyn ChatBackend>, events: mpsc::UnboundedSender<SessionEvent>) {
        if self.is_running() {
            return;
        }

        let period = self.interval;
        let check_timeout = self.check_timeout;
        tracing::info!("Health monitor started (every {:?})", period);

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let online = check_once(backend.as_ref(), check_timeout).await;
                if events.send(SessionEvent::HealthChecked(online)).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::info!("Health monitor stopped");
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
