//! Quota monitor
//!
//! Keeps the last known quota snapshot for the submit guard and refreshes
//! it from the backend, either on demand or on a timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chat_core::QuotaSnapshot;
use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceResult;
use crate::notice::{Notice, NoticeBus};
use crate::services::QuotaSource;

pub struct QuotaMonitor {
    source: Arc<dyn QuotaSource>,
    snapshot: RwLock<Option<QuotaSnapshot>>,
    warning_percent: u32,
    warned: AtomicBool,
    notices: Option<NoticeBus>,
}

impl QuotaMonitor {
    pub fn new(source: Arc<dyn QuotaSource>, warning_percent: u32) -> Self {
        Self {
            source,
            snapshot: RwLock::new(None),
            warning_percent,
            warned: AtomicBool::new(false),
            notices: None,
        }
    }

    pub fn with_notices(mut self, notices: NoticeBus) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Last known snapshot, `None` before the first refresh.
    pub fn snapshot(&self) -> Option<QuotaSnapshot> {
        self.snapshot.read().clone()
    }

    /// Unknown quota does not block submits.
    pub fn is_exhausted(&self) -> bool {
        self.snapshot
            .read()
            .as_ref()
            .is_some_and(QuotaSnapshot::is_exhausted)
    }

    /// Install a snapshot. Returns the near-limit notice the first time the
    /// warning band is entered; dropping back below it re-arms the warning.
    pub fn set_snapshot(&self, snapshot: QuotaSnapshot) -> Option<Notice> {
        let percentage = snapshot.percentage();
        let near_limit = snapshot.is_near_limit(self.warning_percent);
        let remaining = snapshot.remaining();
        *self.snapshot.write() = Some(snapshot);

        if percentage < self.warning_percent {
            self.warned.store(false, Ordering::Relaxed);
            return None;
        }
        if !near_limit || self.warned.swap(true, Ordering::Relaxed) {
            return None;
        }

        tracing::info!(percentage, remaining, "quota near daily limit");
        let notice = Notice::QuotaNearLimit {
            percentage,
            remaining,
        };
        self.emit(notice.clone());
        Some(notice)
    }

    /// Fetch a fresh snapshot from the backend.
    pub async fn refresh(&self) -> ServiceResult<Option<Notice>> {
        let snapshot = self.source.get().await?;
        tracing::debug!(
            used_today = snapshot.used_today,
            daily_limit = snapshot.daily_limit,
            "quota refreshed"
        );
        Ok(self.set_snapshot(snapshot))
    }

    pub(crate) fn emit(&self, notice: Notice) {
        if let Some(bus) = &self.notices {
            bus.emit(notice);
        }
    }

    /// Refresh every `interval` until `cancel` fires. Errors are logged and
    /// the previous snapshot is kept.
    pub fn spawn_polling(self: Arc<Self>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!("quota polling stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(err) = self.refresh().await {
                            tracing::warn!("quota refresh failed: {}", err);
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::MockQuotaSource;

    fn monitor_with(source: MockQuotaSource) -> QuotaMonitor {
        QuotaMonitor::new(Arc::new(source), 80)
    }

    #[test]
    fn test_unknown_quota_is_not_exhausted() {
        let monitor = monitor_with(MockQuotaSource::new());
        assert!(monitor.snapshot().is_none());
        assert!(!monitor.is_exhausted());
    }

    #[test]
    fn test_near_limit_notice_fires_once() {
        let (bus, mut rx) = NoticeBus::new(8);
        let monitor = monitor_with(MockQuotaSource::new()).with_notices(bus);

        assert!(monitor.set_snapshot(QuotaSnapshot::new(500, 1000)).is_none());
        assert!(matches!(
            monitor.set_snapshot(QuotaSnapshot::new(850, 1000)),
            Some(Notice::QuotaNearLimit { percentage: 85, remaining: 150 })
        ));
        assert!(monitor.set_snapshot(QuotaSnapshot::new(900, 1000)).is_none());
        assert!(monitor.set_snapshot(QuotaSnapshot::new(1000, 1000)).is_none());
        assert!(monitor.is_exhausted());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_warning_rearms_after_reset() {
        let monitor = monitor_with(MockQuotaSource::new());
        assert!(monitor.set_snapshot(QuotaSnapshot::new(850, 1000)).is_some());
        assert!(monitor.set_snapshot(QuotaSnapshot::new(0, 1000)).is_none());
        assert!(monitor.set_snapshot(QuotaSnapshot::new(810, 1000)).is_some());
    }

    #[tokio::test]
    async fn test_refresh_keeps_snapshot_on_error() {
        let mut source = MockQuotaSource::new();
        let mut seq = mockall::Sequence::new();
        source
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(QuotaSnapshot::new(10, 100)));
        source
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ServiceError::Network("offline".to_string())));
        let monitor = monitor_with(source);

        monitor.refresh().await.unwrap();
        assert!(monitor.refresh().await.is_err());
        assert_eq!(monitor.snapshot(), Some(QuotaSnapshot::new(10, 100)));
    }

    #[tokio::test]
    async fn test_polling_stops_on_cancel() {
        let mut source = MockQuotaSource::new();
        source
            .expect_get()
            .returning(|| Ok(QuotaSnapshot::new(1, 100)));
        let monitor = Arc::new(monitor_with(source));
        let cancel = CancellationToken::new();

        let handle = Arc::clone(&monitor).spawn_polling(Duration::from_millis(10), cancel.clone());
        while monitor.snapshot().is_none() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(monitor.snapshot().map(|s| s.used_today), Some(1));
    }
}
