use std::sync::Arc;
use std::time::Duration;
use stubzone_application::use_cases::RefreshStubZonesUseCase;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Keeps the published stub-zone table in step with the backend.
///
/// The first refresh runs as soon as the job starts, since the table starts
/// out empty. After that it refreshes every `interval_secs` and whenever
/// [`trigger`](Self::trigger) fires (the binary wires this to SIGHUP).
/// A failed refresh keeps the previous table; the use case already logs it.
pub struct StubZoneRefreshJob {
    use_case: Arc<RefreshStubZonesUseCase>,
    interval_secs: u64,
    trigger: Arc<Notify>,
    shutdown: CancellationToken,
}

impl StubZoneRefreshJob {
    pub fn new(use_case: Arc<RefreshStubZonesUseCase>) -> Self {
        Self {
            use_case,
            interval_secs: 60,
            trigger: Arc::new(Notify::new()),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Handle for requesting an out-of-schedule refresh.
    pub fn trigger(&self) -> Arc<Notify> {
        self.trigger.clone()
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(interval_secs = self.interval_secs, "Starting stub zone refresh job");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("StubZoneRefreshJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        debug!("StubZoneRefreshJob: scheduled refresh");
                    }
                    _ = self.trigger.notified() => {
                        info!("StubZoneRefreshJob: refresh requested");
                    }
                }

                if let Ok(summary) = self.use_case.execute().await {
                    debug!(
                        zones = summary.zones,
                        upstreams = summary.upstreams,
                        skipped = summary.skipped,
                        "StubZoneRefreshJob: cycle completed"
                    );
                }
            }
        })
    }
}
