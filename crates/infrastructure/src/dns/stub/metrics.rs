use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct StubForwardMetrics {
    stub_forward_count: Arc<AtomicU64>,
}

impl StubForwardMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One per forward invocation, whatever the outcome.
    pub fn record_forward(&self) {
        self.stub_forward_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stub_forward_count(&self) -> u64 {
        self.stub_forward_count.load(Ordering::Relaxed)
    }
}
