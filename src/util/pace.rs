//! Politeness pacing between catalog calls.

use std::time::Duration;

use async_trait::async_trait;

/// Injectable inter-call delay so tests run without wall-clock sleeps.
///
/// This is a fixed courtesy interval toward the catalog host, not adaptive
/// backoff.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// Sleeps a fixed interval between calls.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPacer {
    delay: Duration,
}

impl IntervalPacer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Returns immediately. Test harness pacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPacer;

#[async_trait]
impl Pacer for NoopPacer {
    async fn pause(&self) {}
}
