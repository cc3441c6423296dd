//! Timer abstraction for animated components.
//!
//! Components await [`Scheduler::delay`] between steps instead of calling the
//! runtime timer directly, so tests can count ticks or skip the wait.

use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

/// Source of delays between component steps.
#[async_trait]
pub trait Scheduler: Send + Sync + Debug {
    /// Suspend the calling task for `duration`.
    async fn delay(&self, duration: Duration);
}

/// Scheduler backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait]
impl Scheduler for TokioScheduler {
    async fn delay(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Scheduler that returns immediately and records every requested delay.
#[derive(Debug, Clone, Default)]
pub struct CountingScheduler {
    ticks: Arc<AtomicUsize>,
    total_ms: Arc<AtomicUsize>,
}

impl CountingScheduler {
    /// Create a scheduler with zero recorded ticks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of delays requested so far.
    #[must_use]
    pub fn ticks(&self) -> usize {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Sum of all requested delays.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.total_ms.load(Ordering::SeqCst) as u64)
    }
}

#[async_trait]
impl Scheduler for CountingScheduler {
    async fn delay(&self, duration: Duration) {
        self.ticks.fetch_add(1, Ordering::SeqCst);
        let ms = usize::try_from(duration.as_millis()).unwrap_or(usize::MAX);
        self.total_ms.fetch_add(ms, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }
}
