// Generation statistics: request counts, debounce collapses, payload sizes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub requested: u64,
    pub collapsed: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub bytes_received: u64,
    pub last_duration_ms: u64,
}

pub struct GenerationStats {
    requested: AtomicU64,
    collapsed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    bytes_received: AtomicU64,
    last_duration_ms: AtomicU64,
}

impl GenerationStats {
    pub fn new() -> Self {
        Self {
            requested: AtomicU64::new(0),
            collapsed: AtomicU64::new(0),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            last_duration_ms: AtomicU64::new(0),
        }
    }

    pub fn record_requested(&self) {
        self.requested.fetch_add(1, Ordering::Relaxed);
    }

    /// A request whose debounce timer was superseded by a later call.
    pub fn record_collapsed(&self) {
        self.collapsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_success(&self, bytes: u64, duration: Duration) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
        self.last_duration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_failure(&self, duration: Duration) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        self.last_duration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requested: self.requested.load(Ordering::Relaxed),
            collapsed: self.collapsed.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            last_duration_ms: self.last_duration_ms.load(Ordering::Relaxed),
        }
    }
}

impl Default for GenerationStats {
    fn default() -> Self {
        Self::new()
    }
}
