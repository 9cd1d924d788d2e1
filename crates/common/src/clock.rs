//! Time sources for violation timestamps.
//!
//! Business logic never reads the wall clock directly. Everything that
//! needs "now" takes a [`Clock`], so tests and recorded-session replays
//! can drive the dedup window deterministically instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Milliseconds since the Unix epoch (or since an arbitrary replay origin).
pub type TimestampMs = u64;

/// A source of millisecond timestamps.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> TimestampMs;
}

/// Wall-clock time source backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        // Pre-epoch system clocks report 0 rather than wrapping.
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// A manually driven clock.
///
/// Clones share the same underlying instant, so a caller can hand one
/// handle to an engine and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    pub fn new(start_ms: TimestampMs) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Jump to an absolute time.
    pub fn set_ms(&self, ms: TimestampMs) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Move forward by `delta_ms`.
    pub fn advance_ms(&self, delta_ms: u64) {
        self.now.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> TimestampMs {
        (**self).now_ms()
    }
}

/// Convert a millisecond timestamp to an RFC 3339 string for display.
pub fn format_timestamp_ms(ms: TimestampMs) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}
