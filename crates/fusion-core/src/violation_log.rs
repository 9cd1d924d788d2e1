//! Append-only, deduplicating violation log.

use vigil_common::clock::TimestampMs;
use vigil_signal_model::violation::{
    Severity, ViolationDetails, ViolationEvent, ViolationKind, ViolationStats,
};

/// Violation log with same-kind suppression.
///
/// Before a candidate is appended, the newest `dedup_lookback` entries are
/// scanned; if one has the same kind and is less than `dedup_window_ms`
/// old, the candidate is dropped. Suppression is silent.
#[derive(Debug, Clone)]
pub struct ViolationLog {
    entries: Vec<ViolationEvent>,
    dedup_window_ms: u64,
    dedup_lookback: usize,
    next_seq: u64,
}

impl ViolationLog {
    pub fn new(dedup_window_ms: u64, dedup_lookback: usize) -> Self {
        Self {
            entries: Vec::new(),
            dedup_window_ms,
            dedup_lookback,
            next_seq: 0,
        }
    }

    /// Whether a `kind` violation at `now` would be suppressed.
    pub fn is_duplicate(&self, kind: ViolationKind, now: TimestampMs) -> bool {
        self.entries
            .iter()
            .rev()
            .take(self.dedup_lookback)
            .any(|e| e.kind == kind && now.saturating_sub(e.timestamp_ms) < self.dedup_window_ms)
    }

    /// Append a violation unless it duplicates a recent one.
    ///
    /// Returns the appended event, or `None` if it was suppressed.
    pub fn record(
        &mut self,
        now: TimestampMs,
        kind: ViolationKind,
        severity: Severity,
        description: impl Into<String>,
        details: Option<ViolationDetails>,
    ) -> Option<&ViolationEvent> {
        if self.is_duplicate(kind, now) {
            tracing::trace!(%kind, now, "Suppressed duplicate violation");
            return None;
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let event = ViolationEvent {
            id: format!("{}-{}-{}", kind, now, seq),
            timestamp_ms: now,
            kind,
            severity,
            description: description.into(),
            details,
        };
        tracing::debug!(
            id = %event.id,
            %kind,
            %severity,
            "Violation raised: {}",
            event.description
        );

        self.entries.push(event);
        self.entries.last()
    }

    /// Events newest-first, optionally truncated to `limit`.
    pub fn list(&self, limit: Option<usize>) -> Vec<&ViolationEvent> {
        let limit = limit.unwrap_or(self.entries.len());
        self.entries.iter().rev().take(limit).collect()
    }

    /// Events oldest-first.
    pub fn events(&self) -> &[ViolationEvent] {
        &self.entries
    }

    pub fn stats(&self) -> ViolationStats {
        ViolationStats::from_events(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every event. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
