//! Violation events raised by the fusion engine.
//!
//! Events are immutable once created and are meant to be written to an
//! audit log as-is, so every field serializes with stable snake_case names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::focus::FocusCategory;

/// Millisecond timestamp carried by events.
pub type EventTimestampMs = u64;

/// What kind of condition triggered a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    GazeAway,
    MultipleFaces,
    NoFace,
    ProhibitedObject,
    ProlongedDistraction,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 5] = [
        Self::GazeAway,
        Self::MultipleFaces,
        Self::NoFace,
        Self::ProhibitedObject,
        Self::ProlongedDistraction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GazeAway => "gaze_away",
            Self::MultipleFaces => "multiple_faces",
            Self::NoFace => "no_face",
            Self::ProhibitedObject => "prohibited_object",
            Self::ProlongedDistraction => "prolonged_distraction",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured context attached to a violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViolationDetails {
    /// Length of the distraction run and the category that extended it.
    Streak {
        frames: u32,
        category: FocusCategory,
    },
    /// Number of faces in frame.
    FaceCount { count: u32 },
    /// The prohibited detection.
    Object { label: String, score: f64 },
}

/// A logged violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEvent {
    /// Unique within the engine that produced it.
    pub id: String,
    #[serde(rename = "t")]
    pub timestamp_ms: EventTimestampMs,
    pub kind: ViolationKind,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ViolationDetails>,
}

/// Aggregate counts over a violation log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationStats {
    pub total: usize,
    pub by_kind: BTreeMap<ViolationKind, usize>,
    pub by_severity: BTreeMap<Severity, usize>,
}

impl ViolationStats {
    /// Tally a sequence of events.
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a ViolationEvent>) -> Self {
        let mut stats = Self::default();
        for event in events {
            stats.total += 1;
            *stats.by_kind.entry(event.kind).or_insert(0) += 1;
            *stats.by_severity.entry(event.severity).or_insert(0) += 1;
        }
        stats
    }

    pub fn kind_count(&self, kind: ViolationKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: ViolationKind, severity: Severity) -> ViolationEvent {
        ViolationEvent {
            id: format!("v-{}", kind),
            timestamp_ms: 0,
            kind,
            severity,
            description: String::new(),
            details: None,
        }
    }

    #[test]
    fn test_event_json_format() {
        let event = ViolationEvent {
            id: "v-1".into(),
            timestamp_ms: 1_500,
            kind: ViolationKind::MultipleFaces,
            severity: Severity::High,
            description: "2 faces detected".into(),
            details: Some(ViolationDetails::FaceCount { count: 2 }),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"t\":1500"));
        assert!(json.contains("\"kind\":\"multiple_faces\""));
        assert!(json.contains("\"severity\":\"high\""));
        assert!(json.contains("\"type\":\"face_count\""));
    }

    #[test]
    fn test_stats_counts_by_kind_and_severity() {
        let events = vec![
            event(ViolationKind::NoFace, Severity::High),
            event(ViolationKind::NoFace, Severity::High),
            event(ViolationKind::ProlongedDistraction, Severity::Medium),
        ];
        let stats = ViolationStats::from_events(&events);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.kind_count(ViolationKind::NoFace), 2);
        assert_eq!(stats.kind_count(ViolationKind::GazeAway), 0);
        assert_eq!(stats.severity_count(Severity::Medium), 1);
        assert_eq!(stats.severity_count(Severity::Low), 0);
    }

    #[test]
    fn test_stats_serialize_with_string_keys() {
        let events = vec![event(ViolationKind::ProhibitedObject, Severity::High)];
        let json = serde_json::to_value(ViolationStats::from_events(&events)).unwrap();
        assert_eq!(json["by_kind"]["prohibited_object"], 1);
        assert_eq!(json["by_severity"]["high"], 1);
    }
}
