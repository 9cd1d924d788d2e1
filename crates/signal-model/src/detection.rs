//! Object detections and the prohibited-item vocabulary.

use serde::{Deserialize, Serialize};

use crate::presence::{clamp_unit, BoundingBox};

/// A single labeled detection from the object detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    /// Detector score in `[0, 1]`.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    /// Whether the label matched the prohibited-item vocabulary.
    pub prohibited: bool,
}

impl DetectedObject {
    /// Build a detection, deciding `prohibited` against `vocabulary`.
    pub fn new(
        label: impl Into<String>,
        score: f64,
        bounding_box: Option<BoundingBox>,
        vocabulary: &ProhibitedVocabulary,
    ) -> Self {
        let label = label.into();
        let prohibited = vocabulary.matches(&label);
        Self {
            label,
            score: clamp_unit(score),
            bounding_box,
            prohibited,
        }
    }
}

/// Case-insensitive substring vocabulary of items not allowed in frame.
///
/// A label is prohibited if it contains any vocabulary entry, so
/// `"cell phone"` matches the entry `"phone"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProhibitedVocabulary {
    items: Vec<String>,
}

impl ProhibitedVocabulary {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items: Vec<String> = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        items.sort();
        items.dedup();
        Self { items }
    }

    pub fn matches(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.items.iter().any(|item| label.contains(item.as_str()))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Split detections into `(prohibited, allowed)`.
pub fn partition_prohibited(
    objects: &[DetectedObject],
) -> (Vec<&DetectedObject>, Vec<&DetectedObject>) {
    objects.iter().partition(|o| o.prohibited)
}
