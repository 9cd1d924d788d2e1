//! Per-frame attention score.

use serde::{Deserialize, Serialize};

/// Qualitative band of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl AttentionLevel {
    pub const ALL: [AttentionLevel; 5] = [
        Self::Excellent,
        Self::Good,
        Self::Fair,
        Self::Poor,
        Self::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for AttentionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fused attention score for one frame. Every score is in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionScore {
    pub overall: u8,
    pub gaze: u8,
    pub head_pose: u8,
    pub face_presence: u8,
    pub objects: u8,
    pub level: AttentionLevel,
}

impl AttentionScore {
    /// Component scores in weight order: gaze, head pose, face presence, objects.
    pub fn components(&self) -> [u8; 4] {
        [self.gaze, self.head_pose, self.face_presence, self.objects]
    }
}
