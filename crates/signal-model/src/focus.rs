//! Head-pose samples and visual focus of attention (VFOA) categories.

use serde::{Deserialize, Serialize};

/// Where the subject's attention is, as classified from a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusCategory {
    /// Facing the screen with eyes open.
    Focused,
    /// Off-center but not turned away.
    Distracted,
    /// Turned away from the screen, or no face at all.
    Away,
}

impl FocusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Distracted => "distracted",
            Self::Away => "away",
        }
    }

    pub fn is_focused(&self) -> bool {
        matches!(self, Self::Focused)
    }
}

impl std::fmt::Display for FocusCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified pose for one frame.
///
/// Angles are in degrees and already clamped to the classifier's ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseSample {
    /// Up/down rotation; positive is looking down.
    pub pitch: f64,
    /// Left/right rotation.
    pub yaw: f64,
    /// Head tilt.
    pub roll: f64,
    /// Eye aspect ratio (eye height over width), `>= 0`.
    pub eye_openness: f64,
    /// Facing the screen with eyes open enough to read it.
    pub looking_at_screen: bool,
    pub category: FocusCategory,
}

impl PoseSample {
    /// The sentinel sample for a frame without a usable face.
    pub const NO_SIGNAL: PoseSample = PoseSample {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
        eye_openness: 0.0,
        looking_at_screen: false,
        category: FocusCategory::Away,
    };

    pub fn no_signal() -> Self {
        Self::NO_SIGNAL
    }

    pub fn is_no_signal(&self) -> bool {
        *self == Self::NO_SIGNAL
    }
}

/// Pose input for one engine update.
///
/// `Absent` means the pose collaborator produced nothing this frame; the
/// engine scores gaze and head pose as zero without touching history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Pose {
    Present(PoseSample),
    Absent,
}

impl Pose {
    pub fn sample(&self) -> Option<&PoseSample> {
        match self {
            Self::Present(sample) => Some(sample),
            Self::Absent => None,
        }
    }

    pub fn category(&self) -> Option<FocusCategory> {
        self.sample().map(|s| s.category)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl From<PoseSample> for Pose {
    fn from(sample: PoseSample) -> Self {
        Self::Present(sample)
    }
}

impl From<Option<PoseSample>> for Pose {
    fn from(sample: Option<PoseSample>) -> Self {
        sample.map_or(Self::Absent, Self::Present)
    }
}
