//! Per-frame signal classification.
//!
//! Maps head-pose angles and eye openness to a [`FocusCategory`]. Stateless
//! and deterministic: identical inputs always produce identical samples.
//!
//! # Rules
//!
//! 1. Angles are clamped to the configured ranges (the clamp is part of
//!    the angle's definition, not an error). NaN becomes 0.
//! 2. `looking_at_screen` iff `|yaw| < screen_yaw`, `|pitch| < screen_pitch`
//!    and `eye_openness > min_eye_openness`.
//! 3. Category, first match wins: looking at screen with
//!    `eye_openness > focused_eye_openness` is **focused**; `|yaw| > away_yaw`
//!    or `|pitch| > away_pitch` is **away**; anything else is **distracted**.
//! 4. No face at all yields the no-signal sample (category away).

use vigil_common::config::ClassifierConfig;
use vigil_common::error::VigilResult;
use vigil_signal_model::focus::{FocusCategory, PoseSample};
use vigil_signal_model::frame::RawPose;

use crate::landmarks::FaceObservation;

/// Stateless pose classifier.
#[derive(Debug, Clone)]
pub struct SignalClassifier {
    config: ClassifierConfig,
}

impl SignalClassifier {
    /// Create a classifier, rejecting invalid thresholds.
    pub fn new(config: ClassifierConfig) -> VigilResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a classifier with default thresholds.
    pub fn with_defaults() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify raw pose angles (degrees) and eye aspect ratio.
    pub fn classify(&self, pitch: f64, yaw: f64, roll: f64, eye_openness: f64) -> PoseSample {
        let cfg = &self.config;
        let pitch = clamp_angle(pitch, cfg.pitch_limit_deg);
        let yaw = clamp_angle(yaw, cfg.yaw_limit_deg);
        let roll = clamp_angle(roll, cfg.roll_limit_deg);
        let eye_openness = if eye_openness.is_finite() {
            eye_openness.max(0.0)
        } else {
            0.0
        };

        let looking_at_screen = yaw.abs() < cfg.screen_yaw_deg
            && pitch.abs() < cfg.screen_pitch_deg
            && eye_openness > cfg.min_eye_openness;

        let category = if looking_at_screen && eye_openness > cfg.focused_eye_openness {
            FocusCategory::Focused
        } else if yaw.abs() > cfg.away_yaw_deg || pitch.abs() > cfg.away_pitch_deg {
            FocusCategory::Away
        } else {
            FocusCategory::Distracted
        };

        PoseSample {
            pitch,
            yaw,
            roll,
            eye_openness,
            looking_at_screen,
            category,
        }
    }

    /// Classify a recorded pose; `None` (no face) yields the no-signal sample.
    pub fn classify_raw(&self, raw: Option<&RawPose>) -> PoseSample {
        match raw {
            Some(p) => self.classify(p.pitch, p.yaw, p.roll, p.eye_openness),
            None => PoseSample::no_signal(),
        }
    }

    /// Classify directly from face landmarks.
    ///
    /// No face, or landmarks too degenerate to estimate a pose, yields the
    /// no-signal sample.
    pub fn classify_landmarks(&self, face: Option<&FaceObservation>) -> PoseSample {
        let Some(face) = face else {
            return PoseSample::no_signal();
        };
        match face.landmarks.head_angles() {
            Some(angles) => self.classify(
                angles.pitch,
                angles.yaw,
                angles.roll,
                face.eye_openness(),
            ),
            None => {
                tracing::trace!("Degenerate face landmarks, treating frame as no-signal");
                PoseSample::no_signal()
            }
        }
    }
}

impl Default for SignalClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn clamp_angle(value: f64, limit: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-limit, limit)
    }
}
