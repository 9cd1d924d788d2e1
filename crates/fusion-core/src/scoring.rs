//! Component scores and their weighted combination.
//!
//! Every function here is pure; the engine owns the state that feeds them.

use vigil_common::config::{HeadPosePenalty, LevelBands, ScoreWeights};
use vigil_signal_model::focus::PoseSample;
use vigil_signal_model::presence::FacePresenceSample;
use vigil_signal_model::score::AttentionLevel;

use crate::history::FocusCounts;

/// Gaze score with no history to go on. Missing history is not evidence
/// of inattention.
pub const NEUTRAL_GAZE_SCORE: u8 = 50;

/// Gaze score over a window of focus categories: focused frames count
/// 100, distracted 50, away 0.
pub fn gaze_score(window: FocusCounts) -> u8 {
    let total = window.total();
    if total == 0 {
        return NEUTRAL_GAZE_SCORE;
    }
    let points = 100 * window.focused + 50 * window.distracted;
    to_score(points as f64 / total as f64)
}

/// Head-pose score from the current frame's angles only.
pub fn head_pose_score(pose: &PoseSample, penalty: &HeadPosePenalty) -> u8 {
    let yaw = (100.0 - penalty.yaw * pose.yaw.abs()).max(0.0);
    let pitch = (100.0 - penalty.pitch * pose.pitch.abs()).max(0.0);
    let roll = (100.0 - penalty.roll * pose.roll.abs()).max(0.0);
    to_score((yaw + pitch + roll) / 3.0)
}

/// Face-presence score: 0 without a face, a standing penalty score with
/// several faces, otherwise the detector confidence as a percentage.
pub fn face_presence_score(face: &FacePresenceSample, multiple_faces_score: u8) -> u8 {
    if !face.present {
        0
    } else if face.multiple {
        multiple_faces_score.min(100)
    } else {
        to_score(face.confidence * 100.0)
    }
}

/// Objects score: `max(0, 100 - penalty * prohibited_count)`.
pub fn objects_score(prohibited_count: usize, penalty: u8) -> u8 {
    let deduction = (penalty as usize).saturating_mul(prohibited_count);
    100usize.saturating_sub(deduction) as u8
}

/// Weighted combination of the four components, rounded and clamped.
pub fn overall_score(
    gaze: u8,
    head_pose: u8,
    face_presence: u8,
    objects: u8,
    weights: &ScoreWeights,
) -> u8 {
    let weighted = weights.gaze * gaze as f64
        + weights.head_pose * head_pose as f64
        + weights.face_presence * face_presence as f64
        + weights.objects * objects as f64;
    to_score(weighted)
}

/// Map an overall score to its band. Lower bounds are inclusive.
pub fn attention_level(overall: u8, bands: &LevelBands) -> AttentionLevel {
    if overall >= bands.excellent {
        AttentionLevel::Excellent
    } else if overall >= bands.good {
        AttentionLevel::Good
    } else if overall >= bands.fair {
        AttentionLevel::Fair
    } else if overall >= bands.poor {
        AttentionLevel::Poor
    } else {
        AttentionLevel::Critical
    }
}

/// Round to the nearest integer in `[0, 100]`. NaN scores 0.
fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
