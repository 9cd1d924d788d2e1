//! Session-level aggregation of per-frame scores.
//!
//! The engine does not retain scores; callers that want a session report
//! feed each frame's [`AttentionScore`] into a [`SessionSummary`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vigil_signal_model::score::{AttentionLevel, AttentionScore};

/// Running totals over a session's scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames: usize,
    pub min_overall: Option<u8>,
    pub max_overall: Option<u8>,
    pub level_counts: BTreeMap<AttentionLevel, usize>,
    sums: [u64; 5],
}

/// Mean scores over a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeanScores {
    pub overall: f64,
    pub gaze: f64,
    pub head_pose: f64,
    pub face_presence: f64,
    pub objects: f64,
}

impl SessionSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, score: &AttentionScore) {
        self.frames += 1;
        self.min_overall = Some(self.min_overall.map_or(score.overall, |m| m.min(score.overall)));
        self.max_overall = Some(self.max_overall.map_or(score.overall, |m| m.max(score.overall)));
        *self.level_counts.entry(score.level).or_insert(0) += 1;

        let values = [
            score.overall,
            score.gaze,
            score.head_pose,
            score.face_presence,
            score.objects,
        ];
        for (sum, value) in self.sums.iter_mut().zip(values) {
            *sum += value as u64;
        }
    }

    /// Means over all recorded frames; `None` before the first frame.
    pub fn mean(&self) -> Option<MeanScores> {
        if self.frames == 0 {
            return None;
        }
        let n = self.frames as f64;
        let [overall, gaze, head_pose, face_presence, objects] = self.sums.map(|s| s as f64 / n);
        Some(MeanScores {
            overall,
            gaze,
            head_pose,
            face_presence,
            objects,
        })
    }

    pub fn level_count(&self, level: AttentionLevel) -> usize {
        self.level_counts.get(&level).copied().unwrap_or(0)
    }

    /// Fraction of frames at `level` or better.
    pub fn fraction_at_least(&self, level: AttentionLevel) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        // Levels are ordered best-first.
        let count: usize = self
            .level_counts
            .iter()
            .filter(|(l, _)| **l <= level)
            .map(|(_, c)| c)
            .sum();
        count as f64 / self.frames as f64
    }
}
