//! The fusion & violation engine.
//!
//! A caller-owned state machine, stepped once per frame:
//!
//! 1. **History:** push the pose's focus category (bounded FIFO) and track
//!    the run of consecutive non-focused frames. A run at or past the
//!    threshold raises `prolonged_distraction`.
//! 2. **Gaze:** average of the newest history window (focused 100,
//!    distracted 50, away 0); neutral 50 with no history.
//! 3. **Head pose:** per-axis linear penalties on the current angles.
//! 4. **Face presence:** 0 and `no_face` without a face; a standing score
//!    and `multiple_faces` with several; otherwise detector confidence.
//! 5. **Objects:** 100 minus a penalty per prohibited detection, each
//!    raising `prohibited_object`.
//! 6. **Overall:** weighted sum of the four components, then a level band.
//!
//! Every violation passes through the log's dedup policy. `update` never
//! fails: degraded input degrades the score, it does not stop the session.
//!
//! The engine is single-threaded and not reentrant; each exam session owns
//! its own instance.

use vigil_common::clock::{Clock, SystemClock, TimestampMs};
use vigil_common::config::EngineConfig;
use vigil_common::error::VigilResult;
use vigil_signal_model::detection::{partition_prohibited, DetectedObject};
use vigil_signal_model::focus::{FocusCategory, Pose};
use vigil_signal_model::presence::FacePresenceSample;
use vigil_signal_model::score::AttentionScore;
use vigil_signal_model::violation::{
    Severity, ViolationDetails, ViolationEvent, ViolationKind, ViolationStats,
};

use crate::history::FocusHistory;
use crate::scoring;
use crate::violation_log::ViolationLog;

/// Result of one engine step: the score plus the violations this frame added.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAssessment {
    pub score: AttentionScore,
    pub violations: Vec<ViolationEvent>,
}

/// Stateful fusion engine for one monitoring session.
#[derive(Debug)]
pub struct FusionEngine<C: Clock = SystemClock> {
    config: EngineConfig,
    clock: C,
    history: FocusHistory,
    distraction_streak: u32,
    log: ViolationLog,
}

impl FusionEngine<SystemClock> {
    /// Create an engine on the wall clock, rejecting invalid configuration.
    pub fn new(config: EngineConfig) -> VigilResult<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Create an engine with default configuration on the wall clock.
    pub fn with_defaults() -> Self {
        Self::build(EngineConfig::default(), SystemClock)
    }
}

impl<C: Clock> FusionEngine<C> {
    /// Create an engine with an injected time source.
    pub fn with_clock(config: EngineConfig, clock: C) -> VigilResult<Self> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: EngineConfig, clock: C) -> Self {
        Self {
            history: FocusHistory::new(config.history_capacity),
            log: ViolationLog::new(config.dedup_window_ms, config.dedup_lookback),
            distraction_streak: 0,
            config,
            clock,
        }
    }

    /// Process one frame and return its attention score.
    pub fn update(
        &mut self,
        pose: Pose,
        face: &FacePresenceSample,
        objects: &[DetectedObject],
    ) -> AttentionScore {
        self.assess(pose, face, objects).score
    }

    /// Process one frame, returning the score and any newly logged violations.
    pub fn assess(
        &mut self,
        pose: Pose,
        face: &FacePresenceSample,
        objects: &[DetectedObject],
    ) -> FrameAssessment {
        let now = self.clock.now_ms();
        let logged_before = self.log.len();

        if let Some(category) = pose.category() {
            self.track_focus(now, category);
        }

        let (gaze, head_pose) = match pose.sample() {
            Some(sample) => (
                scoring::gaze_score(self.history.recent_counts(self.config.gaze_window)),
                scoring::head_pose_score(sample, &self.config.head_pose_penalty),
            ),
            None => (0, 0),
        };

        let face_presence = self.evaluate_face(now, face);
        let objects_score = self.evaluate_objects(now, objects);

        let overall = scoring::overall_score(
            gaze,
            head_pose,
            face_presence,
            objects_score,
            &self.config.weights,
        );
        let score = AttentionScore {
            overall,
            gaze,
            head_pose,
            face_presence,
            objects: objects_score,
            level: scoring::attention_level(overall, &self.config.bands),
        };

        let violations = self.log.events()[logged_before..].to_vec();
        tracing::trace!(
            overall,
            gaze,
            head_pose,
            face_presence,
            objects = objects_score,
            new_violations = violations.len(),
            "Frame scored"
        );

        FrameAssessment { score, violations }
    }

    /// Log a violation raised outside the per-frame rules (for example by an
    /// external gaze tracker), subject to the same dedup policy.
    ///
    /// Returns `true` if the event was appended.
    pub fn report_violation(
        &mut self,
        kind: ViolationKind,
        severity: Severity,
        description: impl Into<String>,
        details: Option<ViolationDetails>,
    ) -> bool {
        let now = self.clock.now_ms();
        self.log
            .record(now, kind, severity, description, details)
            .is_some()
    }

    /// Logged violations newest-first, optionally truncated to `limit`.
    pub fn list_violations(&self, limit: Option<usize>) -> Vec<&ViolationEvent> {
        self.log.list(limit)
    }

    /// Violation counts by kind and severity.
    pub fn stats(&self) -> ViolationStats {
        self.log.stats()
    }

    /// Reset history, streak, and the violation log for a new session.
    pub fn clear(&mut self) {
        tracing::info!(
            violations = self.log.len(),
            history = self.history.len(),
            "Clearing session state"
        );
        self.history.clear();
        self.distraction_streak = 0;
        self.log.clear();
    }

    pub fn history(&self) -> &FocusHistory {
        &self.history
    }

    /// Consecutive non-focused frames so far.
    pub fn distraction_streak(&self) -> u32 {
        self.distraction_streak
    }

    pub fn violation_log(&self) -> &ViolationLog {
        &self.log
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn track_focus(&mut self, now: TimestampMs, category: FocusCategory) {
        self.history.push(category);

        if category.is_focused() {
            self.distraction_streak = 0;
            return;
        }

        self.distraction_streak = self.distraction_streak.saturating_add(1);
        if self.distraction_streak < self.config.streak_threshold {
            return;
        }

        let frames = self.distraction_streak;
        let raised = self
            .log
            .record(
                now,
                ViolationKind::ProlongedDistraction,
                Severity::Medium,
                format!("Attention off screen for {frames} consecutive frames ({category})"),
                Some(ViolationDetails::Streak { frames, category }),
            )
            .is_some();

        if raised && self.config.reset_streak_on_violation {
            self.distraction_streak = 0;
        }
    }

    fn evaluate_face(&mut self, now: TimestampMs, face: &FacePresenceSample) -> u8 {
        if !face.present {
            self.log.record(
                now,
                ViolationKind::NoFace,
                Severity::High,
                "No face detected in frame",
                None,
            );
        } else if face.multiple {
            self.log.record(
                now,
                ViolationKind::MultipleFaces,
                Severity::High,
                format!("{} faces detected in frame", face.face_count),
                Some(ViolationDetails::FaceCount {
                    count: face.face_count,
                }),
            );
        }
        scoring::face_presence_score(face, self.config.multiple_faces_score)
    }

    fn evaluate_objects(&mut self, now: TimestampMs, objects: &[DetectedObject]) -> u8 {
        let (prohibited, _allowed) = partition_prohibited(objects);
        for object in &prohibited {
            self.log.record(
                now,
                ViolationKind::ProhibitedObject,
                Severity::High,
                format!(
                    "Prohibited object detected: {} ({:.0}% confidence)",
                    object.label,
                    object.score * 100.0
                ),
                Some(ViolationDetails::Object {
                    label: object.label.clone(),
                    score: object.score,
                }),
            );
        }
        scoring::objects_score(prohibited.len(), self.config.object_penalty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_common::clock::ManualClock;
    use vigil_common::config::ScoreWeights;
    use vigil_signal_model::detection::ProhibitedVocabulary;
    use vigil_signal_model::focus::PoseSample;
    use vigil_signal_model::score::AttentionLevel;

    use crate::classifier::SignalClassifier;

    fn engine() -> (FusionEngine<ManualClock>, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let engine =
            FusionEngine::with_clock(EngineConfig::default(), clock.clone()).unwrap();
        (engine, clock)
    }

    fn focused() -> Pose {
        Pose::Present(SignalClassifier::with_defaults().classify(0.0, 0.0, 0.0, 0.3))
    }

    fn distracted() -> Pose {
        Pose::Present(SignalClassifier::with_defaults().classify(0.0, 25.0, 0.0, 0.3))
    }

    fn away() -> Pose {
        Pose::Present(PoseSample::no_signal())
    }

    fn one_face() -> FacePresenceSample {
        FacePresenceSample::single(1.0)
    }

    fn objects(labels: &[&str]) -> Vec<DetectedObject> {
        let vocab = ProhibitedVocabulary::new(["phone", "book"]);
        labels
            .iter()
            .map(|l| DetectedObject::new(*l, 0.9, None, &vocab))
            .collect()
    }

    #[test]
    fn test_all_focused_is_excellent() {
        let (mut engine, clock) = engine();
        let mut score = None;
        for _ in 0..10 {
            score = Some(engine.update(focused(), &one_face(), &[]));
            clock.advance_ms(33);
        }
        let score = score.unwrap();
        assert_eq!(score.overall, 100);
        assert_eq!(score.level, AttentionLevel::Excellent);
        assert!(engine.list_violations(None).is_empty());
    }

    #[test]
    fn test_absent_pose_and_face() {
        let (mut engine, _clock) = engine();
        let score = engine.update(Pose::Absent, &FacePresenceSample::absent(), &[]);
        assert_eq!(score.gaze, 0);
        assert_eq!(score.head_pose, 0);
        assert_eq!(score.face_presence, 0);
        assert_eq!(score.objects, 100);
        assert_eq!(score.overall, 15);
        assert_eq!(score.level, AttentionLevel::Critical);

        let violations = engine.list_violations(None);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::NoFace);
        assert_eq!(violations[0].severity, Severity::High);
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_absent_pose_leaves_streak_untouched() {
        let (mut engine, _clock) = engine();
        engine.update(distracted(), &one_face(), &[]);
        engine.update(Pose::Absent, &one_face(), &[]);
        assert_eq!(engine.distraction_streak(), 1);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_gaze_uses_newest_window() {
        let (mut engine, _clock) = engine();
        for _ in 0..5 {
            engine.update(away(), &one_face(), &[]);
        }
        for _ in 0..5 {
            engine.update(distracted(), &one_face(), &[]);
        }
        let score = engine.update(focused(), &one_face(), &[]);
        // Window = 4 away, 5 distracted, 1 focused: (250 + 100) / 10 = 35
        assert_eq!(score.gaze, 35);
    }

    #[test]
    fn test_first_frame_gaze_counts_itself() {
        let (mut engine, _clock) = engine();
        let score = engine.update(distracted(), &one_face(), &[]);
        assert_eq!(score.gaze, 50);
        let score = engine.update(focused(), &one_face(), &[]);
        assert_eq!(score.gaze, 75);
    }

    #[test]
    fn test_prolonged_distraction_raised_once_per_window() {
        let (mut engine, clock) = engine();
        for i in 0..30 {
            let assessment = engine.assess(distracted(), &one_face(), &[]);
            let raised = assessment
                .violations
                .iter()
                .filter(|v| v.kind == ViolationKind::ProlongedDistraction)
                .count();
            assert_eq!(raised, usize::from(i == 9), "frame {i}");
            clock.advance_ms(33);
        }
        assert_eq!(engine.distraction_streak(), 30);
        assert_eq!(engine.stats().kind_count(ViolationKind::ProlongedDistraction), 1);

        // The streak never resets, so the next frame after the window re-raises.
        clock.advance_ms(2_000);
        let assessment = engine.assess(distracted(), &one_face(), &[]);
        assert_eq!(assessment.violations.len(), 1);
        assert_eq!(
            assessment.violations[0].details,
            Some(ViolationDetails::Streak {
                frames: 31,
                category: FocusCategory::Distracted
            })
        );
    }

    #[test]
    fn test_focused_frame_resets_streak() {
        let (mut engine, _clock) = engine();
        for _ in 0..9 {
            engine.update(away(), &one_face(), &[]);
        }
        assert_eq!(engine.distraction_streak(), 9);
        engine.update(focused(), &one_face(), &[]);
        assert_eq!(engine.distraction_streak(), 0);
        engine.update(away(), &one_face(), &[]);
        assert_eq!(engine.distraction_streak(), 1);
        assert!(engine.list_violations(None).is_empty());
    }

    #[test]
    fn test_reset_streak_on_violation_option() {
        let clock = ManualClock::new(0);
        let config = EngineConfig {
            reset_streak_on_violation: true,
            ..Default::default()
        };
        let mut engine = FusionEngine::with_clock(config, clock.clone()).unwrap();
        for _ in 0..10 {
            engine.update(away(), &one_face(), &[]);
        }
        assert_eq!(engine.distraction_streak(), 0);
        assert_eq!(engine.stats().total, 1);
    }

    #[test]
    fn test_multiple_faces() {
        let (mut engine, _clock) = engine();
        let face = FacePresenceSample::from_count(2, 0.95, None);
        let assessment = engine.assess(focused(), &face, &[]);
        assert_eq!(assessment.score.face_presence, 30);
        assert_eq!(assessment.violations.len(), 1);
        assert_eq!(assessment.violations[0].kind, ViolationKind::MultipleFaces);
        assert_eq!(
            assessment.violations[0].details,
            Some(ViolationDetails::FaceCount { count: 2 })
        );
    }

    #[test]
    fn test_face_confidence_drives_score() {
        let (mut engine, _clock) = engine();
        let score = engine.update(focused(), &FacePresenceSample::single(0.826), &[]);
        assert_eq!(score.face_presence, 83);
    }

    #[test]
    fn test_prohibited_objects() {
        let (mut engine, clock) = engine();
        let score = engine.update(focused(), &one_face(), &objects(&["cup", "person"]));
        assert_eq!(score.objects, 100);
        assert!(engine.list_violations(None).is_empty());

        clock.advance_ms(100);
        let assessment = engine.assess(focused(), &one_face(), &objects(&["cell phone", "cup"]));
        assert_eq!(assessment.score.objects, 70);
        assert_eq!(assessment.violations.len(), 1);
        assert_eq!(
            assessment.violations[0].details,
            Some(ViolationDetails::Object {
                label: "cell phone".into(),
                score: 0.9
            })
        );

        clock.advance_ms(100);
        let many = objects(&["phone", "book", "notebook", "phone"]);
        let assessment = engine.assess(focused(), &one_face(), &many);
        assert_eq!(assessment.score.objects, 0);
        // Same kind inside the dedup window.
        assert!(assessment.violations.is_empty());
    }

    #[test]
    fn test_same_frame_same_kind_collapses() {
        let (mut engine, _clock) = engine();
        let assessment = engine.assess(focused(), &one_face(), &objects(&["phone", "book"]));
        assert_eq!(assessment.score.objects, 40);
        assert_eq!(assessment.violations.len(), 1);
    }

    #[test]
    fn test_dedup_across_frames() {
        let (mut engine, clock) = engine();
        let absent = FacePresenceSample::absent();

        engine.update(focused(), &absent, &[]);
        clock.advance_ms(1_000);
        engine.update(focused(), &absent, &[]);
        assert_eq!(engine.stats().kind_count(ViolationKind::NoFace), 1);

        clock.advance_ms(1_100);
        engine.update(focused(), &absent, &[]);
        assert_eq!(engine.stats().kind_count(ViolationKind::NoFace), 2);
    }

    #[test]
    fn test_report_violation_uses_dedup() {
        let (mut engine, clock) = engine();
        let report = |engine: &mut FusionEngine<ManualClock>| {
            engine.report_violation(ViolationKind::GazeAway, Severity::Low, "looked left", None)
        };
        assert!(report(&mut engine));
        assert!(!report(&mut engine));
        clock.advance_ms(2_500);
        assert!(report(&mut engine));
        assert_eq!(engine.stats().severity_count(Severity::Low), 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (mut engine, _clock) = engine();
        for _ in 0..12 {
            engine.update(away(), &FacePresenceSample::absent(), &[]);
        }
        assert!(!engine.list_violations(None).is_empty());

        engine.clear();
        assert!(engine.history().is_empty());
        assert_eq!(engine.distraction_streak(), 0);
        assert!(engine.list_violations(None).is_empty());
        assert_eq!(engine.stats().total, 0);

        // After a clear the next present frame is the whole gaze window.
        let score = engine.update(focused(), &one_face(), &[]);
        assert_eq!(score.gaze, 100);
    }

    #[test]
    fn test_violation_timestamps_come_from_clock() {
        let (mut engine, clock) = engine();
        clock.set_ms(42_000);
        engine.update(Pose::Absent, &FacePresenceSample::absent(), &[]);
        assert_eq!(engine.list_violations(Some(1))[0].timestamp_ms, 42_000);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let bad_capacity = EngineConfig {
            history_capacity: 0,
            ..Default::default()
        };
        assert!(FusionEngine::new(bad_capacity).unwrap_err().is_config());

        let bad_weights = EngineConfig {
            weights: ScoreWeights {
                gaze: 1.0,
                head_pose: 1.0,
                face_presence: 0.0,
                objects: 0.0,
            },
            ..Default::default()
        };
        assert!(FusionEngine::new(bad_weights).is_err());
    }

    #[test]
    fn test_history_bounded_by_capacity() {
        let (mut engine, _clock) = engine();
        for _ in 0..100 {
            engine.update(focused(), &one_face(), &[]);
        }
        assert_eq!(engine.history().len(), 30);
    }
}
