//! Frame pipeline: raw collaborator outputs through classifier and engine.

use vigil_common::clock::{Clock, ManualClock};
use vigil_common::config::AppConfig;
use vigil_common::error::VigilResult;
use vigil_signal_model::detection::{DetectedObject, ProhibitedVocabulary};
use vigil_signal_model::focus::Pose;
use vigil_signal_model::frame::FrameSignals;
use vigil_signal_model::presence::FacePresenceSample;
use vigil_signal_model::violation::{ViolationEvent, ViolationStats};

use crate::classifier::SignalClassifier;
use crate::engine::{FrameAssessment, FusionEngine};
use crate::summary::SessionSummary;

/// Classifier, prohibited-item vocabulary, and engine for one session.
#[derive(Debug)]
pub struct SessionPipeline<C: Clock> {
    classifier: SignalClassifier,
    vocabulary: ProhibitedVocabulary,
    engine: FusionEngine<C>,
}

impl<C: Clock> SessionPipeline<C> {
    /// Build a pipeline from validated configuration.
    pub fn new(config: &AppConfig, clock: C) -> VigilResult<Self> {
        let classifier = SignalClassifier::new(config.classifier.clone())?;
        let engine = FusionEngine::with_clock(config.engine.clone(), clock)?;
        let vocabulary = ProhibitedVocabulary::new(&config.engine.prohibited_items);
        Ok(Self {
            classifier,
            vocabulary,
            engine,
        })
    }

    /// Classify and fuse one recorded frame.
    ///
    /// A `null` pose means the pose collaborator produced nothing this
    /// frame, which the engine scores as an absent pose.
    pub fn process(&mut self, frame: &FrameSignals) -> FrameAssessment {
        let pose = match &frame.pose {
            Some(raw) => Pose::Present(self.classifier.classify_raw(Some(raw))),
            None => Pose::Absent,
        };
        let raw_face = &frame.face;
        let face = FacePresenceSample::from_count(
            raw_face.count,
            raw_face.confidence,
            raw_face.bbox,
        );
        let objects: Vec<DetectedObject> = frame
            .objects
            .iter()
            .map(|o| DetectedObject::new(o.label.clone(), o.score, o.bbox, &self.vocabulary))
            .collect();

        self.engine.assess(pose, &face, &objects)
    }

    pub fn classifier(&self) -> &SignalClassifier {
        &self.classifier
    }

    pub fn vocabulary(&self) -> &ProhibitedVocabulary {
        &self.vocabulary
    }

    pub fn engine(&self) -> &FusionEngine<C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FusionEngine<C> {
        &mut self.engine
    }
}

/// Outcome of replaying a recorded frame stream.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub assessments: Vec<FrameAssessment>,
    pub summary: SessionSummary,
    pub stats: ViolationStats,
    /// Every logged violation, newest first.
    pub violations: Vec<ViolationEvent>,
}

/// Replay recorded frames with the frame timestamps as the clock.
///
/// Timestamps that go backwards are held at the latest seen value so the
/// dedup window never sees time reverse.
pub fn replay_frames(config: &AppConfig, frames: &[FrameSignals]) -> VigilResult<ReplayReport> {
    let start = frames.first().map_or(0, |f| f.t);
    let clock = ManualClock::new(start);
    let mut pipeline = SessionPipeline::new(config, clock.clone())?;

    let mut latest = start;
    let mut summary = SessionSummary::new();
    let mut assessments = Vec::with_capacity(frames.len());

    for (index, frame) in frames.iter().enumerate() {
        if frame.t < latest {
            tracing::warn!(
                frame = index,
                t = frame.t,
                latest,
                "Frame timestamp went backwards; holding clock"
            );
        } else {
            latest = frame.t;
        }
        clock.set_ms(latest);

        let assessment = pipeline.process(frame);
        summary.record(&assessment.score);
        assessments.push(assessment);
    }

    let engine = pipeline.engine();
    tracing::info!(
        frames = frames.len(),
        violations = engine.violation_log().len(),
        "Replay complete"
    );

    Ok(ReplayReport {
        assessments,
        summary,
        stats: engine.stats(),
        violations: engine.list_violations(None).into_iter().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_signal_model::frame::{RawFace, RawObject, RawPose};
    use vigil_signal_model::score::AttentionLevel;
    use vigil_signal_model::violation::ViolationKind;

    fn frame(t: u64, pose: Option<(f64, f64)>, faces: u32, objects: &[&str]) -> FrameSignals {
        FrameSignals {
            t,
            pose: pose.map(|(pitch, yaw)| RawPose {
                pitch,
                yaw,
                roll: 0.0,
                eye_openness: 0.3,
            }),
            face: RawFace {
                count: faces,
                confidence: if faces > 0 { 1.0 } else { 0.0 },
                bbox: None,
            },
            objects: objects
                .iter()
                .map(|label| RawObject {
                    label: label.to_string(),
                    score: 0.8,
                    bbox: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_process_classifies_and_flags_objects() {
        let mut pipeline =
            SessionPipeline::new(&AppConfig::default(), ManualClock::new(0)).unwrap();
        let assessment = pipeline.process(&frame(0, Some((0.0, 0.0)), 1, &["Cell Phone"]));
        assert_eq!(assessment.score.gaze, 100);
        assert_eq!(assessment.score.objects, 70);
        assert_eq!(assessment.violations.len(), 1);
        assert_eq!(assessment.violations[0].kind, ViolationKind::ProhibitedObject);
    }

    #[test]
    fn test_null_pose_is_absent() {
        let mut pipeline =
            SessionPipeline::new(&AppConfig::default(), ManualClock::new(0)).unwrap();
        let assessment = pipeline.process(&frame(0, None, 0, &[]));
        assert_eq!(assessment.score.overall, 15);
        assert_eq!(assessment.score.level, AttentionLevel::Critical);
        assert!(pipeline.engine().history().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.engine.dedup_lookback = 0;
        assert!(SessionPipeline::new(&config, ManualClock::new(0)).is_err());
        assert!(replay_frames(&config, &[]).is_err());
    }

    #[test]
    fn test_replay_uses_frame_time_for_dedup() {
        let frames: Vec<_> = (0..90u64)
            .map(|i| frame(i * 33, Some((0.0, 0.0)), 0, &[]))
            .collect();
        let report = replay_frames(&AppConfig::default(), &frames).unwrap();

        // 0..2937 ms: no_face at 0 and again once 2000 ms have passed (t=2013).
        assert_eq!(report.stats.kind_count(ViolationKind::NoFace), 2);
        assert_eq!(report.violations[0].timestamp_ms, 2013);
        assert_eq!(report.summary.frames, 90);
    }

    #[test]
    fn test_replay_holds_clock_on_backwards_time() {
        let frames = vec![
            frame(5_000, Some((0.0, 0.0)), 0, &[]),
            frame(1_000, Some((0.0, 0.0)), 0, &[]),
            frame(7_000, Some((0.0, 0.0)), 0, &[]),
        ];
        let report = replay_frames(&AppConfig::default(), &frames).unwrap();
        assert_eq!(report.stats.kind_count(ViolationKind::NoFace), 2);
        assert_eq!(report.violations[1].timestamp_ms, 5_000);
        assert_eq!(report.violations[0].timestamp_ms, 7_000);
    }
}
