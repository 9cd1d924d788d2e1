//! Vigil Fusion Core — the attention engine
//!
//! Turns noisy per-frame perception signals into a stable score and a
//! clean violation log:
//! - **Classifier:** Pose angles + eye openness to a focus category
//! - **Landmarks:** Pose and eye-aspect-ratio estimates from face landmarks
//! - **Engine:** Focus history, distraction streak, weighted scoring, dedup'd violations
//! - **Pipeline:** Raw recorded frames through classifier and engine
//! - **Summary:** Session-level aggregation of per-frame scores
//!
//! This crate is pure computation — no I/O, no threads, no ambient state.
//! Every engine is an owned value; time comes from an injected clock.

pub mod classifier;
pub mod engine;
pub mod history;
pub mod landmarks;
pub mod pipeline;
pub mod scoring;
pub mod summary;
pub mod violation_log;

pub use classifier::SignalClassifier;
pub use engine::{FrameAssessment, FusionEngine};
pub use history::FocusHistory;
pub use pipeline::SessionPipeline;
pub use summary::SessionSummary;
pub use violation_log::ViolationLog;
