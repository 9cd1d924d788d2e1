//! Vigil Signal Model
//!
//! Defines the data contracts between perception collaborators and the
//! fusion engine:
//! - **Focus:** Per-frame pose sample and its focus category
//! - **Presence:** Face count/confidence for the frame
//! - **Detection:** Labeled object detections and the prohibited-item vocabulary
//! - **Violation:** Immutable audit events raised by the engine
//! - **Score:** The per-frame attention score and its qualitative level
//! - **Frame:** JSONL record format for recorded signal streams
//!
//! Bounding boxes are normalized to `[0.0, 1.0]` relative to the frame.

pub mod detection;
pub mod focus;
pub mod frame;
pub mod presence;
pub mod score;
pub mod violation;

pub use detection::*;
pub use focus::*;
pub use frame::*;
pub use presence::*;
pub use score::*;
pub use violation::*;
