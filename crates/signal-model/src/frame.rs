//! Recorded per-frame signal streams.
//!
//! A session recording is JSONL, one [`FrameSignals`] per line, holding
//! the raw collaborator outputs for that frame before classification.
//! Lines starting with `#` are comments.
//!
//! ```text
//! {"t":0,"pose":{"pitch":2.0,"yaw":-4.5,"roll":1.0,"eye_openness":0.28},"face":{"count":1,"confidence":0.97},"objects":[]}
//! {"t":33,"pose":null,"face":{"count":0,"confidence":0.0},"objects":[{"label":"cell phone","score":0.82}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::presence::BoundingBox;

/// Raw collaborator outputs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSignals {
    /// Frame timestamp in milliseconds. Non-decreasing within a stream.
    pub t: u64,

    /// Pose angles, or `null` when no face was found for pose estimation.
    #[serde(default)]
    pub pose: Option<RawPose>,

    pub face: RawFace,

    #[serde(default)]
    pub objects: Vec<RawObject>,
}

/// Pose angles (degrees) and eye aspect ratio, unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPose {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
    pub eye_openness: f64,
}

/// Face-detector output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFace {
    pub count: u32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// One object-detector hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    pub label: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// Failure to parse a frame stream, with the offending line (1-based).
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct FrameParseError {
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<FrameSignals>, FrameParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| FrameParseError { line, source })
        })
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[FrameSignals]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
