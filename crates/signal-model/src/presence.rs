//! Face presence samples.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in normalized frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (normalized).
    pub x: f64,
    /// Top edge (normalized).
    pub y: f64,
    /// Width (normalized).
    pub w: f64,
    /// Height (normalized).
    pub h: f64,
}

impl BoundingBox {
    /// Create a box, clamping to the frame and to non-negative size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        let x = finite_or_zero(x).clamp(0.0, 1.0);
        let y = finite_or_zero(y).clamp(0.0, 1.0);
        Self {
            x,
            y,
            w: finite_or_zero(w).clamp(0.0, 1.0 - x),
            h: finite_or_zero(h).clamp(0.0, 1.0 - y),
        }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Face-detector output for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FacePresenceSample {
    pub face_count: u32,
    /// At least one face is visible.
    pub present: bool,
    /// More than one face is visible.
    pub multiple: bool,
    /// Detector confidence for the primary face, in `[0, 1]`.
    pub confidence: f64,
    /// Box around the primary face.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl FacePresenceSample {
    /// Build a sample from a raw face count and confidence.
    ///
    /// `present` and `multiple` are derived from the count. Confidence is
    /// clamped to `[0, 1]`; NaN becomes 0.
    pub fn from_count(face_count: u32, confidence: f64, bounding_box: Option<BoundingBox>) -> Self {
        Self {
            face_count,
            present: face_count > 0,
            multiple: face_count > 1,
            confidence: clamp_unit(confidence),
            bounding_box,
        }
    }

    /// No face in frame.
    pub fn absent() -> Self {
        Self::from_count(0, 0.0, None)
    }

    /// Exactly one face with the given confidence.
    pub fn single(confidence: f64) -> Self {
        Self::from_count(1, confidence, None)
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    finite_or_zero(value).clamp(0.0, 1.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_count_derives_flags() {
        let none = FacePresenceSample::from_count(0, 0.9, None);
        assert!(!none.present);
        assert!(!none.multiple);

        let one = FacePresenceSample::single(0.8);
        assert!(one.present);
        assert!(!one.multiple);

        let two = FacePresenceSample::from_count(2, 0.7, None);
        assert!(two.present);
        assert!(two.multiple);
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(FacePresenceSample::single(1.7).confidence, 1.0);
        assert_eq!(FacePresenceSample::single(-0.2).confidence, 0.0);
        assert_eq!(FacePresenceSample::single(f64::NAN).confidence, 0.0);
    }

    #[test]
    fn test_bounding_box_clamps_to_frame() {
        let bbox = BoundingBox::new(0.8, -0.1, 0.5, 0.3);
        assert_eq!(bbox.x, 0.8);
        assert_eq!(bbox.y, 0.0);
        assert!((bbox.w - 0.2).abs() < 1e-9);
        assert!((bbox.h - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_center() {
        let bbox = BoundingBox::new(0.2, 0.2, 0.4, 0.2);
        let (cx, cy) = bbox.center();
        assert!((cx - 0.4).abs() < 1e-9);
        assert!((cy - 0.3).abs() < 1e-9);
        assert!((bbox.area() - 0.08).abs() < 1e-9);
    }
}
