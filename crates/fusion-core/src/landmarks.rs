//! Head-pose and eye-openness estimates from 2D face landmarks.
//!
//! The geometry is deliberately simple: it needs only five anchor points
//! plus the standard six-point eye contours, and it degrades to "no
//! estimate" on degenerate input instead of producing garbage angles.
//!
//! # Conventions
//!
//! Points are normalized image coordinates, `y` growing downward.
//! `left_eye` is the eye with the smaller image `x` (the subject's right).
//! Positive pitch means looking down; positive yaw means the nose moved
//! toward larger `x`; positive roll means the eye line slopes downward.

use serde::{Deserialize, Serialize};

/// Nose-tip position between eye line and mouth line for a level head,
/// as a fraction of the eye-to-mouth distance.
const NEUTRAL_NOSE_RATIO: f64 = 0.6;

/// Below this, distances are treated as zero.
const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point2) -> Point2 {
        Point2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Anchor points for pose estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub nose_tip: Point2,
    pub left_eye: Point2,
    pub right_eye: Point2,
    pub mouth_left: Point2,
    pub mouth_right: Point2,
}

/// Six-point eye contour: corners at `[0]` and `[3]`, upper lid at
/// `[1]`/`[2]`, lower lid at `[5]`/`[4]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeContour(pub [Point2; 6]);

/// Everything the classifier needs from one detected face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    pub landmarks: FaceLandmarks,
    pub left_eye: EyeContour,
    pub right_eye: EyeContour,
}

/// Unclamped head rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadAngles {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl FaceLandmarks {
    /// Estimate head rotation. `None` when the geometry is degenerate.
    pub fn head_angles(&self) -> Option<HeadAngles> {
        let points = [
            self.nose_tip,
            self.left_eye,
            self.right_eye,
            self.mouth_left,
            self.mouth_right,
        ];
        if !points.iter().all(Point2::is_finite) {
            return None;
        }

        let dx = self.right_eye.x - self.left_eye.x;
        let dy = self.right_eye.y - self.left_eye.y;
        let interocular = (dx * dx + dy * dy).sqrt();
        if interocular < EPSILON {
            return None;
        }

        // Face-aligned axes: `u` along the eye line, `v` toward the chin.
        let (ux, uy) = (dx / interocular, dy / interocular);
        let (vx, vy) = (-uy, ux);

        let eye_mid = self.left_eye.midpoint(&self.right_eye);
        let mouth_mid = self.mouth_left.midpoint(&self.mouth_right);

        let nose_dx = self.nose_tip.x - eye_mid.x;
        let nose_dy = self.nose_tip.y - eye_mid.y;
        let nose_along = nose_dx * ux + nose_dy * uy;
        let nose_down = nose_dx * vx + nose_dy * vy;

        let mouth_down = (mouth_mid.x - eye_mid.x) * vx + (mouth_mid.y - eye_mid.y) * vy;
        if mouth_down < EPSILON {
            return None;
        }

        let roll = dy.atan2(dx).to_degrees();
        let yaw = asin_deg(nose_along / (interocular / 2.0));
        let pitch = asin_deg((nose_down / mouth_down - NEUTRAL_NOSE_RATIO) * 2.0);

        Some(HeadAngles { pitch, yaw, roll })
    }
}

impl EyeContour {
    /// Eye aspect ratio: `(|p2-p6| + |p3-p5|) / (2 |p1-p4|)`.
    ///
    /// Returns 0 for a degenerate (zero-width) eye.
    pub fn aspect_ratio(&self) -> f64 {
        let p = &self.0;
        if !p.iter().all(Point2::is_finite) {
            return 0.0;
        }
        let width = p[0].distance(&p[3]);
        if width < EPSILON {
            return 0.0;
        }
        (p[1].distance(&p[5]) + p[2].distance(&p[4])) / (2.0 * width)
    }
}

impl FaceObservation {
    /// Mean aspect ratio of both eyes.
    pub fn eye_openness(&self) -> f64 {
        (self.left_eye.aspect_ratio() + self.right_eye.aspect_ratio()) / 2.0
    }
}

fn asin_deg(ratio: f64) -> f64 {
    ratio.clamp(-1.0, 1.0).asin().to_degrees()
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn rotate(p: Point2, center: Point2, deg: f64) -> Point2 {
        let (s, c) = deg.to_radians().sin_cos();
        let (dx, dy) = (p.x - center.x, p.y - center.y);
        Point2::new(center.x + dx * c - dy * s, center.y + dx * s + dy * c)
    }

    #[test]
    fn test_frontal_face_is_level() {
        let angles = frontal().head_angles().unwrap();
        assert!(angles.pitch.abs() < 1e-6);
        assert!(angles.yaw.abs() < 1e-6);
        assert!(angles.roll.abs() < 1e-6);
    }

    #[test]
    fn test_nose_offset_reads_as_yaw() {
        let mut face = frontal();
        face.nose_tip.x = 0.55;
        let angles = face.head_angles().unwrap();
        assert!((angles.yaw - 30.0).abs() < 1e-6);
        assert!(angles.pitch.abs() < 1e-6);
    }

    #[test]
    fn test_lowered_nose_reads_as_positive_pitch() {
        let mut face = frontal();
        face.nose_tip.y = 0.55;
        let angles = face.head_angles().unwrap();
        assert!(angles.pitch > 0.0);
    }

    #[test]
    fn test_rotated_face_reads_as_roll_only() {
        let face = frontal();
        let center = Point2::new(0.5, 0.5);
        let tilted = FaceLandmarks {
            nose_tip: rotate(face.nose_tip, center, 10.0),
            left_eye: rotate(face.left_eye, center, 10.0),
            right_eye: rotate(face.right_eye, center, 10.0),
            mouth_left: rotate(face.mouth_left, center, 10.0),
            mouth_right: rotate(face.mouth_right, center, 10.0),
        };
        let angles = tilted.head_angles().unwrap();
        assert!((angles.roll - 10.0).abs() < 1e-6);
        assert!(angles.yaw.abs() < 1e-6);
        assert!(angles.pitch.abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_geometry_has_no_estimate() {
        let mut face = frontal();
        face.right_eye = face.left_eye;
        assert!(face.head_angles().is_none());

        let mut upside_down = frontal();
        upside_down.mouth_left.y = 0.2;
        upside_down.mouth_right.y = 0.2;
        assert!(upside_down.head_angles().is_none());

        let mut nan = frontal();
        nan.nose_tip.x = f64::NAN;
        assert!(nan.head_angles().is_none());
    }

    #[test]
    fn test_eye_aspect_ratio() {
        assert!((eye(0.5, 0.5, 0.3).aspect_ratio() - 0.3).abs() < 1e-9);
        assert_eq!(eye(0.5, 0.5, 0.0).aspect_ratio(), 0.0);

        let collapsed = EyeContour([Point2::new(0.5, 0.5); 6]);
        assert_eq!(collapsed.aspect_ratio(), 0.0);
    }

    #[test]
    fn test_observation_averages_eyes() {
        let obs = FaceObservation {
            landmarks: frontal(),
            left_eye: eye(0.4, 0.4, 0.2),
            right_eye: eye(0.6, 0.4, 0.3),
        };
        assert!((obs.eye_openness() - 0.25).abs() < 1e-9);
    }
}
