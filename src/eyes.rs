//! Eye shape descriptors: openness, upper-lid arch and left/right symmetry.

use serde::Serialize;
use tracing::warn;

use crate::config::{AnalyzerConfig, SymmetryWeights};
use crate::error::Result;
use crate::landmarks::{EyeCorners, LEFT_EYE, RIGHT_EYE};
use crate::types::LandmarkSet;

/// Width, height and lid curvature of a single eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeShape {
    /// Outer to inner corner
    pub width: f64,
    /// Top to bottom lid
    pub height: f64,
    /// Distance from the corner midpoint to the upper lid
    pub curvature: f64,
}

impl EyeShape {
    pub fn from_corners(eye: &EyeCorners) -> Self {
        let center = eye.outer.midpoint(&eye.inner);
        Self {
            width: eye.outer.distance(&eye.inner),
            height: eye.top.distance(&eye.bottom),
            curvature: (eye.top - center).norm(),
        }
    }
}

/// Output of [`EyeAnalyzer::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeMetrics {
    /// Mean height/width over both eyes. Larger means rounder.
    pub eye_aspect_ratio: f64,
    /// Mean lid curvature over both eyes, relative to the interocular distance.
    pub eye_curvature_ratio: f64,
    /// 1 minus the weighted asymmetry score. 1.0 means identical eyes.
    pub eye_symmetry: f64,
}

impl EyeMetrics {
    /// Feature names and values in output order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("eye_aspect_ratio", self.eye_aspect_ratio),
            ("eye_curvature_ratio", self.eye_curvature_ratio),
            ("eye_symmetry", self.eye_symmetry),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct EyeAnalyzer {
    epsilon: f64,
    weights: SymmetryWeights,
}

impl Default for EyeAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl EyeAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            epsilon: config.eye_epsilon,
            weights: config.symmetry_weights,
        }
    }

    /// Compute eye metrics from a full landmark set.
    pub fn extract(&self, landmarks: &LandmarkSet) -> Result<EyeMetrics> {
        let left = EyeCorners::resolve(landmarks, &LEFT_EYE)?;
        let right = EyeCorners::resolve(landmarks, &RIGHT_EYE)?;
        Ok(self.extract_corners(&left, &right))
    }

    /// Compute eye metrics from resolved corners.
    ///
    /// The interocular distance is taken between the two outer corners.
    pub fn extract_corners(&self, left: &EyeCorners, right: &EyeCorners) -> EyeMetrics {
        let interocular = self.nonzero("interocular", left.outer.distance(&right.outer));

        let mut l = EyeShape::from_corners(left);
        let mut r = EyeShape::from_corners(right);
        l.width = self.nonzero("left eye width", l.width);
        r.width = self.nonzero("right eye width", r.width);

        let eye_aspect_ratio = (l.height / l.width + r.height / r.width) / 2.0;
        let eye_curvature_ratio = (l.curvature / interocular + r.curvature / interocular) / 2.0;

        // Widths are compared after the epsilon substitution.
        let asymmetry = self.weights.width * relative_difference(l.width, r.width)
            + self.weights.height * relative_difference(l.height, r.height)
            + self.weights.curvature * relative_difference(l.curvature, r.curvature);

        EyeMetrics {
            eye_aspect_ratio,
            eye_curvature_ratio,
            eye_symmetry: 1.0 - asymmetry,
        }
    }

    fn nonzero(&self, what: &str, value: f64) -> f64 {
        if value == 0.0 {
            warn!(what, epsilon = self.epsilon, "zero eye dimension, substituting epsilon");
            self.epsilon
        } else {
            value
        }
    }
}

/// `|a - b|` relative to the mean of `a` and `b`, or 0 if that mean is not positive.
fn relative_difference(a: f64, b: f64) -> f64 {
    let avg = (a + b) / 2.0;
    if avg > 0.0 {
        (a - b).abs() / avg
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;
    use approx::assert_abs_diff_eq;

    fn corners(dx: f64, width: f64, height: f64, lift: f64) -> EyeCorners {
        EyeCorners {
            outer: Point::new(dx, 0.5),
            inner: Point::new(dx + width, 0.5),
            top: Point::new(dx + width / 2.0, 0.5 - lift),
            bottom: Point::new(dx + width / 2.0, 0.5 - lift + height),
        }
    }

    #[test]
    fn mirrored_eyes_are_fully_symmetric() {
        let left = corners(0.25, 0.125, 0.0625, 0.03125);
        // Mirror of the left eye around x = 0.5
        let right = EyeCorners {
            outer: Point::new(0.75, 0.5),
            inner: Point::new(0.625, 0.5),
            top: Point::new(0.6875, 0.46875),
            bottom: Point::new(0.6875, 0.53125),
        };

        let m = EyeAnalyzer::default().extract_corners(&left, &right);
        assert_eq!(m.eye_symmetry, 1.0);
        assert_eq!(m.eye_aspect_ratio, 0.5);
        // curvature 0.03125 over interocular 0.5
        assert_eq!(m.eye_curvature_ratio, 0.0625);
    }

    #[test]
    fn identical_shapes_score_exactly_one() {
        let eye = corners(0.125, 0.125, 0.0625, 0.03125);
        let shifted = corners(0.625, 0.125, 0.0625, 0.03125);
        let m = EyeAnalyzer::default().extract_corners(&eye, &shifted);
        assert_eq!(m.eye_symmetry, 1.0);
    }

    #[test]
    fn asymmetry_is_weighted() {
        let left = EyeCorners {
            outer: Point::new(0.0, 0.0),
            inner: Point::new(4.0, 0.0),
            top: Point::new(2.0, -1.0),
            bottom: Point::new(2.0, 1.0),
        };
        // Twice as wide, same height, curvature 2 instead of 1.
        let right = EyeCorners {
            outer: Point::new(10.0, 0.0),
            inner: Point::new(18.0, 0.0),
            top: Point::new(14.0, -2.0),
            bottom: Point::new(14.0, 0.0),
        };

        let m = EyeAnalyzer::default().extract_corners(&left, &right);
        // width: 4/6, height: 0, curvature: 1/1.5
        let expected = 1.0 - (0.3 * (4.0 / 6.0) + 0.4 * (1.0 / 1.5));
        assert_abs_diff_eq!(m.eye_symmetry, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(m.eye_aspect_ratio, (2.0 / 4.0 + 2.0 / 8.0) / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.eye_curvature_ratio, (1.0 / 10.0 + 2.0 / 10.0) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn collapsed_eyes_use_epsilon() {
        let p = Point::new(0.5, 0.5);
        let collapsed = EyeCorners {
            outer: p,
            inner: p,
            top: p,
            bottom: p,
        };

        let m = EyeAnalyzer::default().extract_corners(&collapsed, &collapsed);
        assert_eq!(m.eye_aspect_ratio, 0.0);
        assert_eq!(m.eye_curvature_ratio, 0.0);
        assert_eq!(m.eye_symmetry, 1.0);
        assert!(m.eye_symmetry.is_finite());
    }

    #[test]
    fn relative_difference_guards_zero_mean() {
        assert_eq!(relative_difference(0.0, 0.0), 0.0);
        assert_eq!(relative_difference(1.0, 3.0), 1.0);
    }
}
