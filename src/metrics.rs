//! Whole-face measurements and the proportions derived from them.
//!
//! [`FaceMeasurer::measure`] turns a landmark set into raw distances and jaw
//! angles, all in the landmarks' normalized units. [`FaceMeasurer::compute_ratios`]
//! divides those into dimensionless proportions.

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::landmarks::FacePoints;
use crate::types::{LandmarkSet, Point};

/// Euclidean distance between two points.
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    p1.distance(p2)
}

/// Angle in degrees at vertex `p2` between the rays `p2 -> p1` and `p2 -> p3`.
///
/// Returns 0.0 when either ray has zero length. The cosine is clamped to
/// [-1, 1] so nearly collinear points never produce NaN.
pub fn angle(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    let v1 = *p1 - *p2;
    let v2 = *p3 - *p2;
    let norm = v1.norm() * v2.norm();
    if norm == 0.0 {
        return 0.0;
    }
    let cos_theta = (v1.dot(&v2) / norm).clamp(-1.0, 1.0);
    cos_theta.acos().to_degrees()
}

/// Raw face measurements in normalized landmark units (angles in degrees).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Measurements {
    /// Cheek to cheek (234-454)
    pub face_width: f64,
    /// Brow baseline to chin, plus the forehead height
    pub face_length: f64,
    /// Scaled hairline-to-brow distance
    pub forehead_height: f64,
    /// Nose tip to brow arches
    pub midface_height: f64,
    /// Nose tip to chin
    pub lower_face_height: f64,
    /// Between the inner eye corners
    pub eye_distance: f64,
    pub nose_width: f64,
    /// Nose bridge to nose tip
    pub nose_length: f64,
    pub mouth_width: f64,
    pub chin_width: f64,
    /// Mean of the left and right upper-lip segments
    pub upper_lip_h: f64,
    /// Mean of the left and right lower-lip segments
    pub lower_lip_h: f64,
    pub jaw_angle_left: f64,
    pub jaw_angle_right: f64,
}

/// Points constructed during measurement, kept for overlay drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstructedPoints {
    /// Forehead vector extrapolated past the hairline
    pub vertex: Point,
    pub brow_mid: Point,
}

/// Dimensionless face proportions, plus the mean jaw angle in degrees.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FaceRatios {
    pub face_lw_ratio: f64,
    pub forehead_ratio: f64,
    pub midface_ratio: f64,
    pub lowerface_ratio: f64,
    pub eye_distance_ratio: f64,
    pub nose_ratio: f64,
    pub mouth_chin_ratio: f64,
    pub jaw_angle: f64,
    pub upper_lip_ratio: f64,
    pub lower_lip_ratio: f64,
}

impl FaceRatios {
    /// Feature names and values in output order.
    pub fn entries(&self) -> [(&'static str, f64); 10] {
        [
            ("face_lw_ratio", self.face_lw_ratio),
            ("forehead_ratio", self.forehead_ratio),
            ("midface_ratio", self.midface_ratio),
            ("lowerface_ratio", self.lowerface_ratio),
            ("eye_distance_ratio", self.eye_distance_ratio),
            ("nose_ratio", self.nose_ratio),
            ("mouth_chin_ratio", self.mouth_chin_ratio),
            ("jaw_angle", self.jaw_angle),
            ("upper_lip_ratio", self.upper_lip_ratio),
            ("lower_lip_ratio", self.lower_lip_ratio),
        ]
    }
}

/// Computes whole-face measurements and ratios.
#[derive(Debug, Clone)]
pub struct FaceMeasurer {
    forehead_scale: f64,
}

impl Default for FaceMeasurer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl FaceMeasurer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            forehead_scale: config.forehead_scale,
        }
    }

    /// Measure a face from its landmarks.
    ///
    /// Fails with `InvalidLandmarkSet` if any canonical index is out of range.
    pub fn measure(&self, landmarks: &LandmarkSet) -> Result<(Measurements, ConstructedPoints)> {
        let pts = FacePoints::resolve(landmarks)?;
        Ok(self.measure_points(&pts))
    }

    /// Measure a face from already-resolved points.
    pub fn measure_points(&self, pts: &FacePoints) -> (Measurements, ConstructedPoints) {
        // The hairline landmark sits below the true top of the head, so the
        // forehead is stretched by the same factor the vertex is extrapolated.
        let forehead_vec = pts.top_forehead - pts.brow_mid;
        let forehead_height = self.forehead_scale * forehead_vec.norm();
        let vertex = pts.top_forehead + forehead_vec * (self.forehead_scale - 1.0);

        let measurements = Measurements {
            face_width: distance(&pts.face_left, &pts.face_right),
            face_length: distance(&pts.brow_mid, &pts.chin) + forehead_height,
            forehead_height,
            midface_height: distance(&pts.nose_tip, &pts.brow_center),
            lower_face_height: distance(&pts.nose_tip, &pts.chin),
            eye_distance: distance(&pts.eye_left_inner, &pts.eye_right_inner),
            nose_width: distance(&pts.nose_left, &pts.nose_right),
            nose_length: distance(&pts.nose_bridge, &pts.nose_tip),
            mouth_width: distance(&pts.mouth_left, &pts.mouth_right),
            chin_width: distance(&pts.chin_left, &pts.chin_right),
            upper_lip_h: (distance(&pts.mouth_left_top, &pts.mouth_left_mid)
                + distance(&pts.mouth_right_top, &pts.mouth_right_mid))
                / 2.0,
            lower_lip_h: (distance(&pts.mouth_left_bottom, &pts.mouth_left_mid)
                + distance(&pts.mouth_right_bottom, &pts.mouth_right_mid))
                / 2.0,
            jaw_angle_left: angle(&pts.face_left, &pts.jaw_left, &pts.chin_left),
            jaw_angle_right: angle(&pts.face_right, &pts.jaw_right, &pts.chin_right),
        };

        debug!(
            face_width = measurements.face_width,
            face_length = measurements.face_length,
            forehead_height,
            "measured face"
        );

        let constructed = ConstructedPoints {
            vertex,
            brow_mid: pts.brow_mid,
        };
        (measurements, constructed)
    }

    /// Convert raw measurements into ratios.
    ///
    /// Returns `None` when `face_length` is zero: the geometry is degenerate and
    /// no feature vector should be emitted. Every other zero denominator yields
    /// a ratio of 0.
    pub fn compute_ratios(&self, m: &Measurements) -> Option<FaceRatios> {
        if m.face_length == 0.0 {
            debug!("face length is zero, skipping ratios");
            return None;
        }

        Some(FaceRatios {
            face_lw_ratio: m.face_width / m.face_length,
            forehead_ratio: m.forehead_height / m.face_length,
            midface_ratio: m.midface_height / m.face_length,
            lowerface_ratio: m.lower_face_height / m.face_length,
            eye_distance_ratio: ratio("eye_distance_ratio", m.eye_distance, m.face_width),
            nose_ratio: ratio("nose_ratio", m.nose_width, m.nose_length),
            mouth_chin_ratio: ratio("mouth_chin_ratio", m.mouth_width, m.chin_width),
            jaw_angle: (m.jaw_angle_left + m.jaw_angle_right) / 2.0,
            upper_lip_ratio: ratio("upper_lip_ratio", m.upper_lip_h, m.mouth_width),
            lower_lip_ratio: ratio("lower_lip_ratio", m.lower_lip_h, m.mouth_width),
        })
    }
}

/// Divide, falling back to 0 for a non-positive denominator.
fn ratio(name: &str, numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        warn!(feature = name, denominator, "zero denominator, ratio set to 0");
        0.0
    }
}
