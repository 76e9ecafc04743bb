//! Canonical face-mesh landmark indices and the typed point records built from them.
//!
//! The measurement code never indexes a [`LandmarkSet`] directly. Every point it
//! needs is resolved here, once, into a struct with one named field per landmark,
//! so a missing index surfaces as a single `InvalidLandmarkSet` error up front.

use crate::error::Result;
use crate::types::{LandmarkSet, Point};

/// Face-mesh indices used by the whole-face measurements.
pub mod indices {
    pub const CHIN: usize = 152;
    pub const CHIN_LEFT: usize = 176;
    pub const CHIN_RIGHT: usize = 400;

    pub const NOSE_TIP: usize = 1;
    pub const NOSE_BRIDGE: usize = 168;
    pub const NOSE_LEFT: usize = 48;
    pub const NOSE_RIGHT: usize = 331;

    /// Inner brow ends, near the glabella. Their midpoint is the brow baseline.
    pub const BROW_MID_LEFT: usize = 70;
    pub const BROW_MID_RIGHT: usize = 300;
    /// Brow arches. Their midpoint is the top of the midface.
    pub const BROW_CENTER_LEFT: usize = 105;
    pub const BROW_CENTER_RIGHT: usize = 334;

    pub const FACE_LEFT: usize = 234;
    pub const FACE_RIGHT: usize = 454;
    pub const JAW_LEFT: usize = 172;
    pub const JAW_RIGHT: usize = 288;

    pub const MOUTH_LEFT: usize = 61;
    pub const MOUTH_RIGHT: usize = 291;
    pub const MOUTH_LEFT_TOP: usize = 37;
    pub const MOUTH_LEFT_MID: usize = 82;
    pub const MOUTH_LEFT_BOTTOM: usize = 84;
    pub const MOUTH_RIGHT_TOP: usize = 267;
    pub const MOUTH_RIGHT_MID: usize = 312;
    pub const MOUTH_RIGHT_BOTTOM: usize = 314;

    pub const TOP_FOREHEAD: usize = 10;

    pub const LEFT_EYE_OUTER: usize = 33;
    pub const LEFT_EYE_INNER: usize = 133;
    pub const LEFT_EYE_TOP: usize = 159;
    pub const LEFT_EYE_BOTTOM: usize = 145;

    pub const RIGHT_EYE_OUTER: usize = 263;
    pub const RIGHT_EYE_INNER: usize = 362;
    pub const RIGHT_EYE_TOP: usize = 386;
    pub const RIGHT_EYE_BOTTOM: usize = 374;
}

/// The four corner indices of one eye.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeIndices {
    pub outer: usize,
    pub inner: usize,
    pub top: usize,
    pub bottom: usize,
}

pub const LEFT_EYE: EyeIndices = EyeIndices {
    outer: indices::LEFT_EYE_OUTER,
    inner: indices::LEFT_EYE_INNER,
    top: indices::LEFT_EYE_TOP,
    bottom: indices::LEFT_EYE_BOTTOM,
};

pub const RIGHT_EYE: EyeIndices = EyeIndices {
    outer: indices::RIGHT_EYE_OUTER,
    inner: indices::RIGHT_EYE_INNER,
    top: indices::RIGHT_EYE_TOP,
    bottom: indices::RIGHT_EYE_BOTTOM,
};

/// Resolved corner points of one eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeCorners {
    pub outer: Point,
    pub inner: Point,
    pub top: Point,
    pub bottom: Point,
}

impl EyeCorners {
    pub fn resolve(landmarks: &LandmarkSet, eye: &EyeIndices) -> Result<Self> {
        Ok(Self {
            outer: landmarks.get(eye.outer)?,
            inner: landmarks.get(eye.inner)?,
            top: landmarks.get(eye.top)?,
            bottom: landmarks.get(eye.bottom)?,
        })
    }
}

/// Every point the whole-face measurements read, resolved from a landmark set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacePoints {
    pub chin: Point,
    pub chin_left: Point,
    pub chin_right: Point,
    pub nose_tip: Point,
    pub nose_bridge: Point,
    pub nose_left: Point,
    pub nose_right: Point,
    pub brow_mid: Point,
    pub brow_center: Point,
    pub face_left: Point,
    pub face_right: Point,
    pub jaw_left: Point,
    pub jaw_right: Point,
    pub mouth_left: Point,
    pub mouth_right: Point,
    pub mouth_left_top: Point,
    pub mouth_left_mid: Point,
    pub mouth_left_bottom: Point,
    pub mouth_right_top: Point,
    pub mouth_right_mid: Point,
    pub mouth_right_bottom: Point,
    pub top_forehead: Point,
    pub eye_left_inner: Point,
    pub eye_right_inner: Point,
}

impl FacePoints {
    pub fn resolve(lms: &LandmarkSet) -> Result<Self> {
        use indices::*;

        Ok(Self {
            chin: lms.get(CHIN)?,
            chin_left: lms.get(CHIN_LEFT)?,
            chin_right: lms.get(CHIN_RIGHT)?,
            nose_tip: lms.get(NOSE_TIP)?,
            nose_bridge: lms.get(NOSE_BRIDGE)?,
            nose_left: lms.get(NOSE_LEFT)?,
            nose_right: lms.get(NOSE_RIGHT)?,
            brow_mid: lms.midpoint(BROW_MID_LEFT, BROW_MID_RIGHT)?,
            brow_center: lms.midpoint(BROW_CENTER_LEFT, BROW_CENTER_RIGHT)?,
            face_left: lms.get(FACE_LEFT)?,
            face_right: lms.get(FACE_RIGHT)?,
            jaw_left: lms.get(JAW_LEFT)?,
            jaw_right: lms.get(JAW_RIGHT)?,
            mouth_left: lms.get(MOUTH_LEFT)?,
            mouth_right: lms.get(MOUTH_RIGHT)?,
            mouth_left_top: lms.get(MOUTH_LEFT_TOP)?,
            mouth_left_mid: lms.get(MOUTH_LEFT_MID)?,
            mouth_left_bottom: lms.get(MOUTH_LEFT_BOTTOM)?,
            mouth_right_top: lms.get(MOUTH_RIGHT_TOP)?,
            mouth_right_mid: lms.get(MOUTH_RIGHT_MID)?,
            mouth_right_bottom: lms.get(MOUTH_RIGHT_BOTTOM)?,
            top_forehead: lms.get(TOP_FOREHEAD)?,
            eye_left_inner: lms.get(LEFT_EYE_INNER)?,
            eye_right_inner: lms.get(RIGHT_EYE_INNER)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::MEDIAPIPE_LANDMARK_COUNT;

    #[test]
    fn brow_points_are_midpoints() {
        let mut points = vec![Point::zero(); MEDIAPIPE_LANDMARK_COUNT];
        points[indices::BROW_MID_LEFT] = Point::new(0.4, 0.3);
        points[indices::BROW_MID_RIGHT] = Point::new(0.6, 0.3);
        points[indices::BROW_CENTER_LEFT] = Point::new(0.2, 0.5);
        points[indices::BROW_CENTER_RIGHT] = Point::new(0.4, 0.7);

        let pts = FacePoints::resolve(&LandmarkSet::new(points)).unwrap();
        assert!((pts.brow_mid.x - 0.5).abs() < 1e-12);
        assert!((pts.brow_mid.y - 0.3).abs() < 1e-12);
        assert!((pts.brow_center.x - 0.3).abs() < 1e-12);
        assert!((pts.brow_center.y - 0.6).abs() < 1e-12);
    }

    #[test]
    fn short_landmark_set_is_rejected() {
        // 300 points covers some indices but not 331, 362, 400 or 454.
        let lms = LandmarkSet::new(vec![Point::zero(); 300]);
        assert!(matches!(
            FacePoints::resolve(&lms),
            Err(Error::InvalidLandmarkSet { len: 300, .. })
        ));
        assert!(EyeCorners::resolve(&lms, &LEFT_EYE).is_ok());
        assert!(matches!(
            EyeCorners::resolve(&lms, &RIGHT_EYE),
            Err(Error::InvalidLandmarkSet { index: 362, .. })
        ));
    }
}
