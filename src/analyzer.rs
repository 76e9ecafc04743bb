//! End-to-end analysis: landmarks in, rounded feature vector out.

use serde::Serialize;
use tracing::debug;

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::eyes::{EyeAnalyzer, EyeMetrics};
use crate::features::FeatureVector;
use crate::metrics::{ConstructedPoints, FaceMeasurer, FaceRatios, Measurements};
use crate::types::LandmarkSet;

/// A face landmark detector kept alive across calls.
///
/// Implementations wrap whatever model produces the landmarks. The analyzer
/// only borrows the detector for the duration of one call.
pub trait LandmarkDetector {
    type Image: ?Sized;

    /// Detect the landmarks of the first face in `image`, if any.
    ///
    /// Coordinates must be normalized to [0,1] of the image width and height.
    fn detect(&mut self, image: &Self::Image) -> Result<Option<LandmarkSet>>;
}

/// Everything computed for one face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceAnalysis {
    /// Rounded output features
    pub features: FeatureVector,
    pub measurements: Measurements,
    pub ratios: FaceRatios,
    pub eyes: EyeMetrics,
    pub constructed_points: ConstructedPoints,
}

/// Result of analysing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Features(Box<FaceAnalysis>),
    /// A face was found but its face length is zero.
    NoFaceGeometry,
    /// The detector found no face.
    NoFace,
}

impl Outcome {
    /// The output feature vector; empty unless features were produced.
    pub fn feature_vector(&self) -> FeatureVector {
        match self {
            Outcome::Features(analysis) => analysis.features.clone(),
            Outcome::NoFaceGeometry | Outcome::NoFace => FeatureVector::new(),
        }
    }

    pub fn analysis(&self) -> Option<&FaceAnalysis> {
        match self {
            Outcome::Features(analysis) => Some(&**analysis),
            _ => None,
        }
    }

    pub fn has_features(&self) -> bool {
        matches!(self, Outcome::Features(_))
    }
}

/// Computes facial proportion features from landmarks.
///
/// The analyzer holds only its configuration; every call is independent, so
/// one instance can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct FaceAnalyzer {
    config: AnalyzerConfig,
    measurer: FaceMeasurer,
    eyes: EyeAnalyzer,
}

impl Default for FaceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FaceAnalyzer {
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            measurer: FaceMeasurer::new(&config),
            eyes: EyeAnalyzer::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyse one landmark set.
    ///
    /// Returns `Outcome::NoFaceGeometry` when the face length is zero, and an
    /// `InvalidLandmarkSet` error when a canonical index is out of range.
    pub fn analyze(&self, landmarks: &LandmarkSet) -> Result<Outcome> {
        let (measurements, constructed_points) = self.measurer.measure(landmarks)?;
        let Some(ratios) = self.measurer.compute_ratios(&measurements) else {
            return Ok(Outcome::NoFaceGeometry);
        };
        let eyes = self.eyes.extract(landmarks)?;

        // Eye keys are merged last and win on collision.
        let mut features: FeatureVector = ratios.entries().into_iter().collect();
        features.merge(eyes.entries());
        let features = features.rounded(self.config.decimals);

        debug!(num_features = features.len(), "analysed face");

        Ok(Outcome::Features(Box::new(FaceAnalysis {
            features,
            measurements,
            ratios,
            eyes,
            constructed_points,
        })))
    }

    /// Convenience for callers that only need the feature vector.
    ///
    /// Degenerate geometry yields an empty vector.
    pub fn features(&self, landmarks: &LandmarkSet) -> Result<FeatureVector> {
        Ok(self.analyze(landmarks)?.feature_vector())
    }

    /// Run `detector` on `image` and analyse the face it finds.
    pub fn process<D: LandmarkDetector>(&self, detector: &mut D, image: &D::Image) -> Result<Outcome> {
        match detector.detect(image)? {
            Some(landmarks) => self.analyze(&landmarks),
            None => {
                debug!("no face detected");
                Ok(Outcome::NoFace)
            }
        }
    }
}
