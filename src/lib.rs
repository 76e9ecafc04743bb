//! # face-ratios
//!
//! Facial proportion features from 2D face-mesh landmarks.
//!
//! This crate provides:
//! - **Face Measurements**: distances and jaw angles between canonical landmarks
//! - **Proportions**: face, forehead, midface, nose, mouth and lip ratios
//! - **Eye Metrics**: eye aspect ratio, upper-lid curvature and bilateral symmetry
//!
//! The landmark detector itself is not part of this crate. It is modelled by the
//! [`LandmarkDetector`] trait; anything producing the 468-point face-mesh layout
//! in normalized [0,1] coordinates can feed the analyzer.
//!
//! ## Pipeline
//!
//! 1. Resolve the named landmarks (chin, nose, brows, mouth corners, ...)
//! 2. Measure raw distances and jaw angles, and construct the forehead vertex
//! 3. Divide measurements into ratios; a zero face length stops here with
//!    [`Outcome::NoFaceGeometry`]
//! 4. Compute eye metrics from the same landmarks
//! 5. Merge both into one [`FeatureVector`], rounded to 3 decimal places
//!
//! ## Quick Start
//!
//! ```rust
//! use face_ratios::{FaceAnalyzer, LandmarkSet, Outcome, Point, MEDIAPIPE_LANDMARK_COUNT};
//!
//! // Normally these come from a face-mesh detector.
//! let landmarks = LandmarkSet::new(vec![Point::zero(); MEDIAPIPE_LANDMARK_COUNT]);
//!
//! let analyzer = FaceAnalyzer::new();
//! match analyzer.analyze(&landmarks).unwrap() {
//!     Outcome::Features(analysis) => {
//!         for (name, value) in analysis.features.iter() {
//!             println!("{name}: {value}");
//!         }
//!     }
//!     // Every landmark sits on the same spot, so the face has no length.
//!     Outcome::NoFaceGeometry => println!("degenerate face"),
//!     Outcome::NoFace => println!("no face"),
//! }
//! ```
//!
//! ## Custom Detectors
//!
//! Implement [`LandmarkDetector`] for your own model:
//!
//! ```rust
//! use face_ratios::{FaceAnalyzer, LandmarkDetector, LandmarkSet, Outcome, Result};
//!
//! struct NoFaces;
//!
//! impl LandmarkDetector for NoFaces {
//!     type Image = [u8];
//!
//!     fn detect(&mut self, _image: &[u8]) -> Result<Option<LandmarkSet>> {
//!         Ok(None)
//!     }
//! }
//!
//! let outcome = FaceAnalyzer::new().process(&mut NoFaces, &[0u8; 16][..]).unwrap();
//! assert_eq!(outcome, Outcome::NoFace);
//! ```

mod analyzer;
mod config;
mod error;
mod eyes;
mod features;
pub mod landmarks;
mod metrics;
mod types;

pub use analyzer::{FaceAnalysis, FaceAnalyzer, LandmarkDetector, Outcome};
pub use config::{AnalyzerConfig, SymmetryWeights};
pub use error::{Error, Result};
pub use eyes::{EyeAnalyzer, EyeMetrics, EyeShape};
pub use features::{round_to, FeatureVector, FEATURE_KEYS};
pub use metrics::{angle, distance, ConstructedPoints, FaceMeasurer, FaceRatios, Measurements};
pub use types::{LandmarkSet, Point, MEDIAPIPE_LANDMARK_COUNT};
