use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Weights of the width, height and curvature terms in the eye asymmetry score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymmetryWeights {
    pub width: f64,
    pub height: f64,
    pub curvature: f64,
}

impl Default for SymmetryWeights {
    fn default() -> Self {
        Self {
            width: 0.3,
            height: 0.3,
            curvature: 0.4,
        }
    }
}

/// Tunable constants of the measurement pipeline.
///
/// The defaults produce the reference feature vector; a config file only
/// needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Forehead height as a multiple of the hairline-to-brow distance.
    pub forehead_scale: f64,
    /// Substituted for a zero eye width or interocular distance.
    pub eye_epsilon: f64,
    pub symmetry_weights: SymmetryWeights,
    /// Decimal places kept in the output feature vector.
    pub decimals: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            forehead_scale: 1.7,
            eye_epsilon: 0.001,
            symmetry_weights: SymmetryWeights::default(),
            decimals: 3,
        }
    }
}

impl AnalyzerConfig {
    /// Load and validate a config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.forehead_scale.is_finite() || self.forehead_scale < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "forehead_scale must be finite and non-negative, got {}",
                self.forehead_scale
            )));
        }
        if !self.eye_epsilon.is_finite() || self.eye_epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "eye_epsilon must be finite and positive, got {}",
                self.eye_epsilon
            )));
        }

        let w = &self.symmetry_weights;
        for (name, value) in [
            ("width", w.width),
            ("height", w.height),
            ("curvature", w.curvature),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "symmetry weight `{name}` must be finite and non-negative, got {value}"
                )));
            }
        }
        let sum = w.width + w.height + w.curvature;
        if (sum - 1.0).abs() > 1e-9 {
            return Err(Error::InvalidConfig(format!(
                "symmetry weights must sum to 1, got {sum}"
            )));
        }

        // f64 carries ~15 significant digits
        if self.decimals > 15 {
            return Err(Error::InvalidConfig(format!(
                "decimals must be at most 15, got {}",
                self.decimals
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.forehead_scale, 1.7);
        assert_eq!(config.decimals, 3);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"forehead_scale": 1.5, "symmetry_weights": {{"width": 0.5, "height": 0.1}}}}"#)
            .unwrap();

        let config = AnalyzerConfig::load(file.path()).unwrap();
        assert_eq!(config.forehead_scale, 1.5);
        assert_eq!(config.eye_epsilon, 0.001);
        assert_eq!(config.symmetry_weights.width, 0.5);
        assert_eq!(config.symmetry_weights.curvature, 0.4);
    }

    #[test]
    fn rejects_bad_weights() {
        let mut config = AnalyzerConfig::default();
        config.symmetry_weights.curvature = 0.9;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = AnalyzerConfig::default();
        config.symmetry_weights.width = -0.1;
        config.symmetry_weights.height = 0.7;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        let config = AnalyzerConfig {
            eye_epsilon: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
