use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid landmark set: index {index} out of bounds for {len} landmarks")]
    InvalidLandmarkSet { index: usize, len: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Landmark detector error: {0}")]
    Detector(String),
}

pub type Result<T> = std::result::Result<T, Error>;
