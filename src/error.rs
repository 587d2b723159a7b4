// src/error.rs

use crate::types::Side;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LaneError>;

#[derive(Debug, Error)]
pub enum LaneError {
    /// Input source or output sink could not be opened.
    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// A frame that cannot be processed (e.g. zero area).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Malformed thresholds, kernel sizes, polygons, codecs...
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Averaged slope is zero (or not finite), so the line cannot be extrapolated.
    #[error("degenerate fit on {side:?} side: averaged slope {slope}")]
    DegenerateFit { side: Side, slope: f64 },

    /// Failure reported by a vision backend that is not OpenCV.
    #[error("vision backend error: {0}")]
    Vision(String),

    #[cfg(feature = "opencv")]
    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),
}

impl LaneError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn io(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
