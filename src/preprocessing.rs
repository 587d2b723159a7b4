// src/preprocessing.rs

use crate::config::{validate_edge_thresholds, EdgeConfig, PreprocessConfig};
use crate::error::{LaneError, Result};
use crate::vision::{Raster, VisionBackend};
use tracing::trace;

/// Grayscale + Gaussian smoothing ahead of edge extraction.
#[derive(Debug, Clone, Copy)]
pub struct Preprocessor {
    kernel_size: i32,
}

impl Preprocessor {
    pub fn new(config: &PreprocessConfig) -> Result<Self> {
        let kernel_size = config.kernel_size;
        if kernel_size < 1 || kernel_size % 2 == 0 {
            return Err(LaneError::invalid_parameter(format!(
                "blur kernel size must be a positive odd number, got {}",
                kernel_size
            )));
        }
        Ok(Self { kernel_size })
    }

    pub fn run<B: VisionBackend>(&self, backend: &B, frame: &B::Image) -> Result<B::Image> {
        if frame.is_empty_area() {
            return Err(LaneError::InvalidInput(format!(
                "frame has zero area ({}x{})",
                frame.width(),
                frame.height()
            )));
        }

        let gray = backend.grayscale(frame)?;
        let blurred = backend.gaussian_blur(&gray, self.kernel_size)?;
        trace!(
            "Preprocessed {}x{} frame (kernel {})",
            frame.width(),
            frame.height(),
            self.kernel_size
        );
        Ok(blurred)
    }
}

/// Canny edge map with validated hysteresis thresholds.
#[derive(Debug, Clone, Copy)]
pub struct EdgeExtractor {
    low: f64,
    high: f64,
}

impl EdgeExtractor {
    pub fn new(config: &EdgeConfig) -> Result<Self> {
        validate_edge_thresholds(config.low_threshold, config.high_threshold)?;
        Ok(Self {
            low: config.low_threshold,
            high: config.high_threshold,
        })
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    pub fn extract<B: VisionBackend>(&self, backend: &B, smoothed: &B::Image) -> Result<B::Image> {
        backend.canny(smoothed, self.low, self.high)
    }
}
