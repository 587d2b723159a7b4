// src/config.rs

use crate::error::{LaneError, Result as LaneResult};
use crate::types::Bgr;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preprocess: PreprocessConfig,
    pub edges: EdgeConfig,
    pub region: RegionConfig,
    pub hough: HoughConfig,
    pub fit: FitConfig,
    pub smoothing: SmoothingConfig,
    pub overlay: OverlayConfig,
    pub video: VideoConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    pub kernel_size: i32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f64,
    pub high_threshold: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 50.0,
            high_threshold: 150.0,
        }
    }
}

/// Region of interest as `[x, y]` fractions of frame width/height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    pub vertices: Vec<[f64; 2]>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        // Bottom corners of the frame narrowing toward the upper lane anchor.
        Self {
            vertices: vec![[0.0, 1.0], [0.45, 0.6], [0.55, 0.6], [1.0, 1.0]],
        }
    }
}

/// Probabilistic Hough transform parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughConfig {
    /// Distance resolution in pixels
    pub rho: f64,
    /// Angle resolution in radians
    pub theta: f64,
    /// Minimum number of votes
    pub threshold: i32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
}

impl Default for HoughConfig {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            threshold: 15,
            min_line_length: 40.0,
            max_line_gap: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Segments with `|slope| <= slope_threshold` are discarded as near-horizontal.
    pub slope_threshold: f64,
    /// Upper anchor as a fraction of frame height.
    pub top_fraction: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 0.3,
            top_fraction: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    pub enabled: bool,
    /// Weight of the newest frame in the moving average.
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            alpha: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub color: Bgr,
    pub thickness: i32,
    /// Overlay weight
    pub alpha: f64,
    /// Original frame weight
    pub beta: f64,
    pub gamma: f64,
    pub show_region: bool,
    pub region_color: Bgr,
    pub show_edges: bool,
    pub edge_color: Bgr,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: Bgr::RED,
            thickness: 10,
            alpha: 0.8,
            beta: 1.0,
            gamma: 0.0,
            show_region: false,
            region_color: Bgr::YELLOW,
            show_edges: false,
            edge_color: Bgr::GREEN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Four character codec identifier for the output container.
    pub codec: String,
    pub progress_interval: u64,
    pub window_name: String,
    pub quit_key: char,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            codec: "mp4v".to_string(),
            progress_interval: 100,
            window_name: "Lane Detection".to_string(),
            quit_key: 'q',
        }
    }
}

impl VideoConfig {
    pub fn fourcc(&self) -> LaneResult<[char; 4]> {
        let chars: Vec<char> = self.codec.chars().collect();
        match chars.as_slice() {
            [a, b, c, d] if chars.iter().all(char::is_ascii) => Ok([*a, *b, *c, *d]),
            _ => Err(LaneError::invalid_parameter(format!(
                "video.codec must be 4 ASCII characters, got {:?}",
                self.codec
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Reject malformed parameters before any frame is processed.
    pub fn validate(&self) -> LaneResult<()> {
        let k = self.preprocess.kernel_size;
        if k < 1 || k % 2 == 0 {
            return Err(LaneError::invalid_parameter(format!(
                "preprocess.kernel_size must be a positive odd number, got {}",
                k
            )));
        }

        validate_edge_thresholds(self.edges.low_threshold, self.edges.high_threshold)?;

        let h = &self.hough;
        if !(h.rho > 0.0) || !(h.theta > 0.0) || h.threshold <= 0 {
            return Err(LaneError::invalid_parameter(
                "hough.rho, hough.theta and hough.threshold must be positive",
            ));
        }
        if h.min_line_length < 0.0 || h.max_line_gap < 0.0 {
            return Err(LaneError::invalid_parameter(
                "hough.min_line_length and hough.max_line_gap must be non-negative",
            ));
        }

        if !(self.fit.slope_threshold >= 0.0) {
            return Err(LaneError::invalid_parameter(
                "fit.slope_threshold must be non-negative",
            ));
        }
        if !(self.fit.top_fraction > 0.0 && self.fit.top_fraction < 1.0) {
            return Err(LaneError::invalid_parameter(format!(
                "fit.top_fraction must be in (0, 1), got {}",
                self.fit.top_fraction
            )));
        }

        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return Err(LaneError::invalid_parameter(format!(
                "smoothing.alpha must be in (0, 1], got {}",
                self.smoothing.alpha
            )));
        }

        if self.overlay.thickness <= 0 {
            return Err(LaneError::invalid_parameter(
                "overlay.thickness must be positive",
            ));
        }

        if self.video.progress_interval == 0 {
            return Err(LaneError::invalid_parameter(
                "video.progress_interval must be positive",
            ));
        }
        self.video.fourcc()?;

        crate::region::validate_normalized(&self.region.vertices)?;

        Ok(())
    }
}

pub fn validate_edge_thresholds(low: f64, high: f64) -> LaneResult<()> {
    if !(low >= 0.0) || !(high >= 0.0) {
        return Err(LaneError::invalid_parameter(format!(
            "edge thresholds must be non-negative, got low={} high={}",
            low, high
        )));
    }
    if low >= high {
        return Err(LaneError::invalid_parameter(format!(
            "edge low threshold must be below high threshold, got low={} high={}",
            low, high
        )));
    }
    Ok(())
}
