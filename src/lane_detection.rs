// src/lane_detection.rs
//
// Turns raw Hough segments into at most two straight lane boundaries.
// Memoryless: every call depends only on its own segments and frame height.

use crate::config::FitConfig;
use crate::error::{LaneError, Result};
use crate::types::{LaneFit, LaneLine, LaneResult, LineSegment, Point, Side, SlopeIntercept};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneFitter {
    slope_threshold: f64,
    top_fraction: f64,
}

impl Default for LaneFitter {
    fn default() -> Self {
        Self::new(&FitConfig::default())
    }
}

impl LaneFitter {
    pub fn new(config: &FitConfig) -> Self {
        Self {
            slope_threshold: config.slope_threshold,
            top_fraction: config.top_fraction,
        }
    }

    /// Which side a slope belongs to. The deadband boundary is exclusive:
    /// `|slope| <= slope_threshold` is near-horizontal noise.
    pub fn classify(&self, slope: f64) -> Option<Side> {
        if slope < -self.slope_threshold {
            Some(Side::Left)
        } else if slope > self.slope_threshold {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// Split segments into (left, right) slope/intercept groups.
    /// Vertical segments never reach either group.
    pub fn group(&self, segments: &[LineSegment]) -> (Vec<SlopeIntercept>, Vec<SlopeIntercept>) {
        let mut left = Vec::new();
        let mut right = Vec::new();

        for line in segments.iter().filter_map(LineSegment::slope_intercept) {
            match self.classify(line.slope) {
                Some(Side::Left) => left.push(line),
                Some(Side::Right) => right.push(line),
                None => {}
            }
        }

        (left, right)
    }

    /// Averaged line for each side, before extrapolation.
    pub fn fit_lines(&self, segments: &[LineSegment]) -> LaneFit {
        let (left, right) = self.group(segments);
        LaneFit {
            left: average(&left),
            right: average(&right),
        }
    }

    /// `(y_bottom, y_top)` anchors for a frame of `frame_height` rows.
    pub fn anchors(&self, frame_height: i32) -> (i32, i32) {
        let y_top = (f64::from(frame_height) * self.top_fraction).round() as i32;
        (frame_height, y_top)
    }

    /// Extend an averaged line from the image bottom up to the upper anchor.
    pub fn extrapolate(
        &self,
        side: Side,
        line: SlopeIntercept,
        frame_height: i32,
    ) -> Result<LaneLine> {
        if line.slope == 0.0 || !line.slope.is_finite() {
            return Err(LaneError::DegenerateFit {
                side,
                slope: line.slope,
            });
        }

        let (y_bottom, y_top) = self.anchors(frame_height);
        let x_bottom = line.x_at(f64::from(y_bottom));
        let x_top = line.x_at(f64::from(y_top));
        if !x_bottom.is_finite() || !x_top.is_finite() {
            return Err(LaneError::DegenerateFit {
                side,
                slope: line.slope,
            });
        }

        // x truncates toward zero
        Ok(LaneLine {
            bottom: Point::new(x_bottom as i32, y_bottom),
            top: Point::new(x_top as i32, y_top),
        })
    }

    /// Extrapolate both sides. A degenerate side becomes absent for this frame.
    pub fn resolve(&self, fit: &LaneFit, frame_height: i32) -> LaneResult {
        let extend = |side: Side, line: Option<SlopeIntercept>| {
            line.and_then(|l| match self.extrapolate(side, l, frame_height) {
                Ok(lane) => Some(lane),
                Err(e) => {
                    debug!("Dropping lane line: {}", e);
                    None
                }
            })
        };

        LaneResult {
            left: extend(Side::Left, fit.left),
            right: extend(Side::Right, fit.right),
        }
    }

    pub fn fit(&self, segments: &[LineSegment], frame_height: i32) -> LaneResult {
        self.resolve(&self.fit_lines(segments), frame_height)
    }
}

/// Arithmetic mean of slope and intercept; every segment weighs the same
/// regardless of its length.
pub fn average(group: &[SlopeIntercept]) -> Option<SlopeIntercept> {
    if group.is_empty() {
        return None;
    }
    let n = group.len() as f64;
    let slope = group.iter().map(|l| l.slope).sum::<f64>() / n;
    let intercept = group.iter().map(|l| l.intercept).sum::<f64>() / n;
    Some(SlopeIntercept { slope, intercept })
}
