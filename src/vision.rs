// src/vision.rs
//
// Narrow seam over the external image-processing library. The fitter and the
// run loop only see these capabilities, so they can be driven with synthetic
// images and segment collections in tests.

use crate::config::HoughConfig;
use crate::error::Result;
use crate::types::{Bgr, LineSegment, Point};

/// Anything with pixel dimensions.
pub trait Raster {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn is_empty_area(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

pub trait VisionBackend {
    type Image: Raster;

    /// Color frame -> single-channel luminance.
    fn grayscale(&self, frame: &Self::Image) -> Result<Self::Image>;

    /// Square Gaussian smoothing, `kernel_size` is odd.
    fn gaussian_blur(&self, image: &Self::Image, kernel_size: i32) -> Result<Self::Image>;

    /// Binary edge map of the same dimensions.
    fn canny(&self, image: &Self::Image, low: f64, high: f64) -> Result<Self::Image>;

    /// Zero every pixel outside `polygon`, keep the inside untouched.
    fn mask_polygon(&self, image: &Self::Image, polygon: &[Point]) -> Result<Self::Image>;

    /// Probabilistic line-segment transform over a binary edge map.
    fn detect_segments(&self, edges: &Self::Image, params: &HoughConfig)
        -> Result<Vec<LineSegment>>;

    /// Deep copy of `image`.
    fn copy(&self, image: &Self::Image) -> Result<Self::Image>;

    /// All-zero image with the size and type of `frame`.
    fn blank_like(&self, frame: &Self::Image) -> Result<Self::Image>;

    fn draw_line(
        &self,
        canvas: &mut Self::Image,
        from: Point,
        to: Point,
        color: Bgr,
        thickness: i32,
    ) -> Result<()>;

    /// Paint `color` on `canvas` wherever the single-channel `mask` is non-zero.
    fn paint_mask(&self, canvas: &mut Self::Image, mask: &Self::Image, color: Bgr) -> Result<()>;

    /// `original * beta + overlay * alpha + gamma`, saturated per channel.
    fn blend(
        &self,
        original: &Self::Image,
        beta: f64,
        overlay: &Self::Image,
        alpha: f64,
        gamma: f64,
    ) -> Result<Self::Image>;
}
