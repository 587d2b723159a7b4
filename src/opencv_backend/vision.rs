// src/opencv_backend/vision.rs

use crate::config::HoughConfig;
use crate::error::Result;
use crate::types::{Bgr, LineSegment, Point};
use crate::vision::{Raster, VisionBackend};
use opencv::{
    core::{self, Mat, Vector},
    imgproc,
    prelude::*,
};

impl Raster for Mat {
    fn width(&self) -> i32 {
        self.cols()
    }

    fn height(&self) -> i32 {
        self.rows()
    }
}

fn scalar(color: Bgr) -> core::Scalar {
    core::Scalar::new(f64::from(color.0), f64::from(color.1), f64::from(color.2), 0.0)
}

fn cv_point(p: Point) -> core::Point {
    core::Point::new(p.x, p.y)
}

/// Vision primitives backed by OpenCV `imgproc`/`core`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvVision;

impl OpenCvVision {
    pub fn new() -> Self {
        Self
    }
}

impl VisionBackend for OpenCvVision {
    type Image = Mat;

    fn grayscale(&self, frame: &Mat) -> Result<Mat> {
        let mut gray = Mat::default();
        if frame.channels() == 1 {
            frame.copy_to(&mut gray)?;
        } else {
            imgproc::cvt_color(frame, &mut gray, imgproc::COLOR_BGR2GRAY, 0)?;
        }
        Ok(gray)
    }

    fn gaussian_blur(&self, image: &Mat, kernel_size: i32) -> Result<Mat> {
        let mut blurred = Mat::default();
        imgproc::gaussian_blur(
            image,
            &mut blurred,
            core::Size::new(kernel_size, kernel_size),
            0.0,
            0.0,
            core::BORDER_DEFAULT,
        )?;
        Ok(blurred)
    }

    fn canny(&self, image: &Mat, low: f64, high: f64) -> Result<Mat> {
        let mut edges = Mat::default();
        imgproc::canny(image, &mut edges, low, high, 3, false)?;
        Ok(edges)
    }

    fn mask_polygon(&self, image: &Mat, polygon: &[Point]) -> Result<Mat> {
        let mut mask = Mat::zeros(image.rows(), image.cols(), image.typ())?.to_mat()?;

        let mut pts_vec = Vector::<Vector<core::Point>>::new();
        pts_vec.push(Vector::from_iter(polygon.iter().copied().map(cv_point)));
        imgproc::fill_poly(
            &mut mask,
            &pts_vec,
            core::Scalar::all(255.0),
            imgproc::LINE_8,
            0,
            core::Point::new(0, 0),
        )?;

        let mut masked = Mat::default();
        core::bitwise_and(image, &mask, &mut masked, &Mat::default())?;
        Ok(masked)
    }

    fn detect_segments(&self, edges: &Mat, params: &HoughConfig) -> Result<Vec<LineSegment>> {
        let mut lines = Vector::<core::Vec4i>::new();
        imgproc::hough_lines_p(
            edges,
            &mut lines,
            params.rho,
            params.theta,
            params.threshold,
            params.min_line_length,
            params.max_line_gap,
        )?;

        Ok(lines
            .iter()
            .map(|l| LineSegment::new(l[0], l[1], l[2], l[3]))
            .collect())
    }

    fn copy(&self, image: &Mat) -> Result<Mat> {
        Ok(image.try_clone()?)
    }

    fn blank_like(&self, frame: &Mat) -> Result<Mat> {
        Ok(Mat::zeros(frame.rows(), frame.cols(), frame.typ())?.to_mat()?)
    }

    fn draw_line(
        &self,
        canvas: &mut Mat,
        from: Point,
        to: Point,
        color: Bgr,
        thickness: i32,
    ) -> Result<()> {
        imgproc::line(
            canvas,
            cv_point(from),
            cv_point(to),
            scalar(color),
            thickness,
            imgproc::LINE_8,
            0,
        )?;
        Ok(())
    }

    fn paint_mask(&self, canvas: &mut Mat, mask: &Mat, color: Bgr) -> Result<()> {
        let solid =
            Mat::new_rows_cols_with_default(canvas.rows(), canvas.cols(), canvas.typ(), scalar(color))?;
        solid.copy_to_masked(canvas, mask)?;
        Ok(())
    }

    fn blend(
        &self,
        original: &Mat,
        beta: f64,
        overlay: &Mat,
        alpha: f64,
        gamma: f64,
    ) -> Result<Mat> {
        let mut blended = Mat::default();
        core::add_weighted(original, beta, overlay, alpha, gamma, &mut blended, -1)?;
        Ok(blended)
    }
}
