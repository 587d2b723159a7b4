use lane_detection::config::HoughConfig;
use lane_detection::error::{LaneError, Result};
use lane_detection::types::{Bgr, LineSegment, Point};
use lane_detection::vision::{Raster, VisionBackend};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Color,
    Gray,
    Blurred,
    Edges,
    Masked,
    Blank,
    Blended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawnLine {
    pub from: Point,
    pub to: Point,
    pub color: Bgr,
    pub thickness: i32,
}

/// Stand-in image: carries its frame id through every stage plus whatever
/// was drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockImage {
    pub width: i32,
    pub height: i32,
    pub frame_id: u64,
    pub kind: Kind,
    pub lines: Vec<DrawnLine>,
    pub painted: Option<Bgr>,
}

impl MockImage {
    pub fn color(width: i32, height: i32, frame_id: u64) -> Self {
        Self {
            width,
            height,
            frame_id,
            kind: Kind::Color,
            lines: Vec::new(),
            painted: None,
        }
    }

    fn derive(&self, kind: Kind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
            painted: None,
            ..self.clone()
        }
    }
}

impl Raster for MockImage {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

/// Returns canned segments per frame id and records every call.
#[derive(Default)]
pub struct MockVision {
    pub default_segments: Vec<LineSegment>,
    pub segments_by_frame: HashMap<u64, Vec<LineSegment>>,
    pub fail_on_frame: Option<u64>,
    pub calls: RefCell<Vec<String>>,
}

impl MockVision {
    pub fn with_segments(segments: Vec<LineSegment>) -> Self {
        Self {
            default_segments: segments,
            ..Default::default()
        }
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

impl VisionBackend for MockVision {
    type Image = MockImage;

    fn grayscale(&self, frame: &MockImage) -> Result<MockImage> {
        self.log("grayscale");
        if self.fail_on_frame == Some(frame.frame_id) {
            return Err(LaneError::Vision(format!(
                "synthetic failure on frame {}",
                frame.frame_id
            )));
        }
        Ok(frame.derive(Kind::Gray))
    }

    fn gaussian_blur(&self, image: &MockImage, kernel_size: i32) -> Result<MockImage> {
        self.log(format!("blur:{}", kernel_size));
        Ok(image.derive(Kind::Blurred))
    }

    fn canny(&self, image: &MockImage, low: f64, high: f64) -> Result<MockImage> {
        self.log(format!("canny:{}:{}", low, high));
        Ok(image.derive(Kind::Edges))
    }

    fn mask_polygon(&self, image: &MockImage, polygon: &[Point]) -> Result<MockImage> {
        self.log(format!("mask:{}", polygon.len()));
        Ok(image.derive(Kind::Masked))
    }

    fn detect_segments(&self, edges: &MockImage, _params: &HoughConfig) -> Result<Vec<LineSegment>> {
        self.log("hough");
        assert_eq!(edges.kind, Kind::Masked, "segments must come from the masked edge map");
        Ok(self
            .segments_by_frame
            .get(&edges.frame_id)
            .unwrap_or(&self.default_segments)
            .clone())
    }

    fn copy(&self, image: &MockImage) -> Result<MockImage> {
        self.log("copy");
        Ok(image.clone())
    }

    fn blank_like(&self, frame: &MockImage) -> Result<MockImage> {
        self.log("blank");
        Ok(frame.derive(Kind::Blank))
    }

    fn draw_line(
        &self,
        canvas: &mut MockImage,
        from: Point,
        to: Point,
        color: Bgr,
        thickness: i32,
    ) -> Result<()> {
        self.log("line");
        canvas.lines.push(DrawnLine {
            from,
            to,
            color,
            thickness,
        });
        Ok(())
    }

    fn paint_mask(&self, canvas: &mut MockImage, mask: &MockImage, color: Bgr) -> Result<()> {
        self.log("paint");
        assert_eq!(mask.kind, Kind::Masked);
        canvas.painted = Some(color);
        Ok(())
    }

    fn blend(
        &self,
        original: &MockImage,
        beta: f64,
        overlay: &MockImage,
        alpha: f64,
        gamma: f64,
    ) -> Result<MockImage> {
        self.log(format!("blend:{}:{}:{}", beta, alpha, gamma));
        assert_eq!(original.kind, Kind::Color);
        assert_eq!(overlay.kind, Kind::Blank);
        Ok(MockImage {
            kind: Kind::Blended,
            ..overlay.clone()
        })
    }
}
