// src/types.rs

use serde::{Deserialize, Serialize};

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Raw `(x1, y1, x2, y2)` candidate produced by the segment detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// `y = slope * x + intercept` form, `None` for vertical segments.
    pub fn slope_intercept(&self) -> Option<SlopeIntercept> {
        if self.is_vertical() {
            return None;
        }
        let slope = f64::from(self.y2 - self.y1) / f64::from(self.x2 - self.x1);
        let intercept = f64::from(self.y1) - slope * f64::from(self.x1);
        Some(SlopeIntercept { slope, intercept })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeIntercept {
    pub slope: f64,
    pub intercept: f64,
}

impl SlopeIntercept {
    /// Solve `x = (y - intercept) / slope`.
    pub fn x_at(&self, y: f64) -> f64 {
        (y - self.intercept) / self.slope
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Extrapolated lane boundary. `bottom.y` is the frame height, `top.y` the upper anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneLine {
    pub bottom: Point,
    pub top: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneResult {
    pub left: Option<LaneLine>,
    pub right: Option<LaneLine>,
}

impl LaneResult {
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Side, &LaneLine)> {
        self.left
            .iter()
            .map(|l| (Side::Left, l))
            .chain(self.right.iter().map(|l| (Side::Right, l)))
    }
}

/// Averaged line per side, before extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LaneFit {
    pub left: Option<SlopeIntercept>,
    pub right: Option<SlopeIntercept>,
}

/// BGR color, matching OpenCV channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bgr(pub u8, pub u8, pub u8);

impl Bgr {
    pub const RED: Bgr = Bgr(0, 0, 255);
    pub const GREEN: Bgr = Bgr(0, 255, 0);
    pub const YELLOW: Bgr = Bgr(0, 255, 255);
}
