// src/region.rs
//
// Fixed region-of-interest polygon. Anchored to the frame dimensions once per
// run, never adapted per frame.

use crate::config::RegionConfig;
use crate::error::{LaneError, Result};
use crate::types::Point;
use crate::vision::VisionBackend;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOfInterest {
    vertices: Vec<Point>,
}

impl RegionOfInterest {
    pub fn new(vertices: Vec<Point>) -> Result<Self> {
        check_simple_polygon(&to_f64(&vertices))?;
        Ok(Self { vertices })
    }

    /// Scale the normalized config polygon to a `width` x `height` frame.
    ///
    /// Only the normalized polygon is validated. On frames small enough for
    /// rounding to collapse it, the mask falls back to the whole frame.
    pub fn from_config(config: &RegionConfig, width: i32, height: i32) -> Result<Self> {
        validate_normalized(&config.vertices)?;

        let mut vertices: Vec<Point> = Vec::with_capacity(config.vertices.len());
        for [fx, fy] in &config.vertices {
            let p = Point::new(
                (fx * f64::from(width)).round() as i32,
                (fy * f64::from(height)).round() as i32,
            );
            if vertices.last() != Some(&p) {
                vertices.push(p);
            }
        }
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 || twice_area(&to_f64(&vertices)) == 0.0 {
            debug!(
                "Region polygon collapses on a {}x{} frame, masking the full frame",
                width, height
            );
            vertices = vec![
                Point::new(0, 0),
                Point::new(width, 0),
                Point::new(width, height),
                Point::new(0, height),
            ];
        }

        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Closed outline as consecutive vertex pairs, last vertex back to the first.
    pub fn outline(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Keep only the pixels inside the polygon.
    pub fn apply<B: VisionBackend>(&self, backend: &B, image: &B::Image) -> Result<B::Image> {
        backend.mask_polygon(image, &self.vertices)
    }
}

/// Check a `[x, y]` fraction polygon from configuration.
pub fn validate_normalized(vertices: &[[f64; 2]]) -> Result<()> {
    if let Some([x, y]) = vertices
        .iter()
        .find(|[x, y]| !(0.0..=1.0).contains(x) || !(0.0..=1.0).contains(y))
    {
        return Err(LaneError::invalid_parameter(format!(
            "region vertex [{}, {}] is outside [0, 1]",
            x, y
        )));
    }
    let pts: Vec<(f64, f64)> = vertices.iter().map(|[x, y]| (*x, *y)).collect();
    check_simple_polygon(&pts)
}

fn check_simple_polygon(pts: &[(f64, f64)]) -> Result<()> {
    let n = pts.len();
    if n < 3 {
        return Err(LaneError::invalid_parameter(format!(
            "region polygon needs at least 3 vertices, got {}",
            n
        )));
    }

    if twice_area(pts).abs() <= f64::EPSILON {
        return Err(LaneError::invalid_parameter("region polygon has zero area"));
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            let a = (pts[i], pts[(i + 1) % n]);
            let b = (pts[j], pts[(j + 1) % n]);
            if segments_intersect(a, b) {
                return Err(LaneError::invalid_parameter(format!(
                    "region polygon is self-intersecting (edges {} and {})",
                    i, j
                )));
            }
        }
    }
    Ok(())
}

fn to_f64(vertices: &[Point]) -> Vec<(f64, f64)> {
    vertices
        .iter()
        .map(|p| (f64::from(p.x), f64::from(p.y)))
        .collect()
}

/// Shoelace sum; signed, twice the enclosed area.
fn twice_area(pts: &[(f64, f64)]) -> f64 {
    let n = pts.len();
    (0..n)
        .map(|i| {
            let (x1, y1) = pts[i];
            let (x2, y2) = pts[(i + 1) % n];
            x1 * y2 - x2 * y1
        })
        .sum()
}

type Seg = ((f64, f64), (f64, f64));

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

fn on_segment(a: (f64, f64), b: (f64, f64), p: (f64, f64)) -> bool {
    p.0 >= a.0.min(b.0) && p.0 <= a.0.max(b.0) && p.1 >= a.1.min(b.1) && p.1 <= a.1.max(b.1)
}

fn segments_intersect((p1, p2): Seg, (q1, q2): Seg) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
