// src/overlay.rs
//
// Draws the fitted lane lines on a blank layer and alpha-blends it onto the
// original frame: output = original * beta + overlay * alpha + gamma.

use crate::config::OverlayConfig;
use crate::error::{LaneError, Result};
use crate::region::RegionOfInterest;
use crate::types::LaneResult;
use crate::vision::VisionBackend;

const REGION_OUTLINE_THICKNESS: i32 = 2;

/// Optional intermediate imagery to show beneath the lane lines.
pub struct DebugLayers<'a, I> {
    pub region: Option<&'a RegionOfInterest>,
    pub edges: Option<&'a I>,
}

impl<I> Default for DebugLayers<'_, I> {
    fn default() -> Self {
        Self {
            region: None,
            edges: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compositor {
    style: OverlayConfig,
}

impl Compositor {
    pub fn new(style: &OverlayConfig) -> Result<Self> {
        if style.thickness <= 0 {
            return Err(LaneError::invalid_parameter(format!(
                "lane line thickness must be positive, got {}",
                style.thickness
            )));
        }
        Ok(Self {
            style: style.clone(),
        })
    }

    pub fn style(&self) -> &OverlayConfig {
        &self.style
    }

    pub fn compose<B: VisionBackend>(
        &self,
        backend: &B,
        frame: &B::Image,
        lanes: &LaneResult,
    ) -> Result<B::Image> {
        self.compose_with(backend, frame, lanes, DebugLayers::default())
    }

    pub fn compose_with<B: VisionBackend>(
        &self,
        backend: &B,
        frame: &B::Image,
        lanes: &LaneResult,
        layers: DebugLayers<'_, B::Image>,
    ) -> Result<B::Image> {
        let region = layers.region.filter(|_| self.style.show_region);
        let edges = layers.edges.filter(|_| self.style.show_edges);

        // Nothing to draw: the frame goes out untouched.
        if lanes.is_empty() && region.is_none() && edges.is_none() {
            return backend.copy(frame);
        }

        let mut overlay = backend.blank_like(frame)?;

        if let Some(edges) = edges {
            backend.paint_mask(&mut overlay, edges, self.style.edge_color)?;
        }

        if let Some(roi) = region {
            for (from, to) in roi.outline() {
                backend.draw_line(
                    &mut overlay,
                    from,
                    to,
                    self.style.region_color,
                    REGION_OUTLINE_THICKNESS,
                )?;
            }
        }

        for (_, lane) in lanes.lines() {
            backend.draw_line(
                &mut overlay,
                lane.bottom,
                lane.top,
                self.style.color,
                self.style.thickness,
            )?;
        }

        backend.blend(
            frame,
            self.style.beta,
            &overlay,
            self.style.alpha,
            self.style.gamma,
        )
    }
}
