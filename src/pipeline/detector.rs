// src/pipeline/detector.rs
//
// One frame through the whole chain:
// preprocess -> edges -> region mask -> segments -> fit -> composite.

use super::frame_context::FrameContext;
use crate::config::{Config, HoughConfig};
use crate::error::Result;
use crate::lane_detection::LaneFitter;
use crate::overlay::{Compositor, DebugLayers};
use crate::preprocessing::{EdgeExtractor, Preprocessor};
use crate::region::RegionOfInterest;
use crate::smoother::LaneSmoother;
use crate::vision::{Raster, VisionBackend};
use tracing::{debug, trace};

pub struct LaneDetector {
    preprocessor: Preprocessor,
    edge_extractor: EdgeExtractor,
    region: RegionOfInterest,
    hough: HoughConfig,
    fitter: LaneFitter,
    smoother: Option<LaneSmoother>,
    compositor: Compositor,
}

impl LaneDetector {
    /// Build the per-frame chain for a `width` x `height` video.
    pub fn new(config: &Config, width: i32, height: i32) -> Result<Self> {
        config.validate()?;

        let region = RegionOfInterest::from_config(&config.region, width, height)?;
        debug!("Region of interest: {:?}", region.vertices());

        let smoother = LaneSmoother::from_config(&config.smoothing);
        if smoother.is_some() {
            debug!(
                "Temporal smoothing enabled (alpha={:.2})",
                config.smoothing.alpha
            );
        }

        Ok(Self {
            preprocessor: Preprocessor::new(&config.preprocess)?,
            edge_extractor: EdgeExtractor::new(&config.edges)?,
            region,
            hough: config.hough.clone(),
            fitter: LaneFitter::new(&config.fit),
            smoother,
            compositor: Compositor::new(&config.overlay)?,
        })
    }

    pub fn region(&self) -> &RegionOfInterest {
        &self.region
    }

    /// Run detection and fitting on one color frame.
    pub fn detect<B: VisionBackend>(
        &mut self,
        backend: &B,
        frame: &B::Image,
        frame_id: u64,
    ) -> Result<FrameContext<B::Image>> {
        let smoothed = self.preprocessor.run(backend, frame)?;
        let edges = self.edge_extractor.extract(backend, &smoothed)?;
        let masked = self.region.apply(backend, &edges)?;
        let segments = backend.detect_segments(&masked, &self.hough)?;

        let mut fit = self.fitter.fit_lines(&segments);
        if let Some(smoother) = self.smoother.as_mut() {
            fit = smoother.smooth(fit);
        }
        let lanes = self.fitter.resolve(&fit, frame.height());

        trace!(
            "Frame {}: {} segments, left={} right={}",
            frame_id,
            segments.len(),
            lanes.left.is_some(),
            lanes.right.is_some()
        );

        let keep_edges = self.compositor.style().show_edges;
        Ok(FrameContext {
            frame_id,
            frame_width: frame.width(),
            frame_height: frame.height(),
            segments,
            fit,
            lanes,
            edges: keep_edges.then_some(masked),
        })
    }

    /// Composite the lanes (and any enabled debug layers) onto the frame.
    pub fn render<B: VisionBackend>(
        &self,
        backend: &B,
        frame: &B::Image,
        ctx: &FrameContext<B::Image>,
    ) -> Result<B::Image> {
        let layers = DebugLayers {
            region: Some(&self.region),
            edges: ctx.edges.as_ref(),
        };
        self.compositor
            .compose_with(backend, frame, &ctx.lanes, layers)
    }

    pub fn process<B: VisionBackend>(
        &mut self,
        backend: &B,
        frame: &B::Image,
        frame_id: u64,
    ) -> Result<(B::Image, FrameContext<B::Image>)> {
        let ctx = self.detect(backend, frame, frame_id)?;
        let output = self.render(backend, frame, &ctx)?;
        Ok((output, ctx))
    }
}
