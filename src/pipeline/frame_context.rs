// src/pipeline/frame_context.rs
//
// Everything detected on one frame. Built fresh per frame and dropped after
// compositing.

use crate::types::{LaneFit, LaneResult, LineSegment};

#[derive(Debug, Clone)]
pub struct FrameContext<I> {
    pub frame_id: u64,
    pub frame_width: i32,
    pub frame_height: i32,

    /// Raw segment detector output
    pub segments: Vec<LineSegment>,
    /// Averaged lines (after optional smoothing)
    pub fit: LaneFit,
    pub lanes: LaneResult,

    /// Masked edge map, kept only when the overlay shows it
    pub edges: Option<I>,
}

impl<I> FrameContext<I> {
    pub fn has_lanes(&self) -> bool {
        !self.lanes.is_empty()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.lines().count()
    }
}
