// src/video_processor.rs
//
// Frame source / sink / display seams used by the run loop. OpenCV-backed
// implementations live in `opencv_backend`.

use crate::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoProperties {
    pub width: i32,
    pub height: i32,
    pub fps: f64,
    /// As reported by the container; may be 0 or inaccurate.
    pub total_frames: i64,
}

pub trait FrameSource {
    type Frame;

    fn properties(&self) -> VideoProperties;

    /// `Ok(None)` at end of stream.
    fn read_frame(&mut self) -> Result<Option<Self::Frame>>;

    /// Must be safe to call more than once.
    fn release(&mut self) -> Result<()>;
}

pub trait FrameSink<F> {
    fn write_frame(&mut self, frame: &F) -> Result<()>;

    /// Must be safe to call more than once.
    fn release(&mut self) -> Result<()>;
}

/// Interactive preview window.
pub trait Display<F> {
    fn show(&mut self, frame: &F) -> Result<()>;

    /// Poll input once; `true` when the user asked to quit.
    fn quit_requested(&mut self) -> Result<bool>;

    fn close(&mut self) -> Result<()>;
}
