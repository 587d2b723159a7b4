use super::mock_vision::MockImage;
use lane_detection::error::{LaneError, Result};
use lane_detection::video_processor::{Display, FrameSink, FrameSource, VideoProperties};
use std::collections::VecDeque;

pub struct MockSource {
    pub properties: VideoProperties,
    pub frames: VecDeque<MockImage>,
    /// Number of successful reads after which the next read fails.
    pub fail_after: Option<usize>,
    pub reads: usize,
    pub released: u32,
}

impl MockSource {
    pub fn new(width: i32, height: i32, frame_count: u64) -> Self {
        Self {
            properties: VideoProperties {
                width,
                height,
                fps: 30.0,
                total_frames: frame_count as i64,
            },
            frames: (0..frame_count)
                .map(|id| MockImage::color(width, height, id))
                .collect(),
            fail_after: None,
            reads: 0,
            released: 0,
        }
    }
}

impl FrameSource for MockSource {
    type Frame = MockImage;

    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn read_frame(&mut self) -> Result<Option<MockImage>> {
        assert_eq!(self.released, 0, "read after release");
        if self.fail_after == Some(self.reads) {
            return Err(LaneError::Vision("corrupt packet".to_string()));
        }
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.reads += 1;
        }
        Ok(frame)
    }

    fn release(&mut self) -> Result<()> {
        self.released += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockSink {
    pub written: Vec<MockImage>,
    pub fail_on_write: Option<usize>,
    pub released: u32,
}

impl FrameSink<MockImage> for MockSink {
    fn write_frame(&mut self, frame: &MockImage) -> Result<()> {
        assert_eq!(self.released, 0, "write after release");
        if self.fail_on_write == Some(self.written.len()) {
            return Err(LaneError::io("out.mp4", "disk full"));
        }
        self.written.push(frame.clone());
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.released += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockDisplay {
    pub shown: usize,
    /// Report a quit key once this many frames were shown.
    pub quit_after: Option<usize>,
    pub closed: u32,
}

impl Display<MockImage> for MockDisplay {
    fn show(&mut self, _frame: &MockImage) -> Result<()> {
        self.shown += 1;
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        Ok(self.quit_after == Some(self.shown))
    }

    fn close(&mut self) -> Result<()> {
        self.closed += 1;
        Ok(())
    }
}
