// src/opencv_backend/video.rs

use crate::error::{LaneError, Result};
use crate::video_processor::{Display, FrameSink, FrameSource, VideoProperties};
use opencv::{
    core::{self, Mat},
    highgui,
    prelude::*,
    videoio::{self, VideoCapture, VideoCaptureTraitConst, VideoWriter},
};
use std::path::Path;
use tracing::{debug, info, warn};

const FALLBACK_FPS: f64 = 30.0;

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| LaneError::io(path.display().to_string(), "path is not valid UTF-8"))
}

pub struct VideoReader {
    cap: VideoCapture,
    properties: VideoProperties,
    released: bool,
}

impl VideoReader {
    pub fn open(path: &Path) -> Result<Self> {
        info!("Opening video: {}", path.display());
        let name = path_str(path)?;

        let cap = VideoCapture::from_file(name, videoio::CAP_ANY)
            .map_err(|e| LaneError::io(name, e.to_string()))?;

        if !cap.is_opened()? {
            return Err(LaneError::io(name, "failed to open video file"));
        }

        let fps = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FPS)?;
        let total_frames = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_COUNT)? as i64;
        let width = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = VideoCaptureTraitConst::get(&cap, videoio::CAP_PROP_FRAME_HEIGHT)? as i32;

        info!(
            "Video properties: {}x{} @ {:.1} FPS, {} frames",
            width, height, fps, total_frames
        );

        Ok(Self {
            cap,
            properties: VideoProperties {
                width,
                height,
                fps,
                total_frames,
            },
            released: false,
        })
    }
}

impl FrameSource for VideoReader {
    type Frame = Mat;

    fn properties(&self) -> VideoProperties {
        self.properties
    }

    fn read_frame(&mut self) -> Result<Option<Mat>> {
        use opencv::videoio::VideoCaptureTrait;

        let mut mat = Mat::default();
        if !VideoCaptureTrait::read(&mut self.cap, &mut mat)? || mat.empty() {
            return Ok(None);
        }
        Ok(Some(mat))
    }

    fn release(&mut self) -> Result<()> {
        use opencv::videoio::VideoCaptureTrait;

        if !self.released {
            self.released = true;
            VideoCaptureTrait::release(&mut self.cap)?;
            debug!("Input source released");
        }
        Ok(())
    }
}

impl Drop for VideoReader {
    fn drop(&mut self) {
        if let Err(e) = FrameSource::release(self) {
            warn!("Failed to release input source: {}", e);
        }
    }
}

pub struct VideoSink {
    writer: VideoWriter,
    released: bool,
}

impl VideoSink {
    /// Writer with the source's dimensions and frame rate and a fixed codec.
    pub fn create(path: &Path, properties: &VideoProperties, codec: [char; 4]) -> Result<Self> {
        let name = path_str(path)?;
        info!("Output video: {}", path.display());

        let fps = if properties.fps > 0.0 {
            properties.fps
        } else {
            warn!(
                "Source reports {} FPS, writing at {} FPS",
                properties.fps, FALLBACK_FPS
            );
            FALLBACK_FPS
        };

        let fourcc = VideoWriter::fourcc(codec[0], codec[1], codec[2], codec[3])?;
        let writer = VideoWriter::new(
            name,
            fourcc,
            fps,
            core::Size::new(properties.width, properties.height),
            true,
        )
        .map_err(|e| LaneError::io(name, e.to_string()))?;

        if !writer.is_opened()? {
            return Err(LaneError::io(name, "failed to open video writer"));
        }

        Ok(Self {
            writer,
            released: false,
        })
    }
}

impl FrameSink<Mat> for VideoSink {
    fn write_frame(&mut self, frame: &Mat) -> Result<()> {
        use opencv::videoio::VideoWriterTrait;

        VideoWriterTrait::write(&mut self.writer, frame)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        use opencv::videoio::VideoWriterTrait;

        if !self.released {
            self.released = true;
            VideoWriterTrait::release(&mut self.writer)?;
            debug!("Output sink released");
        }
        Ok(())
    }
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        if let Err(e) = FrameSink::<Mat>::release(self) {
            warn!("Failed to release output sink: {}", e);
        }
    }
}

/// HighGUI preview window; a key press of `quit_key` ends the run.
pub struct HighGuiDisplay {
    window: String,
    quit_key: char,
    open: bool,
}

impl HighGuiDisplay {
    pub fn new(window: &str, quit_key: char) -> Result<Self> {
        highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window: window.to_string(),
            quit_key,
            open: true,
        })
    }
}

impl Display<Mat> for HighGuiDisplay {
    fn show(&mut self, frame: &Mat) -> Result<()> {
        highgui::imshow(&self.window, frame)?;
        Ok(())
    }

    fn quit_requested(&mut self) -> Result<bool> {
        let key = highgui::wait_key(1)?;
        Ok(key >= 0 && char::from((key & 0xFF) as u8) == self.quit_key)
    }

    fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            highgui::destroy_window(&self.window)?;
        }
        Ok(())
    }
}

impl Drop for HighGuiDisplay {
    fn drop(&mut self) {
        if let Err(e) = Display::<Mat>::close(self) {
            warn!("Failed to close display: {}", e);
        }
    }
}
