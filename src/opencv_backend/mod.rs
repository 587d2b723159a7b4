// src/opencv_backend/mod.rs

pub mod video;
pub mod vision;

pub use video::{HighGuiDisplay, VideoReader, VideoSink};
pub use vision::OpenCvVision;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{PipelineOrchestrator, RunReport};
use crate::video_processor::{Display, FrameSink, FrameSource};
use opencv::core::Mat;
use std::path::Path;
use tracing::warn;

/// Open `input`, write the annotated video to `output`, optionally preview it.
///
/// Parameters are checked before anything is opened. Whatever happens after
/// the source is open, it is released before this returns.
pub fn process_video(
    input: &Path,
    output: &Path,
    visualize: bool,
    config: Config,
) -> Result<RunReport> {
    let backend = OpenCvVision::new();
    let orchestrator = PipelineOrchestrator::new(&backend, config)?;
    let video = &orchestrator.config().video;
    let codec = video.fourcc()?;

    let mut source = VideoReader::open(input)?;

    let mut sink = match VideoSink::create(output, &source.properties(), codec) {
        Ok(sink) => sink,
        Err(e) => {
            release_quietly(&mut source, None);
            return Err(e);
        }
    };

    let mut display = if visualize {
        match HighGuiDisplay::new(&video.window_name, video.quit_key) {
            Ok(display) => Some(display),
            Err(e) => {
                release_quietly(&mut source, Some(&mut sink));
                return Err(e);
            }
        }
    } else {
        None
    };

    orchestrator.run(
        &mut source,
        &mut sink,
        display.as_mut().map(|d| d as &mut dyn Display<Mat>),
    )
}

fn release_quietly(source: &mut VideoReader, sink: Option<&mut VideoSink>) {
    if let Err(e) = source.release() {
        warn!("Failed to release input source: {}", e);
    }
    if let Some(sink) = sink {
        if let Err(e) = sink.release() {
            warn!("Failed to release output sink: {}", e);
        }
    }
}
