// src/pipeline/orchestrator.rs
//
// Sequential run loop: read -> detect -> composite -> write, one frame at a
// time. Source, sink and display are released on every exit path and the
// statistics are reported after release, whatever ended the run.

use super::detector::LaneDetector;
use super::metrics::ProcessingStats;
use crate::config::Config;
use crate::error::{LaneError, Result};
use crate::video_processor::{Display, FrameSink, FrameSource};
use crate::vision::{Raster, VisionBackend};
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    /// A read failed mid-stream; handled like end of stream.
    ReadFailure,
    /// The quit frame was already written and counts toward the frame total.
    UserQuit,
    /// A frame did not match the source's reported dimensions.
    FrameSizeMismatch,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub stats: ProcessingStats,
    pub stop_reason: StopReason,
}

pub struct PipelineOrchestrator<'a, B: VisionBackend> {
    backend: &'a B,
    config: Config,
}

impl<'a, B: VisionBackend> PipelineOrchestrator<'a, B> {
    /// Validates the configuration up front so bad parameters fail before
    /// anything is opened.
    pub fn new(backend: &'a B, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        mut display: Option<&mut dyn Display<B::Image>>,
    ) -> Result<RunReport>
    where
        S: FrameSource<Frame = B::Image>,
        K: FrameSink<B::Image>,
    {
        let mut stats = ProcessingStats::new();

        let outcome = self.drive(source, sink, display.as_deref_mut(), &mut stats);
        let released = release_all(source, sink, display);

        stats.log_summary();

        let stop_reason = outcome?;
        released?;
        debug!("Run stopped: {:?}", stop_reason);

        Ok(RunReport { stats, stop_reason })
    }

    fn drive<S, K>(
        &self,
        source: &mut S,
        sink: &mut K,
        mut display: Option<&mut (dyn Display<B::Image> + '_)>,
        stats: &mut ProcessingStats,
    ) -> Result<StopReason>
    where
        S: FrameSource<Frame = B::Image>,
        K: FrameSink<B::Image>,
    {
        let props = source.properties();
        if props.width <= 0 || props.height <= 0 {
            return Err(LaneError::InvalidInput(format!(
                "source frames have zero area ({}x{})",
                props.width, props.height
            )));
        }
        let mut detector = LaneDetector::new(&self.config, props.width, props.height)?;
        let progress_interval = self.config.video.progress_interval;

        loop {
            let frame = match source.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => return Ok(StopReason::EndOfStream),
                Err(e) => {
                    warn!(
                        "Frame read failed after {} frames, stopping: {}",
                        stats.frame_count(),
                        e
                    );
                    return Ok(StopReason::ReadFailure);
                }
            };

            if frame.width() != props.width || frame.height() != props.height {
                warn!(
                    "Frame {} is {}x{}, expected {}x{}; stopping",
                    stats.frame_count(),
                    frame.width(),
                    frame.height(),
                    props.width,
                    props.height
                );
                return Ok(StopReason::FrameSizeMismatch);
            }

            let started = Instant::now();
            let (output, _ctx) = detector.process(self.backend, &frame, stats.frame_count())?;
            let elapsed = started.elapsed();

            sink.write_frame(&output)?;
            stats.record(elapsed);

            let processed = stats.frame_count();
            if processed % progress_interval == 0 {
                info!("Processed {} frames", processed);
            }

            if let Some(display) = display.as_deref_mut() {
                display.show(&output)?;
                if display.quit_requested()? {
                    info!("Quit requested after {} frames", processed);
                    return Ok(StopReason::UserQuit);
                }
            }
        }
    }
}

/// Release everything, even if an earlier release fails. Returns the first error.
fn release_all<F, S, K>(
    source: &mut S,
    sink: &mut K,
    display: Option<&mut dyn Display<F>>,
) -> Result<()>
where
    S: FrameSource<Frame = F>,
    K: FrameSink<F>,
{
    let mut first_error: Option<LaneError> = None;
    let mut keep = |what: &str, result: Result<()>| {
        if let Err(e) = result {
            warn!("Failed to release {}: {}", what, e);
            first_error.get_or_insert(e);
        }
    };

    keep("input source", source.release());
    keep("output sink", sink.release());
    if let Some(display) = display {
        keep("display", display.close());
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
