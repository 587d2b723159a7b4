// src/pipeline/metrics.rs
//
// Per-run throughput statistics. Owned by the run loop for one video and
// handed back to the caller when the run ends.

use serde::Serialize;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessingStats {
    durations: Vec<Duration>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one processed frame.
    pub fn record(&mut self, duration: Duration) {
        self.durations.push(duration);
    }

    pub fn frame_count(&self) -> u64 {
        self.durations.len() as u64
    }

    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    pub fn total_duration(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// `None` when no frame was processed.
    pub fn mean_duration(&self) -> Option<Duration> {
        if self.durations.is_empty() {
            return None;
        }
        Some(self.total_duration() / self.durations.len() as u32)
    }

    pub fn mean_fps(&self) -> Option<f64> {
        let mean = self.mean_secs()?;
        if mean > 0.0 {
            Some(1.0 / mean)
        } else {
            None
        }
    }

    fn mean_secs(&self) -> Option<f64> {
        if self.durations.is_empty() {
            return None;
        }
        Some(self.total_duration().as_secs_f64() / self.durations.len() as f64)
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            total_frames: self.frame_count(),
            total_processing_secs: self.total_duration().as_secs_f64(),
            avg_frame_secs: self.mean_secs(),
            avg_fps: self.mean_fps(),
        }
    }

    /// Final report. Duration and FPS lines are skipped for an empty run.
    pub fn log_summary(&self) {
        info!("Processed {} frames", self.frame_count());
        if let Some(mean) = self.mean_secs() {
            info!("Average processing time: {:.4} seconds per frame", mean);
        }
        if let Some(fps) = self.mean_fps() {
            info!("Average FPS: {:.2}", fps);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub total_frames: u64,
    pub total_processing_secs: f64,
    pub avg_frame_secs: Option<f64>,
    pub avg_fps: Option<f64>,
}
