// src/lib.rs
//
// Straight-line lane boundary extraction for road video: edges are masked to a
// fixed region, Hough segments are split by slope sign, averaged per side and
// extrapolated between two fixed rows, then blended back onto the frame.

pub mod config;
pub mod error;
pub mod lane_detection;
pub mod overlay;
pub mod pipeline;
pub mod preprocessing;
pub mod region;
pub mod smoother;
pub mod types;
pub mod video_processor;
pub mod vision;

#[cfg(feature = "opencv")]
pub mod opencv_backend;

pub use config::Config;
pub use error::LaneError;
pub use lane_detection::LaneFitter;
pub use pipeline::{LaneDetector, PipelineOrchestrator, ProcessingStats, RunReport, StopReason};
pub use types::{LaneLine, LaneResult, LineSegment, Point, Side, SlopeIntercept};
