// src/pipeline/mod.rs

pub mod detector;
pub mod frame_context;
pub mod metrics;
pub mod orchestrator;

pub use detector::LaneDetector;
pub use frame_context::FrameContext;
pub use metrics::{ProcessingStats, StatsSummary};
pub use orchestrator::{PipelineOrchestrator, RunReport, StopReason};
