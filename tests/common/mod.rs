#![allow(dead_code)]

pub mod log_capture;
pub mod mock_video;
pub mod mock_vision;
