use thiserror::Error;

use crate::domain::{STICK_MAX, STICK_MIN};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("stick position ({x}, {y}) is outside [{}, {}]", STICK_MIN, STICK_MAX)]
    StickOutOfRange { x: i32, y: i32 },
    #[error("frame encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}
