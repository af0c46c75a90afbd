use thiserror::Error;

/// Invalid arguments to curve geometry queries
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("Steps per segment must be at least 1, got {0}")]
    InvalidStepCount(usize),
    #[error("Segment index {index} out of range (segment count {count})")]
    SegmentOutOfRange { index: usize, count: usize },
    #[error("Invalid curve parameter t = {0}")]
    InvalidParameter(f32),
}
