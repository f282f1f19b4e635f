use std::fmt;
use thiserror::Error;

/// Row × column extent of an operand, used in error reports.
///
/// Vectors are reported as a single column (`len × 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Shape {
        Shape { rows, cols }
    }

    pub fn vector(len: usize) -> Shape {
        Shape { rows: len, cols: 1 }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[derive(Debug, Error)]
pub enum NnError {
    #[error("dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    #[error("invalid shape: {0}")]
    InvalidShape(String),

    #[error("layer index {index} out of range (network has {count} layers)")]
    InvalidIndex { index: usize, count: usize },

    #[error("cannot parse {input:?}: {reason}")]
    Parse { input: String, reason: String },

    #[error("layer {index} has no weights; initialize the network first")]
    Uninitialized { index: usize },

    #[error("invalid architecture: {0}")]
    InvalidArchitecture(String),

    #[error("invalid dataset: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl NnError {
    pub(crate) fn mismatch(op: &'static str, left: Shape, right: Shape) -> NnError {
        NnError::DimensionMismatch { op, left, right }
    }

    pub(crate) fn parse(input: impl Into<String>, reason: impl fmt::Display) -> NnError {
        NnError::Parse { input: input.into(), reason: reason.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, NnError>;
