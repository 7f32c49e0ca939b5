/// Error types for model loading and image output
use std::io;

/// A malformed model file, reported against its 1-based line number
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("invalid number {token:?}")]
    InvalidNumber { token: String },

    #[error("invalid vert index: {index} (have {count} vertices)")]
    VertexIndexOutOfRange { index: usize, count: usize },

    #[error("{0}")]
    Syntax(String),
}

impl ParseError {
    pub fn new(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to parse model: {0}")]
    Parse(#[from] ParseError),

    #[error("invalid STL data: {0}")]
    Stl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
