/// Error types for shape construction, rendering and persistence
use thiserror::Error;

/// Errors that can occur while building, rendering or loading wireframe shapes.
#[derive(Debug, Error)]
pub enum WireError {
    /// A point index was outside the collection.
    #[error("point index {index} out of bounds for collection with {len} points")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of points in the collection.
        len: usize,
    },

    /// Two collections that must be the same size were not.
    #[error("collection length mismatch: expected {expected} points, got {actual}")]
    LengthMismatch {
        /// Length of the receiving collection.
        expected: usize,
        /// Length of the other collection.
        actual: usize,
    },

    /// A point handle was used with a shape that does not own it.
    #[error("point is not a member of this shape")]
    ForeignPoint,

    /// A segment refers to a point index that no longer exists.
    #[error("segment ({a}, {b}) refers past the end of a {len}-point collection")]
    DanglingSegment {
        /// First endpoint index.
        a: usize,
        /// Second endpoint index.
        b: usize,
        /// Number of points available.
        len: usize,
    },

    /// A wire or point-cloud document could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },

    /// Reading or writing a file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for wire operations.
pub type WireResult<T> = Result<T, WireError>;
