//! Error types for lmk_io operations.
//!
//! Provides specific error variants for mesh parsing, material lookup and image persistence.

use core::fmt;

use lmk_core::LmkCoreError;

/// Errors that can occur during lmk_io operations.
#[derive(Debug, Clone, PartialEq)]
pub enum LmkIoError {
    /// A line of an OBJ or MTL file could not be parsed.
    Parse {
        /// One-based line number.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A face referenced a vertex or texture coordinate that does not exist.
    IndexOutOfRange {
        /// One-based line number of the face.
        line: usize,
        /// Index as written in the file.
        index: i64,
        /// Number of elements available.
        len: usize,
    },

    /// The mesh contains no triangles.
    EmptyMesh,

    /// Pixel data does not match the declared image size.
    ImageSize {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        got: usize,
    },

    /// Image decoding or encoding failed.
    Image(String),

    /// A transform record was malformed.
    Record(LmkCoreError),

    /// I/O error during reading or writing.
    Io(String),
}

impl fmt::Display for LmkIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LmkIoError::Parse { line, message } => {
                write!(f, "parse error on line {}: {}", line, message)
            }
            LmkIoError::IndexOutOfRange { line, index, len } => {
                write!(
                    f,
                    "index {} on line {} out of range for {} elements",
                    index, line, len
                )
            }
            LmkIoError::EmptyMesh => write!(f, "mesh has no faces"),
            LmkIoError::ImageSize { expected, got } => {
                write!(
                    f,
                    "invalid image buffer: expected {} bytes, got {}",
                    expected, got
                )
            }
            LmkIoError::Image(msg) => write!(f, "image error: {}", msg),
            LmkIoError::Record(err) => write!(f, "{}", err),
            LmkIoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for LmkIoError {}

impl From<std::io::Error> for LmkIoError {
    fn from(err: std::io::Error) -> Self {
        LmkIoError::Io(err.to_string())
    }
}

impl From<image::ImageError> for LmkIoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => LmkIoError::Io(io.to_string()),
            other => LmkIoError::Image(other.to_string()),
        }
    }
}

impl From<LmkCoreError> for LmkIoError {
    fn from(err: LmkCoreError) -> Self {
        LmkIoError::Record(err)
    }
}

/// Result type alias for lmk_io operations.
pub type Result<T> = core::result::Result<T, LmkIoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LmkIoError::EmptyMesh;
        assert_eq!(format!("{}", err), "mesh has no faces");

        let err = LmkIoError::IndexOutOfRange {
            line: 7,
            index: -9,
            len: 4,
        };
        assert!(format!("{}", err).contains("-9"));
        assert!(format!("{}", err).contains("line 7"));
    }

    #[test]
    fn test_io_conversion() {
        let err: LmkIoError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, LmkIoError::Io(_)));
    }
}
