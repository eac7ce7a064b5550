//! Error types for lmk_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during lmk_core operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LmkCoreError {
    /// A transform record did not contain exactly six values.
    RecordFieldCount {
        /// Number of values found.
        got: usize,
    },
    /// A transform record field could not be parsed as a number.
    RecordFieldInvalid {
        /// Zero-based position of the offending field.
        index: usize,
    },
}

impl fmt::Display for LmkCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LmkCoreError::RecordFieldCount { got } => {
                write!(f, "transform record needs 6 values, got {}", got)
            }
            LmkCoreError::RecordFieldInvalid { index } => {
                write!(f, "transform record field {} is not a number", index)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LmkCoreError {}
