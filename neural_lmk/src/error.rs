//! Error types for neural_lmk.

use thiserror::Error;

/// Errors that can occur while training.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NeuralLmkError {
    /// Declared and actual tensor layouts disagree.
    #[error("{tensor} shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which tensor was checked.
        tensor: &'static str,
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// A pass had no batches to process.
    #[error("empty {phase} pass: no batches to process")]
    EmptyEpoch {
        /// `"training"` or `"validation"`.
        phase: &'static str,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// A sample could not be produced or converted.
    #[error("data error: {message}")]
    Data {
        /// Description of the error.
        message: String,
    },

    /// Training error.
    #[error("training error: {message}")]
    TrainingError {
        /// Description of the error.
        message: String,
    },
}

/// Result type for neural_lmk operations.
pub type Result<T> = std::result::Result<T, NeuralLmkError>;
