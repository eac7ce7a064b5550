//! Error types for lmk_render.

use thiserror::Error;

use crate::config::ColorMode;

/// Errors that can occur while rendering views.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The mesh format and color mode cannot be rendered together.
    #[error("unsupported combination: .{extension} mesh with {color_mode} color mode")]
    Unsupported {
        /// Lowercased file extension, empty when there is none.
        extension: String,
        /// Requested color mode.
        color_mode: ColorMode,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// The mesh or one of its companion files could not be read.
    #[error("failed to load mesh {path}: {source}")]
    Mesh {
        /// Mesh path.
        path: String,
        /// Underlying error.
        source: lmk_io::LmkIoError,
    },

    /// Writing a rendering or transform record failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: String,
        /// Underlying error.
        source: lmk_io::LmkIoError,
    },
}

/// Result type for lmk_render operations.
pub type Result<T> = std::result::Result<T, RenderError>;
