//! Render configuration.

use std::fmt;
use std::path::PathBuf;

use lmk_core::TransformRanges;

use crate::error::{RenderError, Result};

/// What each rendered view captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Single channel shaded geometry.
    Geometry,
    /// Textured color with lighting flattened away.
    #[default]
    Rgb,
}

impl ColorMode {
    /// Channels per pixel in the output stack.
    pub const fn channels(self) -> usize {
        match self {
            ColorMode::Geometry => 1,
            ColorMode::Rgb => 3,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorMode::Geometry => write!(f, "geometry"),
            ColorMode::Rgb => write!(f, "rgb"),
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "geometry" => Ok(ColorMode::Geometry),
            "rgb" => Ok(ColorMode::Rgb),
            other => Err(RenderError::InvalidConfig {
                message: format!("unknown color mode '{}'", other),
            }),
        }
    }
}

/// Parameters of one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Number of views to render.
    pub n_views: usize,
    /// Side of the square output image in pixels.
    pub image_size: u32,
    /// Captured channels.
    pub color_mode: ColorMode,
    /// Write one PNG per view into `temp_dir`.
    pub write_renderings: bool,
    /// Write one transform record per view into `temp_dir`.
    pub write_transforms: bool,
    /// Render without a visible window. Rendering is always off-screen.
    pub off_screen_rendering: bool,
    /// Directory receiving written files.
    pub temp_dir: PathBuf,
    /// Half side of the fixed square the camera frames, in world units.
    pub view_half_extent: f32,
    /// Distance from the camera to the focal point at the origin.
    pub camera_distance: f32,
    /// Background color in `[0, 1]`.
    pub background: [f32; 3],
    /// Sampling domain for random views.
    pub ranges: TransformRanges,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            n_views: 8,
            image_size: 256,
            color_mode: ColorMode::Rgb,
            write_renderings: false,
            write_transforms: false,
            off_screen_rendering: true,
            temp_dir: std::env::temp_dir(),
            view_half_extent: 150.0,
            camera_distance: 500.0,
            background: [1.0, 1.0, 1.0],
            ranges: TransformRanges::DTU_3D,
        }
    }
}

impl RenderConfig {
    /// Set the number of views.
    pub fn with_n_views(mut self, n_views: usize) -> Self {
        self.n_views = n_views;
        self
    }

    /// Set the output image side.
    pub fn with_image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    /// Set the color mode.
    pub fn with_color_mode(mut self, color_mode: ColorMode) -> Self {
        self.color_mode = color_mode;
        self
    }

    /// Enable or disable PNG output.
    pub fn with_write_renderings(mut self, write: bool) -> Self {
        self.write_renderings = write;
        self
    }

    /// Enable or disable transform record output.
    pub fn with_write_transforms(mut self, write: bool) -> Self {
        self.write_transforms = write;
        self
    }

    /// Request off-screen rendering.
    pub fn with_off_screen_rendering(mut self, off_screen: bool) -> Self {
        self.off_screen_rendering = off_screen;
        self
    }

    /// Set the output directory.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Set the sampling ranges.
    pub fn with_ranges(mut self, ranges: TransformRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Side length of the square the camera frames.
    pub fn view_side_length(&self) -> f32 {
        2.0 * self.view_half_extent
    }

    /// Check that the configuration can produce images.
    pub fn validate(&self) -> Result<()> {
        if self.n_views == 0 {
            return Err(RenderError::InvalidConfig {
                message: "n_views must be at least 1".to_string(),
            });
        }
        if self.image_size == 0 {
            return Err(RenderError::InvalidConfig {
                message: "image_size must be at least 1".to_string(),
            });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.view_half_extent) || !positive(self.camera_distance) {
            return Err(RenderError::InvalidConfig {
                message: format!(
                    "view_half_extent ({}) and camera_distance ({}) must be positive",
                    self.view_half_extent, self.camera_distance
                ),
            });
        }
        Ok(())
    }
}
