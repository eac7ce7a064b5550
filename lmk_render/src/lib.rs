//! # lmk_render
//!
//! Off-screen renderer that turns one textured mesh into a stack of randomly
//! posed 2D views for landmark training data.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lmk_render::{RenderConfig, Renderer};
//!
//! let config = RenderConfig::default()
//!     .with_n_views(32)
//!     .with_image_size(256)
//!     .with_write_renderings(true)
//!     .with_temp_dir("/tmp/views");
//! let mut renderer = Renderer::new(config)?;
//! let (stack, transforms) = renderer.render("scans/subject_01.obj")?;
//! ```
//!
//! ## Pipeline
//!
//! For every view the camera is reset to `(0, 0, 500)` looking at the origin
//! with a parallel projection framing the fixed `[-150, 150]²` window, then
//! moved by the inverse of `Ry·Rx·Rz`. The mesh never moves. The frame is read
//! back bottom-up and flipped so row 0 of each stored view is the image top.
//!
//! ## Determinism
//!
//! Randomness only enters through the [`TransformSampler`]. Inject a
//! [`SequenceSampler`] to render the same views twice.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod raster;
pub mod renderer;
pub mod sampler;
pub mod scene;
pub mod stack;

pub use lmk_core::{RigidTransform, TransformRanges, ViewTransform};

pub use camera::Camera;
pub use config::{ColorMode, RenderConfig};
pub use error::{RenderError, Result};
pub use framebuffer::{flip_vertical, FrameBuffer};
pub use raster::{rasterize_triangle, render_scene, ScreenVertex};
pub use renderer::{RenderSession, Renderer};
pub use sampler::{RandomTransformSampler, SequenceSampler, TransformSampler};
pub use scene::{Actor, Property, Scene, Vertex};
pub use stack::ViewStack;
