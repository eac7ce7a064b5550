//! # lmk_core
//!
//! Pure geometry for the landmark rendering pipeline.
//!
//! This crate holds the math shared by the renderer and its tooling: points,
//! rotation matrices, rigid transforms, bounding boxes and the per-view
//! transform record that every rendered image is tagged with.
//!
//! ## Features
//!
//! - **no_std compatible**: no allocation, `libm` for trigonometry
//! - **VTK-compatible composition**: `RigidTransform::rotate_*` pre-multiplies,
//!   so `identity().rotate_y(a).rotate_x(b)` applies `b` about X first
//! - **Provenance records**: `ViewTransform` formats and parses the six-value
//!   text record written next to each rendering
//!
//! ## Feature Flags
//!
//! - `std` (default): implements `std::error::Error` for [`LmkCoreError`]
//!
//! ## Usage
//!
//! ```ignore
//! use lmk_core::prelude::*;
//!
//! let view = ViewTransform::new(-12.0, 40.0, 3.0, 1.6, 4.0, -7.0);
//! let to_camera = view.camera_transform();
//! let p = to_camera.transform_point(Point3::new(0.0, 0.0, 500.0));
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

pub mod bounds;
pub mod error;
pub mod rotation;
pub mod types;
pub mod view;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::error::LmkCoreError;
    pub use crate::rotation::{Axis, Mat3, RigidTransform};
    pub use crate::types::Point3;
    pub use crate::view::{SampleRange, TransformRanges, ViewTransform};
}

pub use bounds::Aabb;
pub use error::LmkCoreError;
pub use rotation::{Axis, Mat3, RigidTransform};
pub use types::Point3;
pub use view::{SampleRange, TransformRanges, ViewTransform};
