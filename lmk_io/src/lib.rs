//! lmk_io - mesh, material and image I/O for the landmark rendering pipeline.
//!
//! # Core Types
//!
//! - [`ObjMesh`]: positions, texture coordinates and per-material face groups
//! - [`MaterialLibrary`]: materials parsed from an MTL file
//! - [`Texture`]: RGB8 texture with nearest sampling
//! - [`ObjAsset`]: a mesh with its companion materials and textures resolved
//!
//! # Example
//!
//! ```ignore
//! use lmk_io::{ObjAsset, write_png_rgb};
//!
//! let asset = ObjAsset::load("scans/subject_01.obj")?;
//! println!("{} triangles", asset.mesh.triangle_count());
//!
//! write_png_rgb("/tmp/out.png", 2, 1, &[255, 0, 0, 0, 0, 255])?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod asset;
pub mod error;
pub mod mtl;
pub mod obj;
pub mod persist;
pub mod texture;

pub use lmk_core::{Aabb, Point3, ViewTransform};

pub use asset::ObjAsset;
pub use error::{LmkIoError, Result};
pub use mtl::{companion_mtl_path, parse_mtl, parse_mtl_file, Material, MaterialLibrary};
pub use obj::{parse_obj, parse_obj_file, Corner, FaceGroup, ObjMesh};
pub use persist::{read_transform_record, write_png_gray, write_png_rgb, write_transform_record};
pub use texture::Texture;
