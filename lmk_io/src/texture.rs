//! RGB textures sampled by the rasterizer.

use std::path::Path;

use crate::error::{LmkIoError, Result};

/// 8-bit RGB texture stored top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    texels: Vec<[u8; 3]>,
}

impl Texture {
    /// Build a texture from top-down RGB texels.
    pub fn from_rgb(width: u32, height: u32, texels: Vec<[u8; 3]>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if expected == 0 || texels.len() != expected {
            return Err(LmkIoError::ImageSize {
                expected: expected * 3,
                got: texels.len() * 3,
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Decode an image file, converting to RGB8.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();
        let texels = rgb.pixels().map(|p| p.0).collect();
        Self::from_rgb(width, height, texels)
    }

    /// Width in texels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Nearest texel at `(u, v)` with repeat wrapping.
    ///
    /// `v = 0` is the bottom row, as in OBJ texture coordinates.
    pub fn sample(&self, u: f32, v: f32) -> [u8; 3] {
        let wrap = |t: f32| t - t.floor();
        let x = ((wrap(u) * self.width as f32) as u32).min(self.width - 1);
        let y_up = ((wrap(v) * self.height as f32) as u32).min(self.height - 1);
        let y = self.height - 1 - y_up;
        self.texels[(y * self.width + x) as usize]
    }
}
