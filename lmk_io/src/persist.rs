//! Writers for rendered views and their transform records.

use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};
use lmk_core::ViewTransform;

use crate::error::{LmkIoError, Result};

/// Write top-down RGB8 pixels as a PNG.
pub fn write_png_rgb<P: AsRef<Path>>(path: P, width: u32, height: u32, rgb: &[u8]) -> Result<()> {
    let expected = width as usize * height as usize * 3;
    let img = RgbImage::from_raw(width, height, rgb.to_vec()).ok_or(LmkIoError::ImageSize {
        expected,
        got: rgb.len(),
    })?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Write top-down 8-bit grey pixels as a PNG.
pub fn write_png_gray<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    gray: &[u8],
) -> Result<()> {
    let expected = width as usize * height as usize;
    let img = GrayImage::from_raw(width, height, gray.to_vec()).ok_or(LmkIoError::ImageSize {
        expected,
        got: gray.len(),
    })?;
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Write the six-value record of `view`, without a trailing newline.
pub fn write_transform_record<P: AsRef<Path>>(path: P, view: &ViewTransform) -> Result<()> {
    std::fs::write(path, view.to_string())?;
    Ok(())
}

/// Read back a record written by [`write_transform_record`].
pub fn read_transform_record<P: AsRef<Path>>(path: P) -> Result<ViewTransform> {
    let text = std::fs::read_to_string(path)?;
    Ok(ViewTransform::parse_record(&text)?)
}
