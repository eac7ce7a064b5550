//! Color and depth buffers.
//!
//! Rows are stored bottom-up, the order a GL read-back returns them in. Use
//! [`flip_vertical`] to get top-down image rows.

/// RGB8 color buffer with a depth buffer of the same size.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<[u8; 3]>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Buffer cleared to black at infinite depth.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![[0; 3]; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset color to `background` and depth to infinity.
    pub fn clear(&mut self, background: [u8; 3]) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Color at column `x`, row `y` counted from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        (x < self.width && y < self.height).then(|| self.color[self.offset(x, y)])
    }

    /// Overwrite a pixel, ignoring depth. Out of range writes are dropped.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x < self.width && y < self.height {
            let i = self.offset(x, y);
            self.color[i] = rgb;
        }
    }

    /// Depth at a pixel.
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        (x < self.width && y < self.height).then(|| self.depth[self.offset(x, y)])
    }

    /// Store `rgb` if `depth` is strictly nearer than what the pixel holds.
    ///
    /// Returns whether the fragment was kept.
    #[inline]
    pub fn write_if_nearer(&mut self, x: u32, y: u32, depth: f32, rgb: [u8; 3]) -> bool {
        let i = self.offset(x, y);
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.color[i] = rgb;
            true
        } else {
            false
        }
    }

    /// Interleaved RGB bytes, bottom row first.
    pub fn read_rgb(&self) -> Vec<u8> {
        self.color.iter().flatten().copied().collect()
    }
}

/// Reverse the row order of an interleaved image.
pub fn flip_vertical(data: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let row = width * channels;
    let mut out = Vec::with_capacity(data.len());
    for y in (0..height).rev() {
        out.extend_from_slice(&data[y * row..(y + 1) * row]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: [u8; 3] = [255, 0, 0];

    #[test]
    fn test_first_buffer_row_lands_last() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.clear([0; 3]);
        fb.set_pixel(1, 0, MARKER);

        let raw = fb.read_rgb();
        assert_eq!(&raw[3..6], &MARKER);

        let out = flip_vertical(&raw, 4, 3, 3);
        let last_row = 2 * 4 * 3;
        assert_eq!(&out[last_row + 3..last_row + 6], &MARKER);
        assert!(out[..last_row].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_last_buffer_row_lands_first() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(0, 1, MARKER);
        let out = flip_vertical(&fb.read_rgb(), 2, 2, 3);
        assert_eq!(&out[0..3], &MARKER);
        assert!(out[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = FrameBuffer::new(1, 1);
        assert!(fb.write_if_nearer(0, 0, 5.0, [1, 1, 1]));
        assert!(!fb.write_if_nearer(0, 0, 5.0, [2, 2, 2]));
        assert!(!fb.write_if_nearer(0, 0, 6.0, [3, 3, 3]));
        assert!(fb.write_if_nearer(0, 0, 4.0, [4, 4, 4]));
        assert_eq!(fb.pixel(0, 0), Some([4, 4, 4]));
        assert_eq!(fb.depth(0, 0), Some(4.0));
    }

    #[test]
    fn test_out_of_range() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel(5, 5, MARKER);
        assert_eq!(fb.pixel(5, 5), None);
    }
}
