//! Rendered view stack.

/// `n_views` images of `height × width × channels` f32 values in `0..=255`.
///
/// Layout is `[view][row][col][channel]` with row 0 at the top of the image.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStack {
    n_views: usize,
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl ViewStack {
    /// Zero-filled stack.
    pub fn zeros(n_views: usize, height: usize, width: usize, channels: usize) -> Self {
        Self {
            n_views,
            height,
            width,
            channels,
            data: vec![0.0; n_views * height * width * channels],
        }
    }

    /// `[n_views, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        [self.n_views, self.height, self.width, self.channels]
    }

    /// Number of views.
    pub fn n_views(&self) -> usize {
        self.n_views
    }

    /// Channels per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    fn view_len(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// Values of view `idx`.
    pub fn view(&self, idx: usize) -> &[f32] {
        let len = self.view_len();
        &self.data[idx * len..(idx + 1) * len]
    }

    /// Store 8-bit pixels for view `idx`, keeping the first `channels` of
    /// every `src_channels`-wide pixel.
    pub(crate) fn store_view(&mut self, idx: usize, pixels: &[u8], src_channels: usize) {
        let len = self.view_len();
        let channels = self.channels;
        let dst = &mut self.data[idx * len..(idx + 1) * len];
        for (out, px) in dst.chunks_exact_mut(channels).zip(pixels.chunks_exact(src_channels)) {
            for (o, &p) in out.iter_mut().zip(px) {
                *o = p as f32;
            }
        }
    }

    /// Single value.
    pub fn get(&self, view: usize, row: usize, col: usize, channel: usize) -> f32 {
        let i = ((view * self.height + row) * self.width + col) * self.channels + channel;
        self.data[i]
    }

    /// All values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Take the values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
