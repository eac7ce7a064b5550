//! Fully convolutional heat-map regressor.

use burn::config::Config;
use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::{PaddingConfig2d, Relu};
use burn::prelude::*;

use crate::training::HeatmapModel;

/// Configuration for [`HeatmapNet`].
#[derive(Config, Debug)]
pub struct HeatmapNetConfig {
    /// Landmarks per heat-map stack.
    pub n_landmarks: usize,
    /// Heat maps produced per image.
    #[config(default = 1)]
    pub seq_len: usize,
    /// Image channels.
    #[config(default = 3)]
    pub in_channels: usize,
    /// Channels of the hidden convolutions.
    #[config(default = "vec![16, 16]")]
    pub hidden_channels: Vec<usize>,
    /// Square kernel size, odd.
    #[config(default = 3)]
    pub kernel_size: usize,
}

impl HeatmapNetConfig {
    /// Initialize the network.
    pub fn init<B: Backend>(&self, device: &B::Device) -> HeatmapNet<B> {
        let kernel = [self.kernel_size, self.kernel_size];
        let conv = |channels: [usize; 2]| {
            Conv2dConfig::new(channels, kernel)
                .with_padding(PaddingConfig2d::Same)
                .init::<B>(device)
        };

        let mut hidden = Vec::with_capacity(self.hidden_channels.len());
        let mut in_ch = self.in_channels;
        for &out_ch in &self.hidden_channels {
            hidden.push(conv([in_ch, out_ch]));
            in_ch = out_ch;
        }

        HeatmapNet {
            hidden,
            head: conv([in_ch, self.seq_len * self.n_landmarks]),
            activation: Relu::new(),
            seq_len: self.seq_len,
            n_landmarks: self.n_landmarks,
        }
    }
}

/// Stack of same-padded convolutions with a linear head.
#[derive(Module, Debug)]
pub struct HeatmapNet<B: Backend> {
    hidden: Vec<Conv2d<B>>,
    head: Conv2d<B>,
    activation: Relu,
    #[module(skip)]
    seq_len: usize,
    #[module(skip)]
    n_landmarks: usize,
}

impl<B: Backend> HeatmapNet<B> {
    /// Forward pass.
    ///
    /// Input shape: [batch, channels, height, width]
    /// Output shape: [seq_len, batch, n_landmarks, height, width]
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 5> {
        let mut x = images;
        for conv in &self.hidden {
            x = self.activation.forward(conv.forward(x));
        }
        let [batch, _, height, width] = x.dims();
        self.head
            .forward(x)
            .reshape([batch, self.seq_len, self.n_landmarks, height, width])
            .permute([1, 0, 2, 3, 4])
    }
}

impl<B: Backend> HeatmapModel<B> for HeatmapNet<B> {
    fn forward_heatmaps(&self, images: Tensor<B, 4>) -> Tensor<B, 5> {
        self.forward(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_output_layout() {
        let device = Default::default();
        let net = HeatmapNetConfig::new(5)
            .with_seq_len(2)
            .with_hidden_channels(vec![4])
            .init::<TestBackend>(&device);

        let images = Tensor::<TestBackend, 4>::zeros([3, 3, 8, 6], &device);
        assert_eq!(net.forward(images).dims(), [2, 3, 5, 8, 6]);
    }
}
