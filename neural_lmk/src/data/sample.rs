//! Host-side image / heat-map pairs.

use crate::error::{NeuralLmkError, Result};

/// One batch as delivered by the data loader, channel-last.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapSample {
    /// Images, row-major.
    pub image: Vec<f32>,
    /// `[batch, height, width, channels]`.
    pub image_shape: [usize; 4],
    /// Target heat-map stacks, row-major.
    pub heat_map_stack: Vec<f32>,
    /// `[batch, sequence, height, width, landmarks]`.
    pub stack_shape: [usize; 5],
}

impl HeatmapSample {
    /// Bundle data with its declared shapes. See [`validate`](Self::validate).
    pub fn new(
        image: Vec<f32>,
        image_shape: [usize; 4],
        heat_map_stack: Vec<f32>,
        stack_shape: [usize; 5],
    ) -> Self {
        Self {
            image,
            image_shape,
            heat_map_stack,
            stack_shape,
        }
    }

    /// Samples in the batch.
    pub fn batch_size(&self) -> usize {
        self.image_shape[0]
    }

    /// Check that data lengths match the declared shapes and that image and
    /// target agree on batch size and spatial size.
    pub fn validate(&self) -> Result<()> {
        let image_len: usize = self.image_shape.iter().product();
        if image_len != self.image.len() {
            return Err(NeuralLmkError::ShapeMismatch {
                tensor: "image",
                expected: vec![image_len],
                got: vec![self.image.len()],
            });
        }

        let stack_len: usize = self.stack_shape.iter().product();
        if stack_len != self.heat_map_stack.len() {
            return Err(NeuralLmkError::ShapeMismatch {
                tensor: "heat_map_stack",
                expected: vec![stack_len],
                got: vec![self.heat_map_stack.len()],
            });
        }

        let [b, h, w, _] = self.image_shape;
        let [tb, _, th, tw, _] = self.stack_shape;
        if (b, h, w) != (tb, th, tw) {
            return Err(NeuralLmkError::ShapeMismatch {
                tensor: "heat_map_stack",
                expected: vec![b, h, w],
                got: vec![tb, th, tw],
            });
        }
        Ok(())
    }
}

/// Borrowed `[batch, sequence, landmarks, height, width]` heat maps.
#[derive(Debug, Clone, Copy)]
pub struct HeatmapView<'a> {
    /// Values, row-major.
    pub data: &'a [f32],
    /// `[batch, sequence, landmarks, height, width]`.
    pub shape: [usize; 5],
}

impl<'a> HeatmapView<'a> {
    /// Wrap `data`, checking its length.
    pub fn new(data: &'a [f32], shape: [usize; 5]) -> Result<Self> {
        let len: usize = shape.iter().product();
        if len != data.len() {
            return Err(NeuralLmkError::ShapeMismatch {
                tensor: "heat map view",
                expected: vec![len],
                got: vec![data.len()],
            });
        }
        Ok(Self { data, shape })
    }

    /// Number of `height × width` maps.
    pub fn n_maps(&self) -> usize {
        self.shape[0] * self.shape[1] * self.shape[2]
    }

    /// Map `i` in row-major order.
    pub fn map(&self, i: usize) -> &'a [f32] {
        let len = self.shape[3] * self.shape[4];
        &self.data[i * len..(i + 1) * len]
    }
}
