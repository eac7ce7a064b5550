//! Heat-map regression losses.

use burn::nn::loss::{MseLoss, Reduction};
use burn::prelude::*;

use crate::config::HeatmapLoss;

/// Mean loss between aligned `[B, S, L, H, W]` stacks.
pub fn heatmap_loss<B: Backend>(
    kind: &HeatmapLoss,
    output: Tensor<B, 5>,
    target: Tensor<B, 5>,
) -> Tensor<B, 1> {
    match kind {
        HeatmapLoss::Mse => MseLoss::new().forward(output, target, Reduction::Mean),
        HeatmapLoss::L1 => (output - target).abs().mean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::ElementConversion;

    type TestBackend = NdArray;

    #[test]
    fn test_losses() {
        let device = Default::default();
        let output = Tensor::<TestBackend, 5>::full([1, 1, 1, 2, 2], 3.0, &device);
        let target = Tensor::<TestBackend, 5>::full([1, 1, 1, 2, 2], 1.0, &device);

        let mse = heatmap_loss(&HeatmapLoss::Mse, output.clone(), target.clone());
        let l1 = heatmap_loss(&HeatmapLoss::L1, output, target);
        assert!((mse.into_scalar().elem::<f32>() - 4.0).abs() < 1e-6);
        assert!((l1.into_scalar().elem::<f32>() - 2.0).abs() < 1e-6);
    }
}
