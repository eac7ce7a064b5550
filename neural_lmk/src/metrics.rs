//! Heat-map metrics evaluated on host data.

use crate::data::HeatmapView;

/// Metric over aligned prediction and target stacks.
pub trait HeatmapMetric {
    /// Tag under which the metric is reported.
    fn name(&self) -> &str;

    /// Metric value for one batch.
    fn compute(&self, output: &HeatmapView<'_>, target: &HeatmapView<'_>) -> f32;
}

/// Mean distance in pixels between the peak of each predicted map and the
/// peak of its target.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakDistance;

fn arg_max(map: &[f32], width: usize) -> (f32, f32) {
    let idx = map
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
        .0;
    ((idx % width) as f32, (idx / width) as f32)
}

impl HeatmapMetric for PeakDistance {
    fn name(&self) -> &str {
        "peak_distance"
    }

    fn compute(&self, output: &HeatmapView<'_>, target: &HeatmapView<'_>) -> f32 {
        let n = output.n_maps().min(target.n_maps());
        if n == 0 {
            return 0.0;
        }
        let width = output.shape[4];
        let total: f32 = (0..n)
            .map(|i| {
                let (ox, oy) = arg_max(output.map(i), width);
                let (tx, ty) = arg_max(target.map(i), width);
                ((ox - tx).powi(2) + (oy - ty).powi(2)).sqrt()
            })
            .sum();
        total / n as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_distance() {
        // two 2x3 maps
        let out = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let tgt = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let o = HeatmapView::new(&out, [1, 2, 1, 2, 3]).unwrap();
        let t = HeatmapView::new(&tgt, [1, 2, 1, 2, 3]).unwrap();
        // first map: same peak; second: (0,0) vs (2,1)
        let expected = (5.0f32).sqrt() / 2.0;
        assert!((PeakDistance.compute(&o, &t) - expected).abs() < 1e-6);
    }
}
