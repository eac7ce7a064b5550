//! Histograms with automatic bin selection.

/// Upper bound on the bin count, whatever the estimators suggest.
pub const MAX_BINS: usize = 1024;

/// Bin counts and edges. `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, ascending.
    pub edges: Vec<f64>,
    /// Values per bin. The last bin is closed on the right.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin `values` with the larger resolution of the Freedman-Diaconis and
    /// Sturges estimators. Non-finite values are ignored. The bin count never
    /// exceeds the number of values or [`MAX_BINS`].
    pub fn auto(values: &[f32]) -> Self {
        let mut data: Vec<f64> = values
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| f64::from(v))
            .collect();
        data.sort_by(f64::total_cmp);

        let (Some(&lo), Some(&hi)) = (data.first(), data.last()) else {
            return Self {
                edges: vec![0.0, 1.0],
                counts: vec![0],
            };
        };

        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
        let n = data.len() as f64;
        let range = hi - lo;

        let sturges = range / (n.log2() + 1.0);
        let iqr = percentile(&data, 75.0) - percentile(&data, 25.0);
        let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
        let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

        let bins = if width > 0.0 {
            ((range / width).ceil() as usize).clamp(1, data.len().min(MAX_BINS))
        } else {
            1
        };

        let edges: Vec<f64> = (0..=bins)
            .map(|i| lo + range * i as f64 / bins as f64)
            .collect();
        let mut counts = vec![0u64; bins];
        for &v in &data {
            let idx = (((v - lo) / range) * bins as f64) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Self { edges, counts }
    }

    /// Total count.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Linearly interpolated percentile of sorted data.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q / 100.0 * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    let frac = pos - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}
