//! Trainer configuration.

use burn::config::Config;

/// Where the per-epoch step budget stops.
#[derive(Config, Debug, PartialEq)]
pub enum BudgetBoundary {
    /// Process batch indices `0..len_epoch`.
    Exclusive,
    /// Process indices `0..=len_epoch` when the stream is long enough, one
    /// more than the budget. Kept for reproducing older runs; the mean loss
    /// still divides by `len_epoch`.
    LegacyInclusive,
}

impl Default for BudgetBoundary {
    fn default() -> Self {
        Self::Exclusive
    }
}

/// Element-wise regression loss between aligned heat-map stacks.
#[derive(Config, Debug, PartialEq)]
pub enum HeatmapLoss {
    /// Mean squared error.
    Mse,
    /// Mean absolute error.
    L1,
}

impl Default for HeatmapLoss {
    fn default() -> Self {
        Self::Mse
    }
}

/// Configuration for [`EpochRunner`](crate::training::EpochRunner).
#[derive(Config, Debug)]
pub struct TrainerConfig {
    /// Batches per epoch. `None` uses one natural pass over the stream;
    /// `Some(n)` replays the stream cyclically.
    pub len_epoch: Option<usize>,

    /// Stop condition of the per-epoch loop.
    #[config(default = "BudgetBoundary::Exclusive")]
    pub budget_boundary: BudgetBoundary,

    /// Evaluate metric hooks during training and validation.
    #[config(default = false)]
    pub eval_metrics: bool,

    /// Initial learning rate.
    #[config(default = 1e-3)]
    pub learning_rate: f64,

    /// Training loss.
    #[config(default = "HeatmapLoss::Mse")]
    pub loss: HeatmapLoss,

    /// Number of epochs for [`EpochRunner::run`](crate::training::EpochRunner::run).
    #[config(default = 1)]
    pub epochs: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerConfig {
    /// Configuration that replays the stream for `len_epoch` batches per epoch.
    pub fn iteration_based(len_epoch: usize) -> Self {
        Self::new().with_len_epoch(Some(len_epoch))
    }
}
