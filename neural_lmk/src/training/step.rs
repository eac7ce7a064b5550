//! The model seam of the trainer.

use crate::error::Result;

/// Loss and optional metric values of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutput {
    /// Scalar loss.
    pub loss: f32,
    /// One value per [`TrainStep::metric_names`] entry, when requested.
    pub metrics: Option<Vec<f32>>,
}

impl StepOutput {
    /// Output without metrics.
    pub fn loss(loss: f32) -> Self {
        Self {
            loss,
            metrics: None,
        }
    }
}

/// Model, loss and optimizer as seen by [`EpochRunner`](super::EpochRunner).
///
/// `train_step` runs forward, backward and one optimizer update.
/// `valid_step` runs forward only and must leave parameters untouched.
pub trait TrainStep<I> {
    /// Train on one batch.
    fn train_step(&mut self, batch: I, with_metrics: bool) -> Result<StepOutput>;

    /// Evaluate one batch without updating parameters.
    fn valid_step(&self, batch: I, with_metrics: bool) -> Result<StepOutput>;

    /// Apply a learning rate from a schedule.
    fn set_learning_rate(&mut self, _learning_rate: f64) {}

    /// Tag and flattened values of each parameter tensor, in a stable order.
    ///
    /// Tags are used as histogram tags; they only need to be unique and
    /// stable across epochs. [`BurnHeatmapStep`](super::BurnHeatmapStep)
    /// uses positional tags `param{index} {shape:?}` in module visit order,
    /// e.g. `param0 [4, 1, 3, 3]` for the first convolution weight.
    fn parameter_summaries(&self) -> Vec<(String, Vec<f32>)> {
        Vec::new()
    }

    /// Names of the metrics reported in [`StepOutput::metrics`].
    fn metric_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Closure-backed step, mostly for tests and simple models.
pub struct FnStep<F, G> {
    train: F,
    valid: G,
    learning_rate: f64,
}

impl<F, G> FnStep<F, G> {
    /// Step that calls `train` for training batches and `valid` for
    /// validation batches.
    pub fn new(train: F, valid: G) -> Self {
        Self {
            train,
            valid,
            learning_rate: 0.0,
        }
    }

    /// Last learning rate applied.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl<I, F, G> TrainStep<I> for FnStep<F, G>
where
    F: FnMut(I) -> Result<f32>,
    G: Fn(I) -> Result<f32>,
{
    fn train_step(&mut self, batch: I, _with_metrics: bool) -> Result<StepOutput> {
        (self.train)(batch).map(StepOutput::loss)
    }

    fn valid_step(&self, batch: I, _with_metrics: bool) -> Result<StepOutput> {
        (self.valid)(batch).map(StepOutput::loss)
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }
}

impl<F, G> std::fmt::Debug for FnStep<F, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep")
            .field("learning_rate", &self.learning_rate)
            .finish_non_exhaustive()
    }
}
