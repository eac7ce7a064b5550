//! Training loop and train steps.
//!
//! - [`EpochRunner`]: per-epoch loop with budget, telemetry, validation and schedule
//! - [`TrainStep`]: model seam, with [`FnStep`] and [`BurnHeatmapStep`]
//! - progress line formatting

mod burn_step;
mod progress;
mod runner;
mod step;

pub use burn_step::{BurnHeatmapStep, HeatmapModel};
pub use progress::{format_duration, log_step, Progress};
pub use runner::{EpochLog, EpochRunner, TrainerState, ValidationLog};
pub use step::{FnStep, StepOutput, TrainStep};
