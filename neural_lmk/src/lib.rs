//! # neural_lmk
//!
//! Epoch-level training of landmark heat-map regressors with Burn.
//!
//! The trainer consumes image / heat-map-stack batches from a
//! [`SampleStream`](data::SampleStream), reconciles their channel-last layout
//! with the model's channel-first layout and drives one optimizer update per
//! batch through a [`TrainStep`](training::TrainStep).
//!
//! ## Quick Start
//!
//! ```ignore
//! use burn::backend::{Autodiff, NdArray};
//! use burn::optim::AdamConfig;
//! use neural_lmk::prelude::*;
//!
//! type MyBackend = Autodiff<NdArray>;
//!
//! let device = Default::default();
//! let model = HeatmapNetConfig::new(68).init::<MyBackend>(&device);
//! let step = BurnHeatmapStep::new(model, AdamConfig::new().init(), 1e-3, &device);
//!
//! let mut runner = EpochRunner::new(step, train_stream, TrainerConfig::new().with_epochs(10))?
//!     .with_validation(valid_stream)
//!     .with_writer(LogWriter::new());
//! let logs = runner.run()?;
//! ```
//!
//! ## Layouts
//!
//! | tensor        | delivered          | model side         |
//! |---------------|--------------------|--------------------|
//! | image         | `[B, H, W, C]`     | `[B, C, H, W]`     |
//! | target stack  | `[B, S, H, W, L]`  | `[B, S, L, H, W]`  |
//! | model output  | `[S, B, L, H, W]`  | `[B, S, L, H, W]`  |
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `ndarray` (default): CPU backend
//! - `wgpu`: GPU backend via WebGPU

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod metrics;
pub mod nn;
pub mod schedule;
pub mod telemetry;
pub mod training;

pub use config::{BudgetBoundary, HeatmapLoss, TrainerConfig};
pub use error::{NeuralLmkError, Result};
pub use training::{EpochLog, EpochRunner, TrainStep};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{BudgetBoundary, HeatmapLoss, TrainerConfig};
    pub use crate::data::{Cyclic, HeatmapSample, HeatmapView, SampleStream, VecStream};
    pub use crate::error::{NeuralLmkError, Result};
    pub use crate::loss::heatmap_loss;
    pub use crate::metrics::{HeatmapMetric, PeakDistance};
    pub use crate::nn::{HeatmapNet, HeatmapNetConfig};
    pub use crate::schedule::{ConstantLr, ExponentialLr, LrSchedule, StepLr};
    pub use crate::telemetry::{
        Histogram, LogWriter, MemoryWriter, Mode, NullWriter, TelemetryEvent, TelemetryWriter,
    };
    pub use crate::training::{
        format_duration, log_step, BurnHeatmapStep, EpochLog, EpochRunner, FnStep, HeatmapModel,
        Progress, StepOutput, TrainStep, TrainerState, ValidationLog,
    };
}
