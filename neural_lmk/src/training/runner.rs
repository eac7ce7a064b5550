//! Epoch-level training loop.

use instant::Instant;

use crate::config::{BudgetBoundary, TrainerConfig};
use crate::data::{Cyclic, SampleStream};
use crate::error::{NeuralLmkError, Result};
use crate::schedule::LrSchedule;
use crate::telemetry::{Mode, NullWriter, TelemetryWriter};

use super::progress::{self, Progress};
use super::step::TrainStep;

/// Counters owned by the runner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerState {
    /// Training batches processed over all epochs.
    pub global_step: usize,
    /// Last finished epoch, 0 before the first.
    pub epochs_completed: usize,
    /// Rate currently applied to the train step.
    pub learning_rate: f64,
}

/// Validation summary of one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationLog {
    /// Mean validation loss.
    pub val_loss: f32,
    /// Mean of each metric, zeros when metric evaluation is off.
    pub val_metrics: Vec<(String, f32)>,
}

/// Summary of one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochLog {
    /// Epoch number, starting at 1.
    pub epoch: usize,
    /// `total_loss / len_epoch`.
    pub loss: f32,
    /// Mean training metrics, present when metric evaluation is on.
    pub metrics: Option<Vec<(String, f32)>>,
    /// Validation summary, present when a validation stream is configured.
    pub validation: Option<ValidationLog>,
}

impl EpochLog {
    /// Flat `key: value` view: `epoch`, `loss`, metric names, then
    /// `val_loss` and `val_`-prefixed metric names.
    pub fn entries(&self) -> Vec<(String, f32)> {
        let mut out = vec![
            ("epoch".to_string(), self.epoch as f32),
            ("loss".to_string(), self.loss),
        ];
        if let Some(metrics) = &self.metrics {
            out.extend(metrics.iter().cloned());
        }
        if let Some(valid) = &self.validation {
            out.push(("val_loss".to_string(), valid.val_loss));
            out.extend(
                valid
                    .val_metrics
                    .iter()
                    .map(|(name, value)| (format!("val_{name}"), *value)),
            );
        }
        out
    }

    /// Write every entry at `info`.
    pub fn log(&self) {
        for (key, value) in self.entries() {
            log::info!("    {key:<15}: {value}");
        }
    }
}

/// Training stream, either one natural pass per epoch or cyclic replay.
enum TrainSource<S> {
    Epoch(S),
    Iteration(Cyclic<S>),
}

impl<S: SampleStream> TrainSource<S> {
    fn batch_size(&self) -> usize {
        match self {
            Self::Epoch(s) => s.batch_size(),
            Self::Iteration(s) => s.batch_size(),
        }
    }

    fn n_samples(&self) -> Option<usize> {
        match self {
            Self::Epoch(s) => s.n_samples(),
            Self::Iteration(s) => s.n_samples(),
        }
    }

    fn rewind(&mut self) {
        match self {
            Self::Epoch(s) => s.rewind(),
            Self::Iteration(s) => s.rewind(),
        }
    }

    fn next_batch(&mut self) -> Option<Result<S::Item>> {
        match self {
            Self::Epoch(s) => s.next_batch(),
            Self::Iteration(s) => s.next_batch(),
        }
    }
}

/// Drives a [`TrainStep`] over a training stream, one epoch at a time.
///
/// ```ignore
/// let mut runner = EpochRunner::new(step, train_stream, TrainerConfig::new())?
///     .with_validation(valid_stream)
///     .with_schedule(StepLr::new(1e-3, 10, 0.5));
/// let log = runner.run_epoch(1)?;
/// log.log();
/// ```
pub struct EpochRunner<T, S, W = NullWriter> {
    step: T,
    train: TrainSource<S>,
    valid: Option<S>,
    schedule: Option<Box<dyn LrSchedule>>,
    writer: W,
    config: TrainerConfig,
    len_epoch: usize,
    log_step: usize,
    state: TrainerState,
}

impl<T, S> EpochRunner<T, S, NullWriter>
where
    S: SampleStream,
    T: TrainStep<S::Item>,
{
    /// Runner over `stream`.
    ///
    /// With `config.len_epoch == None` every epoch is one natural pass over
    /// `stream`. With `Some(n)` the stream is replayed cyclically and every
    /// epoch takes `n` batches, continuing where the previous one stopped.
    pub fn new(mut step: T, stream: S, config: TrainerConfig) -> Result<Self> {
        if !(config.learning_rate.is_finite() && config.learning_rate >= 0.0) {
            return Err(NeuralLmkError::InvalidConfig {
                message: format!("learning rate must be finite and >= 0, got {}", config.learning_rate),
            });
        }

        let log_step = progress::log_step(stream.batch_size());
        let (len_epoch, train) = match config.len_epoch {
            None => (stream.len(), TrainSource::Epoch(stream)),
            Some(n) => (n, TrainSource::Iteration(Cyclic::new(stream))),
        };
        step.set_learning_rate(config.learning_rate);

        log::debug!(
            "EpochRunner: {len_epoch} batches per epoch ({}), log every {log_step}",
            if config.len_epoch.is_some() { "iteration-based" } else { "epoch-based" }
        );

        Ok(Self {
            step,
            train,
            valid: None,
            schedule: None,
            writer: NullWriter,
            state: TrainerState {
                global_step: 0,
                epochs_completed: 0,
                learning_rate: config.learning_rate,
            },
            config,
            len_epoch,
            log_step,
        })
    }
}

impl<T, S, W> EpochRunner<T, S, W>
where
    S: SampleStream,
    T: TrainStep<S::Item>,
    W: TelemetryWriter,
{
    /// Validate after every epoch on `stream`.
    pub fn with_validation(mut self, stream: S) -> Self {
        self.valid = Some(stream);
        self
    }

    /// Step `schedule` once per epoch. Its current rate is applied right away.
    pub fn with_schedule(mut self, schedule: impl LrSchedule + 'static) -> Self {
        let lr = schedule.current();
        self.step.set_learning_rate(lr);
        self.state.learning_rate = lr;
        self.schedule = Some(Box::new(schedule));
        self
    }

    /// Send telemetry to `writer`.
    pub fn with_writer<W2: TelemetryWriter>(self, writer: W2) -> EpochRunner<T, S, W2> {
        EpochRunner {
            step: self.step,
            train: self.train,
            valid: self.valid,
            schedule: self.schedule,
            writer,
            config: self.config,
            len_epoch: self.len_epoch,
            log_step: self.log_step,
            state: self.state,
        }
    }

    /// Batches per epoch.
    pub fn len_epoch(&self) -> usize {
        self.len_epoch
    }

    /// Batches between progress lines.
    pub fn log_step(&self) -> usize {
        self.log_step
    }

    /// Current counters.
    pub fn state(&self) -> &TrainerState {
        &self.state
    }

    /// The configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// The train step.
    pub fn step(&self) -> &T {
        &self.step
    }

    /// The train step, mutable.
    pub fn step_mut(&mut self) -> &mut T {
        &mut self.step
    }

    /// The telemetry writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Unwrap into the train step and writer.
    pub fn into_parts(self) -> (T, W) {
        (self.step, self.writer)
    }

    /// Train for one epoch, then validate and advance the schedule.
    ///
    /// `epoch` starts at 1 and positions telemetry steps at
    /// `(epoch - 1) * len_epoch + batch_idx`.
    ///
    /// Fails with [`NeuralLmkError::EmptyEpoch`] when the budget is zero or
    /// when the training or validation stream yields no batch at all.
    pub fn run_epoch(&mut self, epoch: usize) -> Result<EpochLog> {
        if epoch == 0 {
            return Err(NeuralLmkError::InvalidConfig {
                message: "epochs are numbered from 1".to_string(),
            });
        }
        if self.len_epoch == 0 {
            return Err(NeuralLmkError::EmptyEpoch { phase: "training" });
        }

        let with_metrics = self.config.eval_metrics;
        let names = self.step.metric_names();
        let limit = match self.config.budget_boundary {
            BudgetBoundary::Exclusive => self.len_epoch,
            BudgetBoundary::LegacyInclusive => self.len_epoch + 1,
        };

        let mut progress = Progress::new(self.len_epoch, self.train.batch_size(), self.train.n_samples());
        let mut total_loss = 0.0f64;
        let mut total_metrics = vec![0.0f64; names.len()];

        let mut processed = 0usize;
        self.train.rewind();
        for batch_idx in 0..limit {
            let Some(batch) = self.train.next_batch() else {
                break;
            };
            let batch = batch?;

            let start = Instant::now();
            let output = self.step.train_step(batch, with_metrics)?;
            progress.record(start.elapsed().as_secs_f64());

            self.writer
                .set_step((epoch - 1) * self.len_epoch + batch_idx, Mode::Train);
            self.writer.add_scalar("loss", output.loss);
            if let Some(values) = &output.metrics {
                accumulate(&mut self.writer, &names, values, &mut total_metrics);
            }
            total_loss += f64::from(output.loss);
            self.state.global_step += 1;
            processed += 1;

            if let Some(line) = progress.line(epoch, batch_idx, output.loss) {
                log::debug!("{line}");
            }
        }

        if processed == 0 {
            return Err(NeuralLmkError::EmptyEpoch { phase: "training" });
        }

        let len = self.len_epoch as f64;
        let metrics = with_metrics.then(|| mean_by_name(&names, &total_metrics, len));

        let validation = if self.valid.is_some() {
            Some(self.validate(epoch, with_metrics, &names)?)
        } else {
            log::debug!("no validation stream, skipping validation for epoch {epoch}");
            None
        };

        if let Some(schedule) = self.schedule.as_mut() {
            let lr = schedule.step();
            self.step.set_learning_rate(lr);
            self.state.learning_rate = lr;
        }
        self.state.epochs_completed = epoch;

        Ok(EpochLog {
            epoch,
            loss: (total_loss / len) as f32,
            metrics,
            validation,
        })
    }

    /// Run `config.epochs` epochs after the last completed one.
    pub fn run(&mut self) -> Result<Vec<EpochLog>> {
        let first = self.state.epochs_completed + 1;
        let mut logs = Vec::with_capacity(self.config.epochs);
        for epoch in first..first + self.config.epochs {
            let log = self.run_epoch(epoch)?;
            log.log();
            logs.push(log);
        }
        Ok(logs)
    }

    fn validate(&mut self, epoch: usize, with_metrics: bool, names: &[String]) -> Result<ValidationLog> {
        let Some(valid) = self.valid.as_mut() else {
            return Err(NeuralLmkError::TrainingError {
                message: "validation stream missing".to_string(),
            });
        };
        let n = valid.len();
        if n == 0 {
            return Err(NeuralLmkError::EmptyEpoch { phase: "validation" });
        }

        let mut total_loss = 0.0f64;
        let mut total_metrics = vec![0.0f64; names.len()];

        valid.rewind();
        let mut batch_idx = 0;
        while let Some(batch) = valid.next_batch() {
            let output = self.step.valid_step(batch?, with_metrics)?;

            self.writer.set_step((epoch - 1) * n + batch_idx, Mode::Valid);
            self.writer.add_scalar("loss", output.loss);
            if let Some(values) = &output.metrics {
                accumulate(&mut self.writer, names, values, &mut total_metrics);
            }
            total_loss += f64::from(output.loss);
            batch_idx += 1;
        }
        if batch_idx == 0 {
            return Err(NeuralLmkError::EmptyEpoch { phase: "validation" });
        }

        for (name, values) in self.step.parameter_summaries() {
            self.writer.add_histogram(&name, &values);
        }

        Ok(ValidationLog {
            val_loss: (total_loss / n as f64) as f32,
            val_metrics: mean_by_name(names, &total_metrics, n as f64),
        })
    }
}

fn accumulate<W: TelemetryWriter>(writer: &mut W, names: &[String], values: &[f32], totals: &mut [f64]) {
    for ((name, &value), total) in names.iter().zip(values).zip(totals.iter_mut()) {
        writer.add_scalar(name, value);
        *total += f64::from(value);
    }
}

fn mean_by_name(names: &[String], totals: &[f64], len: f64) -> Vec<(String, f32)> {
    names
        .iter()
        .zip(totals)
        .map(|(name, total)| (name.clone(), (total / len) as f32))
        .collect()
}

impl<T, S, W> std::fmt::Debug for EpochRunner<T, S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpochRunner")
            .field("len_epoch", &self.len_epoch)
            .field("log_step", &self.log_step)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
