//! Scalar and histogram telemetry.
//!
//! Writers receive a global step and a [`Mode`] before every group of
//! values. [`LogWriter`] emits through `log`, [`MemoryWriter`] keeps events
//! for inspection.

mod histogram;

pub use histogram::{Histogram, MAX_BINS};

use std::fmt;

/// Phase a telemetry value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Training batches.
    Train,
    /// Validation batches and post-validation parameter histograms.
    Valid,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train => write!(f, "train"),
            Self::Valid => write!(f, "valid"),
        }
    }
}

/// Sink for per-step telemetry.
pub trait TelemetryWriter {
    /// Set the step and mode for subsequent values.
    fn set_step(&mut self, step: usize, mode: Mode);

    /// Record a scalar.
    fn add_scalar(&mut self, tag: &str, value: f32);

    /// Record a histogram over `values`.
    fn add_histogram(&mut self, tag: &str, values: &[f32]);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullWriter;

impl TelemetryWriter for NullWriter {
    fn set_step(&mut self, _step: usize, _mode: Mode) {}
    fn add_scalar(&mut self, _tag: &str, _value: f32) {}
    fn add_histogram(&mut self, _tag: &str, _values: &[f32]) {}
}

/// Emits telemetry as `debug` log records.
#[derive(Debug, Clone, Default)]
pub struct LogWriter {
    step: usize,
    mode: Option<Mode>,
}

impl LogWriter {
    /// New writer.
    pub fn new() -> Self {
        Self::default()
    }

    fn prefix(&self) -> String {
        match self.mode {
            Some(mode) => format!("[{mode} step {}]", self.step),
            None => format!("[step {}]", self.step),
        }
    }
}

impl TelemetryWriter for LogWriter {
    fn set_step(&mut self, step: usize, mode: Mode) {
        self.step = step;
        self.mode = Some(mode);
    }

    fn add_scalar(&mut self, tag: &str, value: f32) {
        log::debug!("{} {tag} = {value:.6}", self.prefix());
    }

    fn add_histogram(&mut self, tag: &str, values: &[f32]) {
        let hist = Histogram::auto(values);
        log::debug!(
            "{} {tag}: {} values, {} bins over [{:.6}, {:.6}]",
            self.prefix(),
            values.len(),
            hist.counts.len(),
            hist.edges.first().copied().unwrap_or(0.0),
            hist.edges.last().copied().unwrap_or(0.0),
        );
    }
}

/// A recorded telemetry value.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    /// Scalar value.
    Scalar {
        /// Global step.
        step: usize,
        /// Phase.
        mode: Mode,
        /// Tag.
        tag: String,
        /// Value.
        value: f32,
    },
    /// Histogram of a parameter tensor.
    Histogram {
        /// Global step.
        step: usize,
        /// Phase.
        mode: Mode,
        /// Tag.
        tag: String,
        /// Binned values.
        histogram: Histogram,
    },
}

impl TelemetryEvent {
    /// Tag of the event.
    pub fn tag(&self) -> &str {
        match self {
            Self::Scalar { tag, .. } | Self::Histogram { tag, .. } => tag,
        }
    }

    /// Step and mode of the event.
    pub fn step(&self) -> (usize, Mode) {
        match self {
            Self::Scalar { step, mode, .. } | Self::Histogram { step, mode, .. } => (*step, *mode),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone)]
pub struct MemoryWriter {
    step: usize,
    mode: Mode,
    events: Vec<TelemetryEvent>,
}

impl Default for MemoryWriter {
    fn default() -> Self {
        Self {
            step: 0,
            mode: Mode::Train,
            events: Vec::new(),
        }
    }
}

impl MemoryWriter {
    /// Empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in order.
    pub fn events(&self) -> &[TelemetryEvent] {
        &self.events
    }

    /// `(step, mode, value)` of every scalar with `tag`.
    pub fn scalars(&self, tag: &str) -> Vec<(usize, Mode, f32)> {
        self.events
            .iter()
            .filter_map(|event| match event {
                TelemetryEvent::Scalar {
                    step,
                    mode,
                    tag: t,
                    value,
                } if t == tag => Some((*step, *mode, *value)),
                _ => None,
            })
            .collect()
    }

    /// Histogram events.
    pub fn histograms(&self) -> impl Iterator<Item = &TelemetryEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, TelemetryEvent::Histogram { .. }))
    }
}

impl TelemetryWriter for MemoryWriter {
    fn set_step(&mut self, step: usize, mode: Mode) {
        self.step = step;
        self.mode = mode;
    }

    fn add_scalar(&mut self, tag: &str, value: f32) {
        self.events.push(TelemetryEvent::Scalar {
            step: self.step,
            mode: self.mode,
            tag: tag.to_string(),
            value,
        });
    }

    fn add_histogram(&mut self, tag: &str, values: &[f32]) {
        self.events.push(TelemetryEvent::Histogram {
            step: self.step,
            mode: self.mode,
            tag: tag.to_string(),
            histogram: Histogram::auto(values),
        });
    }
}

impl<W: TelemetryWriter + ?Sized> TelemetryWriter for &mut W {
    fn set_step(&mut self, step: usize, mode: Mode) {
        (**self).set_step(step, mode);
    }

    fn add_scalar(&mut self, tag: &str, value: f32) {
        (**self).add_scalar(tag, value);
    }

    fn add_histogram(&mut self, tag: &str, values: &[f32]) {
        (**self).add_histogram(tag, values);
    }
}
