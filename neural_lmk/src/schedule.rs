//! Learning-rate schedules stepped once per epoch.

/// Epoch-level learning-rate schedule.
pub trait LrSchedule {
    /// Learning rate for the current epoch.
    fn current(&self) -> f64;

    /// Advance one epoch and return the new rate.
    fn step(&mut self) -> f64;
}

/// Keeps the rate fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantLr {
    lr: f64,
}

impl ConstantLr {
    /// Fixed rate `lr`.
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl LrSchedule for ConstantLr {
    fn current(&self) -> f64 {
        self.lr
    }

    fn step(&mut self) -> f64 {
        self.lr
    }
}

/// Multiplies the rate by `gamma` every `step_size` epochs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLr {
    base: f64,
    step_size: usize,
    gamma: f64,
    epoch: usize,
}

impl StepLr {
    /// Decay `base` by `gamma` every `step_size` epochs. A `step_size` of 0 is treated as 1.
    pub fn new(base: f64, step_size: usize, gamma: f64) -> Self {
        Self {
            base,
            step_size: step_size.max(1),
            gamma,
            epoch: 0,
        }
    }
}

impl LrSchedule for StepLr {
    fn current(&self) -> f64 {
        self.base * self.gamma.powi((self.epoch / self.step_size) as i32)
    }

    fn step(&mut self) -> f64 {
        self.epoch += 1;
        self.current()
    }
}

/// Multiplies the rate by `gamma` every epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialLr {
    lr: f64,
    gamma: f64,
}

impl ExponentialLr {
    /// Decay `base` by `gamma` per epoch.
    pub fn new(base: f64, gamma: f64) -> Self {
        Self { lr: base, gamma }
    }
}

impl LrSchedule for ExponentialLr {
    fn current(&self) -> f64 {
        self.lr
    }

    fn step(&mut self) -> f64 {
        self.lr *= self.gamma;
        self.lr
    }
}
