//! Per-batch progress lines.

/// Batches between progress lines: `floor(sqrt(batch_size))`, at least 1.
pub fn log_step(batch_size: usize) -> usize {
    ((batch_size as f64).sqrt().floor() as usize).max(1)
}

/// Format seconds like `H:MM:SS[.ffffff]`, with a `N day(s), ` prefix past 24 hours.
pub fn format_duration(seconds: f64) -> String {
    let total_micros = (seconds.max(0.0) * 1e6).round() as u64;
    let micros = total_micros % 1_000_000;
    let total_secs = total_micros / 1_000_000;
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let secs = total_secs % 60;

    let mut out = String::new();
    if days > 0 {
        let unit = if days == 1 { "day" } else { "days" };
        out.push_str(&format!("{days} {unit}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{secs:02}"));
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}

/// Tracks per-batch wall time within an epoch and formats progress lines.
#[derive(Debug, Clone)]
pub struct Progress {
    log_step: usize,
    len_epoch: usize,
    batch_size: usize,
    n_samples: Option<usize>,
    time_sum: f64,
    time_count: usize,
}

impl Progress {
    /// Progress for one epoch of `len_epoch` batches.
    pub fn new(len_epoch: usize, batch_size: usize, n_samples: Option<usize>) -> Self {
        Self {
            log_step: log_step(batch_size),
            len_epoch,
            batch_size,
            n_samples,
            time_sum: 0.0,
            time_count: 0,
        }
    }

    /// Record the wall time of one batch.
    pub fn record(&mut self, seconds: f64) {
        self.time_sum += seconds;
        self.time_count += 1;
    }

    /// Mean seconds per batch so far.
    pub fn mean_batch_time(&self) -> f64 {
        if self.time_count == 0 {
            0.0
        } else {
            self.time_sum / self.time_count as f64
        }
    }

    /// `[current/total (pct%)]` for batch `batch_idx`.
    pub fn position(&self, batch_idx: usize) -> String {
        let (current, total) = match self.n_samples {
            Some(n) => (batch_idx * self.batch_size, n),
            None => (batch_idx, self.len_epoch),
        };
        let pct = if total == 0 {
            0.0
        } else {
            100.0 * current as f64 / total as f64
        };
        format!("[{current}/{total} ({pct:.0}%)]")
    }

    /// Progress line for batch `batch_idx`, or `None` off the stride.
    pub fn line(&self, epoch: usize, batch_idx: usize, loss: f32) -> Option<String> {
        if batch_idx % self.log_step != 0 {
            return None;
        }
        let mean = self.mean_batch_time();
        let left = self.len_epoch.saturating_sub(batch_idx) as f64 * mean;
        Some(format!(
            "Train Epoch: {epoch} {} Loss: {loss:.6} Time per batch: {mean:.5} Time left in epoch: {}",
            self.position(batch_idx),
            format_duration(left)
        ))
    }
}
