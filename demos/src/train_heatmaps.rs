//! Heat-Map Training Example
//!
//! Trains the reference `HeatmapNet` on synthetic blob images whose targets
//! are Gaussian heat maps centred on the blobs.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release --bin train_heatmaps -- [epochs] [len_epoch]
//! ```

use std::env;
use std::process::ExitCode;

use burn::backend::{Autodiff, NdArray};
use burn::optim::AdamConfig;
use instant::Instant;

use neural_lmk::prelude::*;

type MyBackend = Autodiff<NdArray>;

const SIZE: usize = 16;
const LANDMARKS: usize = 2;
const BATCH: usize = 4;

fn gaussian(x: usize, y: usize, cx: f32, cy: f32, sigma: f32) -> f32 {
    let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
    (-d2 / (2.0 * sigma * sigma)).exp()
}

/// One batch with landmark positions derived from `seed`.
fn synthetic_batch(seed: usize) -> HeatmapSample {
    let mut image = Vec::with_capacity(BATCH * SIZE * SIZE * 3);
    let mut stack = Vec::with_capacity(BATCH * SIZE * SIZE * LANDMARKS);

    for b in 0..BATCH {
        let centers: Vec<(f32, f32)> = (0..LANDMARKS)
            .map(|l| {
                let k = seed * 31 + b * 7 + l * 13;
                ((2 + k % (SIZE - 4)) as f32, (2 + (k / 3) % (SIZE - 4)) as f32)
            })
            .collect();

        for y in 0..SIZE {
            for x in 0..SIZE {
                let blob: f32 = centers
                    .iter()
                    .map(|&(cx, cy)| gaussian(x, y, cx, cy, 1.5))
                    .sum();
                image.extend_from_slice(&[blob, blob * 0.5, 1.0 - blob.min(1.0)]);
                stack.extend(centers.iter().map(|&(cx, cy)| gaussian(x, y, cx, cy, 1.0)));
            }
        }
    }

    HeatmapSample::new(image, [BATCH, SIZE, SIZE, 3], stack, [BATCH, 1, SIZE, SIZE, LANDMARKS])
}

fn main() -> ExitCode {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════════════");
    println!("            Heat-Map Training Showcase");
    println!("═══════════════════════════════════════════════════════════════");
    println!();

    let args: Vec<String> = env::args().collect();
    let epochs = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(5);
    let len_epoch = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(16);

    let device = Default::default();
    let model = HeatmapNetConfig::new(LANDMARKS)
        .with_hidden_channels(vec![16, 16])
        .init::<MyBackend>(&device);
    let optim = AdamConfig::new().init::<MyBackend, HeatmapNet<MyBackend>>();
    let step = BurnHeatmapStep::new(model, optim, 1e-2, &device).with_metric(PeakDistance);

    let train = VecStream::new((0..8).map(synthetic_batch).collect(), BATCH).with_n_samples(8 * BATCH);
    let valid = VecStream::new((100..102).map(synthetic_batch).collect(), BATCH);

    let config = TrainerConfig::iteration_based(len_epoch)
        .with_epochs(epochs)
        .with_eval_metrics(true);

    println!("Configuration:");
    println!("{config}");
    println!();

    let runner = EpochRunner::new(step, train, config).map(|r| {
        r.with_validation(valid)
            .with_schedule(StepLr::new(1e-2, 2, 0.5))
            .with_writer(LogWriter::new())
    });
    let mut runner = match runner {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Cannot build trainer: {e}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let logs = match runner.run() {
        Ok(logs) => logs,
        Err(e) => {
            eprintln!("Training failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("  epoch        loss    val_loss");
    for log in &logs {
        let val = log.validation.as_ref().map_or(f32::NAN, |v| v.val_loss);
        println!("  {:>5} {:>11.6} {:>11.6}", log.epoch, log.loss, val);
    }
    println!();
    println!(
        "Trained {} steps in {:.2?}, final learning rate {:.2e}",
        runner.state().global_step,
        start.elapsed(),
        runner.state().learning_rate
    );

    ExitCode::SUCCESS
}
