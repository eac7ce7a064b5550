//! Burn train step on the NdArray backend.

use burn::backend::ndarray::NdArrayDevice;
use burn::backend::{Autodiff, NdArray};
use burn::optim::AdamConfig;

use neural_lmk::prelude::*;

type TestBackend = Autodiff<NdArray>;

const H: usize = 6;
const W: usize = 6;
const LANDMARKS: usize = 2;

/// Batch of 2 gray images with one Gaussian peak per landmark.
fn sample(landmarks: usize) -> HeatmapSample {
    let image: Vec<f32> = (0..2 * H * W).map(|i| ((i * 7) % 11) as f32 / 11.0).collect();
    let mut stack = Vec::with_capacity(2 * H * W * landmarks);
    for b in 0..2 {
        for y in 0..H {
            for x in 0..W {
                for l in 0..landmarks {
                    let (cx, cy) = ((1 + l + b) as f32, (2 + l) as f32);
                    let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
                    stack.push((-d2 / 2.0).exp());
                }
            }
        }
    }
    HeatmapSample::new(image, [2, H, W, 1], stack, [2, 1, H, W, landmarks])
}

fn step(
    device: &NdArrayDevice,
) -> BurnHeatmapStep<
    TestBackend,
    HeatmapNet<TestBackend>,
    impl burn::optim::Optimizer<HeatmapNet<TestBackend>, TestBackend>,
> {
    let model = HeatmapNetConfig::new(LANDMARKS)
        .with_in_channels(1)
        .with_hidden_channels(vec![4])
        .init::<TestBackend>(device);
    let optim = AdamConfig::new().init::<TestBackend, HeatmapNet<TestBackend>>();
    BurnHeatmapStep::new(model, optim, 1e-2, device)
}

#[test]
fn test_loss_decreases() {
    let device = NdArrayDevice::Cpu;
    let mut step = step(&device);

    let first = step.train_step(sample(LANDMARKS), false).unwrap().loss;
    let mut last = first;
    for _ in 0..30 {
        last = step.train_step(sample(LANDMARKS), false).unwrap().loss;
    }
    assert!(first.is_finite());
    assert!(last < first, "loss did not decrease: {first} -> {last}");
}

#[test]
fn test_validation_leaves_parameters_untouched() {
    let device = NdArrayDevice::Cpu;
    let mut step = step(&device);
    step.train_step(sample(LANDMARKS), false).unwrap();

    let before = step.parameter_summaries();
    let a = step.valid_step(sample(LANDMARKS), false).unwrap();
    let b = step.valid_step(sample(LANDMARKS), false).unwrap();
    let after = step.parameter_summaries();

    assert_eq!(a, b);
    assert_eq!(before.len(), after.len());
    for ((name_a, values_a), (name_b, values_b)) in before.iter().zip(&after) {
        assert_eq!(name_a, name_b);
        let bits_a: Vec<u32> = values_a.iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u32> = values_b.iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
    }
}

#[test]
fn test_parameter_summaries_cover_weights_and_biases() {
    let device = NdArrayDevice::Cpu;
    let step = step(&device);
    let params = step.parameter_summaries();
    // hidden conv and head conv
    assert_eq!(params.len(), 4);
    assert_eq!(params[0].0, "param0 [4, 1, 3, 3]");
    assert_eq!(params[1].0, "param1 [4]");
    let again: Vec<String> = step.parameter_summaries().into_iter().map(|(tag, _)| tag).collect();
    let tags: Vec<String> = params.iter().map(|(tag, _)| tag.clone()).collect();
    assert_eq!(tags, again);
    let total: usize = params.iter().map(|(_, v)| v.len()).sum();
    assert_eq!(total, 4 * 9 + 4 + LANDMARKS * 4 * 9 + LANDMARKS);
}

#[test]
fn test_landmark_count_mismatch() {
    let device = NdArrayDevice::Cpu;
    let mut step = step(&device);
    let err = step.train_step(sample(LANDMARKS + 1), false).unwrap_err();
    assert_eq!(
        err,
        NeuralLmkError::ShapeMismatch {
            tensor: "model output",
            expected: vec![2, 1, LANDMARKS + 1, H, W],
            got: vec![2, 1, LANDMARKS, H, W],
        }
    );
}

#[test]
fn test_declared_shape_mismatch() {
    let device = NdArrayDevice::Cpu;
    let step = step(&device);
    let mut bad = sample(LANDMARKS);
    bad.image.pop();
    assert!(matches!(
        step.valid_step(bad, false),
        Err(NeuralLmkError::ShapeMismatch { tensor: "image", .. })
    ));
}

#[test]
fn test_metrics_reported_when_requested() {
    let device = NdArrayDevice::Cpu;
    let mut step = step(&device).with_metric(PeakDistance);
    assert_eq!(step.metric_names(), vec!["peak_distance".to_string()]);

    let out = step.train_step(sample(LANDMARKS), true).unwrap();
    let metrics = out.metrics.unwrap();
    assert_eq!(metrics.len(), 1);
    assert!(metrics[0] >= 0.0);
    assert!(step.valid_step(sample(LANDMARKS), false).unwrap().metrics.is_none());
}

#[test]
fn test_runner_with_burn_step() {
    let device = NdArrayDevice::Cpu;
    let train = VecStream::new(vec![sample(LANDMARKS); 3], 2).with_n_samples(6);
    let valid = VecStream::new(vec![sample(LANDMARKS)], 2);
    let config = TrainerConfig::iteration_based(2).with_eval_metrics(true);

    let mut runner = EpochRunner::new(step(&device).with_metric(PeakDistance), train, config)
        .unwrap()
        .with_validation(valid)
        .with_schedule(ExponentialLr::new(1e-2, 0.5))
        .with_writer(MemoryWriter::new());

    let log = runner.run_epoch(1).unwrap();
    assert!(log.loss.is_finite());
    assert_eq!(log.metrics.as_ref().map(Vec::len), Some(1));
    assert!(log.validation.is_some());
    assert_eq!(runner.writer().histograms().count(), 4);
    assert_eq!(runner.step().learning_rate(), 5e-3);
}
