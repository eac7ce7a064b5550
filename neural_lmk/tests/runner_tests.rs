//! Epoch loop behaviour with closure-backed and recording steps.

use neural_lmk::prelude::*;

fn ok(x: f32) -> Result<f32> {
    Ok(x)
}

fn stream(n: usize) -> VecStream<f32> {
    VecStream::new((0..n).map(|i| i as f32).collect(), 4)
}

/// Step with one parameter tensor and one metric.
#[derive(Debug, Default)]
struct Recorder {
    trained: Vec<f32>,
}

impl TrainStep<f32> for Recorder {
    fn train_step(&mut self, batch: f32, with_metrics: bool) -> Result<StepOutput> {
        self.trained.push(batch);
        Ok(StepOutput {
            loss: batch,
            metrics: with_metrics.then(|| vec![batch * 10.0]),
        })
    }

    fn valid_step(&self, batch: f32, with_metrics: bool) -> Result<StepOutput> {
        Ok(StepOutput {
            loss: batch * 2.0,
            metrics: with_metrics.then(|| vec![batch]),
        })
    }

    fn parameter_summaries(&self) -> Vec<(String, Vec<f32>)> {
        vec![("weight".to_string(), vec![1.0, 2.0, 3.0])]
    }

    fn metric_names(&self) -> Vec<String> {
        vec!["scaled".to_string()]
    }
}

#[test]
fn test_exclusive_budget_continues_cursor() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(10), TrainerConfig::iteration_based(4)).unwrap();

    let first = runner.run_epoch(1).unwrap();
    assert_eq!(first.loss, 1.5);
    let second = runner.run_epoch(2).unwrap();
    assert_eq!(second.loss, 5.5);

    assert_eq!(runner.step().trained, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    assert_eq!(runner.state().global_step, 8);
    assert_eq!(runner.state().epochs_completed, 2);
}

#[test]
fn test_iteration_budget_wraps_stream() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(3), TrainerConfig::iteration_based(5)).unwrap();
    runner.run_epoch(1).unwrap();
    assert_eq!(runner.step().trained, vec![0.0, 1.0, 2.0, 0.0, 1.0]);
}

#[test]
fn test_legacy_inclusive_budget() {
    let config =
        TrainerConfig::iteration_based(4).with_budget_boundary(BudgetBoundary::LegacyInclusive);
    let mut runner = EpochRunner::new(Recorder::default(), stream(10), config).unwrap();

    let log = runner.run_epoch(1).unwrap();
    assert_eq!(runner.step().trained.len(), 5);
    // 0 + 1 + 2 + 3 + 4 over a budget of 4
    assert_eq!(log.loss, 2.5);
}

#[test]
fn test_epoch_based_restarts_each_epoch() {
    let step = FnStep::new(|x: f32| ok(x), |x: f32| ok(x));
    let mut runner = EpochRunner::new(step, stream(3), TrainerConfig::new()).unwrap();
    assert_eq!(runner.len_epoch(), 3);

    let a = runner.run_epoch(1).unwrap();
    let b = runner.run_epoch(2).unwrap();
    assert_eq!(a.loss, 1.0);
    assert_eq!(b.loss, 1.0);
    assert_eq!(runner.state().global_step, 6);
}

#[test]
fn test_train_telemetry_steps() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(10), TrainerConfig::iteration_based(4))
            .unwrap()
            .with_writer(MemoryWriter::new());

    runner.run_epoch(1).unwrap();
    runner.run_epoch(2).unwrap();

    let steps: Vec<usize> = runner
        .writer()
        .scalars("loss")
        .into_iter()
        .map(|(step, mode, _)| {
            assert_eq!(mode, Mode::Train);
            step
        })
        .collect();
    assert_eq!(steps, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_validation_steps_and_histograms() {
    let valid = VecStream::new(vec![1.0, 2.0, 3.0], 4);
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(10), TrainerConfig::iteration_based(2))
            .unwrap()
            .with_validation(valid)
            .with_writer(MemoryWriter::new());

    runner.run_epoch(1).unwrap();
    let log = runner.run_epoch(2).unwrap();

    let validation = log.validation.unwrap();
    assert_eq!(validation.val_loss, 4.0);
    assert_eq!(validation.val_metrics, vec![("scaled".to_string(), 0.0)]);

    let writer = runner.writer();
    let valid_steps: Vec<usize> = writer
        .scalars("loss")
        .into_iter()
        .filter(|(_, mode, _)| *mode == Mode::Valid)
        .map(|(step, _, _)| step)
        .collect();
    assert_eq!(valid_steps, vec![0, 1, 2, 3, 4, 5]);

    // one histogram per epoch, after the last validation batch
    let histograms: Vec<_> = writer.histograms().collect();
    assert_eq!(histograms.len(), 2);
    assert_eq!(histograms[1].tag(), "weight");
    assert_eq!(histograms[1].step(), (5, Mode::Valid));
    let last = writer.events().last().unwrap();
    assert_eq!(last.tag(), "weight");
}

#[test]
fn test_validation_skipped_without_stream() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(4), TrainerConfig::new()).unwrap();
    let log = runner.run_epoch(1).unwrap();
    assert!(log.validation.is_none());
    assert!(log.metrics.is_none());
}

#[test]
fn test_metrics_when_enabled() {
    let config = TrainerConfig::new().with_eval_metrics(true);
    let mut runner = EpochRunner::new(Recorder::default(), stream(4), config)
        .unwrap()
        .with_validation(VecStream::new(vec![2.0, 4.0], 1))
        .with_writer(MemoryWriter::new());

    let log = runner.run_epoch(1).unwrap();
    assert_eq!(log.metrics, Some(vec![("scaled".to_string(), 15.0)]));
    let validation = log.validation.clone().unwrap();
    assert_eq!(validation.val_metrics, vec![("scaled".to_string(), 3.0)]);
    assert_eq!(runner.writer().scalars("scaled").len(), 6);

    let keys: Vec<String> = log.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["epoch", "loss", "scaled", "val_loss", "val_scaled"]);
}

#[test]
fn test_schedule_steps_once_per_epoch() {
    let step = FnStep::new(|x: f32| ok(x), |x: f32| ok(x));
    let config = TrainerConfig::new().with_epochs(3);
    let mut runner = EpochRunner::new(step, stream(4), config)
        .unwrap()
        .with_validation(stream(2))
        .with_schedule(StepLr::new(1.0, 1, 0.5));
    assert_eq!(runner.step().learning_rate(), 1.0);

    let logs = runner.run().unwrap();
    assert_eq!(logs.len(), 3);
    assert_eq!(runner.step().learning_rate(), 0.125);
    assert_eq!(runner.state().learning_rate, 0.125);
}

#[test]
fn test_config_learning_rate_applied_without_schedule() {
    let step = FnStep::new(|x: f32| ok(x), |x: f32| ok(x));
    let runner =
        EpochRunner::new(step, stream(4), TrainerConfig::new().with_learning_rate(0.01)).unwrap();
    assert_eq!(runner.step().learning_rate(), 0.01);
}

#[test]
fn test_empty_training_pass() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(0), TrainerConfig::new()).unwrap();
    assert_eq!(
        runner.run_epoch(1).unwrap_err(),
        NeuralLmkError::EmptyEpoch { phase: "training" }
    );
}

#[test]
fn test_empty_validation_pass() {
    let mut runner = EpochRunner::new(Recorder::default(), stream(4), TrainerConfig::new())
        .unwrap()
        .with_validation(stream(0));
    assert_eq!(
        runner.run_epoch(1).unwrap_err(),
        NeuralLmkError::EmptyEpoch { phase: "validation" }
    );
}

#[test]
fn test_epoch_zero_rejected() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(4), TrainerConfig::new()).unwrap();
    assert!(matches!(
        runner.run_epoch(0),
        Err(NeuralLmkError::InvalidConfig { .. })
    ));
}

#[test]
fn test_step_error_propagates() {
    let failing = |_: f32| -> Result<f32> {
        Err(NeuralLmkError::Data {
            message: "bad batch".to_string(),
        })
    };
    let step = FnStep::new(failing, |x: f32| ok(x));
    let mut runner = EpochRunner::new(step, stream(4), TrainerConfig::new()).unwrap();
    assert!(matches!(runner.run_epoch(1), Err(NeuralLmkError::Data { .. })));
    assert_eq!(runner.state().global_step, 0);
}

#[test]
fn test_negative_learning_rate_rejected() {
    let config = TrainerConfig::new().with_learning_rate(-1.0);
    assert!(EpochRunner::new(Recorder::default(), stream(4), config).is_err());
}

/// Declares batches it never yields.
struct Hollow {
    declared: usize,
}

impl SampleStream for Hollow {
    type Item = f32;

    fn batch_size(&self) -> usize {
        1
    }

    fn len(&self) -> usize {
        self.declared
    }

    fn rewind(&mut self) {}

    fn next_batch(&mut self) -> Option<Result<f32>> {
        None
    }
}

#[test]
fn test_empty_stream_with_iteration_budget() {
    let mut runner =
        EpochRunner::new(Recorder::default(), stream(0), TrainerConfig::iteration_based(5)).unwrap();
    assert_eq!(
        runner.run_epoch(1).unwrap_err(),
        NeuralLmkError::EmptyEpoch { phase: "training" }
    );
    assert_eq!(runner.state().global_step, 0);
    assert_eq!(runner.state().epochs_completed, 0);
}

#[test]
fn test_stream_yielding_nothing_despite_declared_len() {
    let mut runner =
        EpochRunner::new(Recorder::default(), Hollow { declared: 3 }, TrainerConfig::new()).unwrap();
    assert_eq!(runner.len_epoch(), 3);
    assert_eq!(
        runner.run_epoch(1).unwrap_err(),
        NeuralLmkError::EmptyEpoch { phase: "training" }
    );
}

#[test]
fn test_validation_stream_yielding_nothing() {
    let mut runner = EpochRunner::new(Recorder::default(), stream(2), TrainerConfig::new())
        .unwrap()
        .with_validation(VecStream::new(Vec::new(), 1));
    assert_eq!(
        runner.run_epoch(1).unwrap_err(),
        NeuralLmkError::EmptyEpoch { phase: "validation" }
    );
}

#[test]
fn test_legacy_inclusive_epoch_based_stream_shorter_than_budget() {
    let config = TrainerConfig::new().with_budget_boundary(BudgetBoundary::LegacyInclusive);
    let mut runner = EpochRunner::new(Recorder::default(), stream(3), config).unwrap();

    let log = runner.run_epoch(1).unwrap();
    // the natural pass ends before the extra index is reached
    assert_eq!(runner.step().trained, vec![0.0, 1.0, 2.0]);
    assert_eq!(log.loss, 1.0);
    assert_eq!(runner.state().global_step, 3);
}

#[test]
fn test_exclusive_epoch_based_processes_whole_pass() {
    let mut runner = EpochRunner::new(Recorder::default(), stream(3), TrainerConfig::new()).unwrap();
    runner.run_epoch(1).unwrap();
    assert_eq!(runner.step().trained.len(), 3);
}
