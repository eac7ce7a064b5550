//! Burn-backed train step.

use burn::module::{AutodiffModule, Module, ModuleVisitor, ParamId};
use burn::optim::{GradientsParams, Optimizer};
use burn::prelude::*;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, TensorData};

use crate::config::HeatmapLoss;
use crate::data::{HeatmapSample, HeatmapView};
use crate::error::{NeuralLmkError, Result};
use crate::loss::heatmap_loss;
use crate::metrics::HeatmapMetric;

use super::step::{StepOutput, TrainStep};

/// A model that maps an image batch to a heat-map sequence.
pub trait HeatmapModel<B: Backend> {
    /// `[B, C, H, W]` images to `[S, B, L, H, W]` heat maps.
    fn forward_heatmaps(&self, images: Tensor<B, 4>) -> Tensor<B, 5>;
}

/// [`TrainStep`] over a burn module and optimizer.
///
/// Images arrive channel-last and are permuted to `[B, C, H, W]`. Targets
/// `[B, S, H, W, L]` are permuted to `[B, S, L, H, W]` and the model output
/// `[S, B, L, H, W]` to the same layout before the loss.
pub struct BurnHeatmapStep<B: AutodiffBackend, M, O> {
    model: M,
    optim: O,
    learning_rate: f64,
    loss: HeatmapLoss,
    metrics: Vec<Box<dyn HeatmapMetric>>,
    device: B::Device,
}

impl<B, M, O> BurnHeatmapStep<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + HeatmapModel<B>,
    M::InnerModule: HeatmapModel<B::InnerBackend>,
    O: Optimizer<M, B>,
{
    /// Step training `model` with `optim` at `learning_rate`.
    pub fn new(model: M, optim: O, learning_rate: f64, device: &B::Device) -> Self {
        Self {
            model,
            optim,
            learning_rate,
            loss: HeatmapLoss::default(),
            metrics: Vec::new(),
            device: device.clone(),
        }
    }

    /// Use `loss` instead of MSE.
    pub fn with_loss(mut self, loss: HeatmapLoss) -> Self {
        self.loss = loss;
        self
    }

    /// Add a metric evaluated when metrics are requested.
    pub fn with_metric(mut self, metric: impl HeatmapMetric + 'static) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    /// The model being trained.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Unwrap the trained model.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Current learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn compute_metrics<Bk: Backend>(
        &self,
        output: &Tensor<Bk, 5>,
        target: &Tensor<Bk, 5>,
    ) -> Result<Vec<f32>> {
        let out_shape = output.dims();
        let tgt_shape = target.dims();
        let out_data = host_values(output.clone())?;
        let tgt_data = host_values(target.clone())?;
        let out_view = HeatmapView::new(&out_data, out_shape)?;
        let tgt_view = HeatmapView::new(&tgt_data, tgt_shape)?;
        Ok(self
            .metrics
            .iter()
            .map(|metric| metric.compute(&out_view, &tgt_view))
            .collect())
    }
}

/// Move a sample to `device` in model layout: images `[B, C, H, W]`,
/// targets `[B, S, L, H, W]`.
fn sample_tensors<Bk: Backend>(
    sample: HeatmapSample,
    device: &Bk::Device,
) -> Result<(Tensor<Bk, 4>, Tensor<Bk, 5>)> {
    sample.validate()?;
    let image = Tensor::<Bk, 4>::from_data(TensorData::new(sample.image, sample.image_shape), device)
        .permute([0, 3, 1, 2]);
    let target = Tensor::<Bk, 5>::from_data(
        TensorData::new(sample.heat_map_stack, sample.stack_shape),
        device,
    )
    .permute([0, 1, 4, 2, 3]);
    Ok((image, target))
}

/// Model output `[S, B, L, H, W]` to `[B, S, L, H, W]`, checked against the target.
fn align_output<Bk: Backend>(output: Tensor<Bk, 5>, target: &Tensor<Bk, 5>) -> Result<Tensor<Bk, 5>> {
    let output = output.permute([1, 0, 2, 3, 4]);
    let (got, expected) = (output.dims(), target.dims());
    if got != expected {
        return Err(NeuralLmkError::ShapeMismatch {
            tensor: "model output",
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(output)
}

fn host_values<Bk: Backend, const D: usize>(tensor: Tensor<Bk, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| NeuralLmkError::Data {
            message: format!("cannot read tensor data: {e:?}"),
        })
}

impl<B, M, O> TrainStep<HeatmapSample> for BurnHeatmapStep<B, M, O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + HeatmapModel<B>,
    M::InnerModule: HeatmapModel<B::InnerBackend>,
    O: Optimizer<M, B>,
{
    fn train_step(&mut self, batch: HeatmapSample, with_metrics: bool) -> Result<StepOutput> {
        let (image, target) = sample_tensors::<B>(batch, &self.device)?;
        let output = align_output(self.model.forward_heatmaps(image), &target)?;

        let metrics = if with_metrics {
            Some(self.compute_metrics(&output.clone().inner(), &target.clone().inner())?)
        } else {
            None
        };

        let loss = heatmap_loss(&self.loss, output, target);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optim.step(self.learning_rate, self.model.clone(), grads);

        Ok(StepOutput {
            loss: loss_value,
            metrics,
        })
    }

    fn valid_step(&self, batch: HeatmapSample, with_metrics: bool) -> Result<StepOutput> {
        let model = self.model.valid();
        let (image, target) = sample_tensors::<B::InnerBackend>(batch, &self.device)?;
        let output = align_output(model.forward_heatmaps(image), &target)?;

        let metrics = if with_metrics {
            Some(self.compute_metrics(&output, &target)?)
        } else {
            None
        };
        let loss = heatmap_loss(&self.loss, output, target);

        Ok(StepOutput {
            loss: loss.into_scalar().elem::<f32>(),
            metrics,
        })
    }

    fn set_learning_rate(&mut self, learning_rate: f64) {
        self.learning_rate = learning_rate;
    }

    fn parameter_summaries(&self) -> Vec<(String, Vec<f32>)> {
        let mut collector = ParamCollector::default();
        self.model.valid().visit(&mut collector);
        if let Some(message) = collector.error {
            log::warn!("parameter summaries incomplete: {message}");
        }
        collector.params
    }

    fn metric_names(&self) -> Vec<String> {
        self.metrics.iter().map(|m| m.name().to_string()).collect()
    }
}

impl<B: AutodiffBackend, M, O> std::fmt::Debug for BurnHeatmapStep<B, M, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurnHeatmapStep")
            .field("learning_rate", &self.learning_rate)
            .field("loss", &self.loss)
            .field("metrics", &self.metrics.len())
            .finish_non_exhaustive()
    }
}

/// Flattens every float parameter in visit order.
///
/// The visitor sees no field paths, so tags are `param{index} {shape:?}`.
#[derive(Default)]
struct ParamCollector {
    params: Vec<(String, Vec<f32>)>,
    error: Option<String>,
}

impl<Bk: Backend> ModuleVisitor<Bk> for ParamCollector {
    fn visit_float<const D: usize>(&mut self, _id: ParamId, tensor: &Tensor<Bk, D>) {
        let name = format!("param{} {:?}", self.params.len(), tensor.dims());
        match host_values(tensor.clone()) {
            Ok(values) => self.params.push((name, values)),
            Err(e) => self.error = Some(e.to_string()),
        }
    }
}
