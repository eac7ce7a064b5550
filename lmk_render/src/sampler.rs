//! Sources of per-view transforms.

use lmk_core::{SampleRange, TransformRanges, ViewTransform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces the transform for the next view.
pub trait TransformSampler {
    /// Next transform.
    fn sample(&mut self) -> ViewTransform;
}

/// Draws every field independently from [`TransformRanges`].
#[derive(Debug, Clone)]
pub struct RandomTransformSampler {
    rng: StdRng,
    ranges: TransformRanges,
}

impl RandomTransformSampler {
    /// Sampler seeded from system entropy.
    pub fn new(ranges: TransformRanges) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            ranges,
        }
    }

    /// Reproducible sampler.
    pub fn with_seed(seed: u64, ranges: TransformRanges) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            ranges,
        }
    }

    /// Ranges in use.
    pub fn ranges(&self) -> &TransformRanges {
        &self.ranges
    }

    fn draw(&mut self, range: SampleRange) -> f64 {
        if range.integer {
            self.rng.gen_range(range.low as i64..range.high as i64) as f64
        } else {
            self.rng.gen_range(range.low..range.high)
        }
    }
}

impl TransformSampler for RandomTransformSampler {
    fn sample(&mut self) -> ViewTransform {
        let r = self.ranges;
        ViewTransform {
            rx: self.draw(r.rx),
            ry: self.draw(r.ry),
            rz: self.draw(r.rz),
            scale: self.draw(r.scale),
            tx: self.draw(r.tx),
            ty: self.draw(r.ty),
        }
    }
}

/// Replays a fixed list of transforms, starting over when it runs out.
///
/// An empty list yields the identity view.
#[derive(Debug, Clone, Default)]
pub struct SequenceSampler {
    views: Vec<ViewTransform>,
    cursor: usize,
}

impl SequenceSampler {
    /// Sampler over `views`.
    pub fn new(views: Vec<ViewTransform>) -> Self {
        Self { views, cursor: 0 }
    }

    /// Start again from the first transform.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl TransformSampler for SequenceSampler {
    fn sample(&mut self) -> ViewTransform {
        if self.views.is_empty() {
            return ViewTransform::identity();
        }
        let view = self.views[self.cursor % self.views.len()];
        self.cursor += 1;
        view
    }
}

impl<S: TransformSampler + ?Sized> TransformSampler for Box<S> {
    fn sample(&mut self) -> ViewTransform {
        (**self).sample()
    }
}
