//! Training samples and the streams that deliver them.

mod sample;
mod stream;

pub use sample::{HeatmapSample, HeatmapView};
pub use stream::{Cyclic, SampleStream, VecStream};
