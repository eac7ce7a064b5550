//! Reference network.

mod heatmap_net;

pub use heatmap_net::{HeatmapNet, HeatmapNetConfig};
