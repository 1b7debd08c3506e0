pub mod config;
pub mod controller;
pub mod detectors;
pub mod error;
pub mod generator;
pub mod io;
pub mod mapping;
pub mod plot;
pub mod signal;

pub use config::ChartConfig;
pub use controller::{ChartController, CursorReadout};
pub use detectors::rem::{detect_rem_markers, detect_rem_markers_with_config, RemDetectorConfig};
pub use error::{ChartError, ChartResult};
pub use generator::{
    generate_series, JitterConfig, RandomSource, SequenceSource, MAX_POINT_COUNT,
};
pub use mapping::{CoordinateMapper, Viewport};
pub use signal::*;
