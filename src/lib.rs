//! Instrument graph engine: displayed lines, range markers with a delta
//! readout, marker dragging and axis management over a pluggable render
//! backend, plus an egui host.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod state;
pub mod ui;

pub use config::GraphConfig;
pub use error::{ConfigError, GraphError};
pub use render::backend::RenderBackend;
pub use state::dataset::{Dataset, DatasetStore, LineWidth, MemoryStore, PlotType, Sample};
pub use state::graph_state::GraphState;
