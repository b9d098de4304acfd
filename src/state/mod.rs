pub mod dataset;
pub mod graph_state;
pub mod markers;
pub mod registry;
