pub mod amplitude_dialog;
pub mod dataset_dialog;
pub mod graph_panel;
