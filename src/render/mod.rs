pub mod backend;
pub mod drag;
pub mod plot_interaction;
pub mod scene;
