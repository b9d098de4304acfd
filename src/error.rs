use thiserror::Error;
use uuid::Uuid;

use crate::state::dataset::PlotType;

/// Failures inside the graph engine. None of these are fatal: the public
/// entry points on `GraphState` log them and leave the display as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("dataset {0} not found in store")]
    UidNotFound(Uuid),
    #[error("dataset {0} is already displayed")]
    DuplicateUid(Uuid),
    #[error("dataset {0} is not displayed")]
    NotRegistered(Uuid),
    #[error("no range marker within drag tolerance")]
    NoHitMarker,
    #[error("no lines registered, axis ranges left unchanged")]
    EmptyRegistry,
    #[error("no dataset for item {0}")]
    ItemNotFound(usize),
    #[error("calibration lines need an FFT view, active view is {0:?}")]
    NotFftView(PlotType),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}
