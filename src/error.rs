//! Error types for evaluation and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("dataset has {inputs} input vectors but {expected} expected vectors")]
    DatasetMismatch { inputs: usize, expected: usize },

    #[error("input vector has {found} values, network has {want} inputs")]
    InputWidth { want: usize, found: usize },

    #[error("expected vector has {found} values, network has {want} outputs")]
    OutputWidth { want: usize, found: usize },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
