use std::path::PathBuf;

use readers::ReadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown split '{0}', expected train, val or test")]
    UnknownSplit(String),

    #[error("unknown control mode '{0}'")]
    UnknownControlMode(String),

    #[error("no episodes to sample from")]
    EmptyCatalog,

    #[error("cannot stack an empty batch")]
    EmptyBatch,

    #[error("missing metadata file {}", path.display())]
    MissingMetadata { path: PathBuf },

    #[error("failed to scan {}: {source}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index {index} out of range for {len} samples")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("window starting at frame {start} ends at {end}, past the last frame {last} of {}", root.display())]
    WindowOutOfRange {
        root: PathBuf,
        start: usize,
        end: usize,
        last: usize,
    },

    #[error("loader stopped after {received} of {expected} batches")]
    LoaderStopped { expected: usize, received: usize },

    #[error("mesh {mesh_id} missing from {}", path.display())]
    MissingMesh { mesh_id: i32, path: PathBuf },

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
