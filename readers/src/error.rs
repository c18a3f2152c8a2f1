use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while decoding a single recorded artifact.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("missing file: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("malformed {kind} file {}: {message}", path.display())]
    Malformed {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("unsupported pixel format in {}: expected {expected}, got {got}", path.display())]
    PixelFormat {
        path: PathBuf,
        expected: &'static str,
        got: String,
    },

    #[error("size mismatch in {}: expected {expected:?}, got {got:?}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: (usize, usize),
        got: (usize, usize),
    },
}

impl ReadError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn malformed(kind: &'static str, path: &Path, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadError>;
