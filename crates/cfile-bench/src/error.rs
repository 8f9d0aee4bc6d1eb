//! Harness error type.

use std::io;
use std::path::PathBuf;

use cfile_core::CFileError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    CFile(#[from] CFileError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// A strategy could not open its data file.
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BenchError {
    /// True when the failure happened while acquiring the stream, before any
    /// value was transferred. The runner skips such strategies.
    #[must_use]
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::Open { .. } | Self::CFile(CFileError::Open { .. }))
    }
}
