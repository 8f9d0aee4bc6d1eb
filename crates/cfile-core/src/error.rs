//! Error type shared by every `CFile` operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CFileError {
    /// `fopen`/`freopen` could not acquire the stream. The handle is unlinked.
    #[error("cannot open {path:?} with mode {mode:?}: {source}")]
    Open {
        path: PathBuf,
        mode: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid open mode {0:?}")]
    InvalidMode(String),
    #[error("argument contains an interior NUL byte")]
    NulByte,
    /// The handle does not own a stream.
    #[error("file handle is not linked to an open stream")]
    Unlinked,
    /// A stdio call reported failure through its return code.
    #[error("{op} failed: {source}")]
    Transfer {
        op: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("buffer holds {actual} bytes, {needed} required")]
    BufferTooSmall { needed: usize, actual: usize },
    /// A `Display` implementation reported an error during formatted output.
    #[error("formatter error during formatted write")]
    Format,
}

impl CFileError {
    /// Wrap the current `errno` as a failure of the named stdio call.
    pub(crate) fn last_os(op: &'static str) -> Self {
        Self::Transfer {
            op,
            source: io::Error::last_os_error(),
        }
    }
}

impl From<CFileError> for io::Error {
    fn from(err: CFileError) -> Self {
        match err {
            CFileError::Open { source, .. } | CFileError::Transfer { source, .. } => source,
            CFileError::InvalidMode(_) | CFileError::NulByte => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            CFileError::Unlinked => io::Error::new(io::ErrorKind::NotConnected, err),
            other => io::Error::other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlinked_maps_to_not_connected() {
        let err: io::Error = CFileError::Unlinked.into();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
    }

    #[test]
    fn transfer_keeps_os_error() {
        let err = CFileError::Transfer {
            op: "fseek",
            source: io::Error::from_raw_os_error(libc::ESPIPE),
        };
        assert!(err.to_string().starts_with("fseek failed"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.raw_os_error(), Some(libc::ESPIPE));
    }
}
