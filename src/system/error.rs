use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::numparse::NumError;

/// Errors raised while sampling kernel state.
#[derive(Debug, Error)]
pub enum SampleError {
    /// An internal argument was out of range.
    #[error("invalid parameter: {0}")]
    Param(String),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The kernel would not report its release or machine name.
    #[error("cannot query kernel identity: {0}")]
    Identity(#[source] io::Error),

    /// The source vanished, usually because its process exited mid-scan.
    #[error("{} does not exist", path.display())]
    NotFound { path: PathBuf },

    /// The source exists but has no content.
    #[error("{} is empty", path.display())]
    NoData { path: PathBuf },

    #[error("unexpected format in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("bad value in {}: {source}", path.display())]
    Number {
        path: PathBuf,
        #[source]
        source: NumError,
    },
}

/// ENOENT, or ESRCH from a process torn down between open and read.
fn process_gone(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::NotFound {
        return true;
    }
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::ESRCH)
    }
    #[cfg(not(unix))]
    {
        false
    }
}

impl SampleError {
    pub fn io(path: &Path, source: io::Error) -> Self {
        if process_gone(&source) {
            return SampleError::NotFound {
                path: path.to_path_buf(),
            };
        }
        SampleError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn parse(path: &Path, reason: impl Into<String>) -> Self {
        SampleError::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn number(path: &Path, source: NumError) -> Self {
        SampleError::Number {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SampleError::NotFound { .. })
    }

    /// True for numeric overflow, which the taxonomy reports separately.
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            SampleError::Number {
                source: NumError::Range(_),
                ..
            }
        )
    }
}

pub type Result<T> = std::result::Result<T, SampleError>;
