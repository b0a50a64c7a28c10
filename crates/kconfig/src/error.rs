use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by [`Defconfig::load`](crate::Defconfig::load).
#[derive(Debug, Error)]
pub enum LoadError {
    /// No path was given and the configuration is not bound to one.
    #[error("no defconfig path given")]
    Unresolved,

    #[error("{0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Returns true for the expected "nothing to load" cases.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Unresolved | Self::NotFound(_))
    }
}

/// Errors returned when writing a defconfig or a diff listing.
#[derive(Debug, Error)]
pub enum SaveError {
    /// No path was given and the configuration is not bound to one.
    #[error("no output path given")]
    Unresolved,

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
