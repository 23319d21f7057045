//! Error types for the rigging toolkit core.

use std::fmt;
use std::path::PathBuf;

/// Why a file name failed version parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionFault {
    /// More than one `.vNNN` marker in the suffix chain.
    Ambiguous,
    /// The marker is not the first suffix.
    Misplaced,
    /// `.v000`; versions start at 1.
    ZeroVersion,
    /// A synthesized version does not fit in three digits.
    OutOfRange,
}

impl fmt::Display for VersionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            VersionFault::Ambiguous => "more than one version marker",
            VersionFault::Misplaced => "version marker must be the first suffix",
            VersionFault::ZeroVersion => "versions start at v001",
            VersionFault::OutOfRange => "version must be between 1 and 999",
        };
        f.write_str(text)
    }
}

/// Top-level error enum for the rigging toolkit core.
#[derive(Debug, thiserror::Error)]
pub enum RigkitError {
    #[error("Version conflict in {path}: {fault}")]
    MalformedVersion { path: PathBuf, fault: VersionFault },

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("No existing version of {name}.{extension} found in {folder}")]
    AssetNotFound {
        folder: PathBuf,
        name: String,
        extension: String,
    },

    #[error("Series {series:03} already exists for {category}")]
    SeriesExists { category: String, series: u16 },

    #[error("Series must be a three-digit number, got {0}")]
    InvalidSeries(i64),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RigkitError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, fault: VersionFault) -> Self {
        RigkitError::MalformedVersion {
            path: path.into(),
            fault,
        }
    }
}

pub type RigkitResult<T> = Result<T, RigkitError>;

#[cfg(feature = "python")]
mod python {
    use pyo3::create_exception;
    use pyo3::exceptions::{PyFileExistsError, PyIOError, PyLookupError, PyValueError};
    use pyo3::PyErr;

    use super::RigkitError;

    create_exception!(_rigkit_core, MalformedVersionError, PyValueError);
    create_exception!(_rigkit_core, DirectoryNotFoundError, PyIOError);
    create_exception!(_rigkit_core, AssetNotFoundError, PyLookupError);
    create_exception!(_rigkit_core, SeriesExistsError, PyFileExistsError);

    impl From<RigkitError> for PyErr {
        fn from(err: RigkitError) -> PyErr {
            match &err {
                RigkitError::MalformedVersion { .. } => {
                    MalformedVersionError::new_err(err.to_string())
                }
                RigkitError::DirectoryNotFound(_) => {
                    DirectoryNotFoundError::new_err(err.to_string())
                }
                RigkitError::AssetNotFound { .. } => AssetNotFoundError::new_err(err.to_string()),
                RigkitError::SeriesExists { .. } => SeriesExistsError::new_err(err.to_string()),
                RigkitError::InvalidSeries(_) | RigkitError::InvalidName(_) => {
                    PyValueError::new_err(err.to_string())
                }
                RigkitError::Io(_) => PyIOError::new_err(err.to_string()),
                RigkitError::Json(_) => PyValueError::new_err(err.to_string()),
            }
        }
    }
}

#[cfg(feature = "python")]
pub use python::{
    AssetNotFoundError, DirectoryNotFoundError, MalformedVersionError, SeriesExistsError,
};
