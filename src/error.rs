use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single board export could not be converted.
///
/// Unresolved list, member or label references are never errors; they degrade to
/// empty fields during projection.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Input path does not exist: {}", path.display())]
    NoInput { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Not a valid board export: {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Unusable output location {}: {reason}", path.display())]
    Path { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ConvertError {
    /// The file or directory the error is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NoInput { path }
            | Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::Path { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
