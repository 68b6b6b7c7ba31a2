//! Error types for folio.

use std::path::PathBuf;

use crate::config::ConfigError;
use crate::output::OutputError;
use crate::source::SourceError;
use crate::walker::WalkError;

/// Top-level error type for folio operations.
///
/// Everything that reaches this type aborts the run. Per-file problems
/// (unlisted extensions, unreadable files) are logged by the builder and
/// never surface here.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(WalkError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),
}

impl From<WalkError> for FolioError {
    fn from(error: WalkError) -> Self {
        match error {
            WalkError::NotFound { path } => FolioError::PathNotFound(path),
            WalkError::PermissionDenied { path } => FolioError::PermissionDenied(path),
            other => FolioError::Walk(other),
        }
    }
}

/// Map an error to its exit code.
pub fn exit_code(error: &FolioError) -> i32 {
    match error {
        FolioError::PathNotFound(_) => 3,
        FolioError::PermissionDenied(_) => 4,
        FolioError::Io(_) => 1,
        FolioError::Walk(_) => 2,
        FolioError::Config(_) => 1,
        FolioError::Source(_) => 1,
        FolioError::Output(_) => 1,
    }
}
