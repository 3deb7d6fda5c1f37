//! Tool error types.

use std::path::PathBuf;

use skirmish_core::error::TacticsError;
use skirmish_core::location::Location;
use thiserror::Error;

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors raised by the development tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A data file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The core rejected the data.
    #[error(transparent)]
    Core(#[from] TacticsError),

    /// No unit stands on the requested cell.
    #[error("No unit at {0}")]
    NoUnit(Location),
}
