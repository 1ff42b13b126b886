//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific errors.
///
/// Only conditions that abort the run live here; per-file problems are
/// carried through the report's diagnostics instead.
#[derive(Debug, Error)]
pub enum CliError {
    /// A path named on the command line does not exist or cannot be
    /// inspected.
    #[error("cannot access {}: {reason}", path.display())]
    InaccessiblePath {
        /// The offending path.
        path: PathBuf,
        /// Operating system error text.
        reason: String,
    },

    /// The file-count limit was reached during traversal.
    #[error("file limit of {limit} reached; pass --unlimited to lift it")]
    FileLimitReached {
        /// The limit in effect.
        limit: usize,
    },

    /// Writing rendered output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
