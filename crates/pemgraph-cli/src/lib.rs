//! # pemgraph-cli
//!
//! The `pemgraph` command-line tool. Points the [`pemgraph`] engine at
//! files and directories and renders the resulting entity/chain report.
//!
//! Responsibilities split by module:
//! - [`cli`] - argument parsing
//! - [`walk`] - filesystem traversal (ordering, hidden files, symlinks,
//!   filesystem boundaries, file limit)
//! - [`render`] - tree, one-line, and JSON output
//! - [`error`] - the conditions that abort a run
//!
//! All file I/O happens here; the engine itself only ever sees byte
//! buffers. Files that cannot be read are handed to the engine as
//! unreadable inputs so they surface in the report's diagnostics
//! instead of stopping the run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod render;
pub mod walk;

pub use cli::{Cli, Format};
pub use error::CliError;
pub use walk::WalkOptions;
