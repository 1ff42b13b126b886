//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Default cap on the number of files examined in one run.
pub const DEFAULT_MAX_FILES: usize = 1000;

/// pemgraph - match PEM keys, CSRs, and certificates into chains.
#[derive(Parser, Debug, Clone)]
#[command(name = "pemgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to examine. Defaults to the files of the
    /// current directory when none are given.
    pub paths: Vec<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    pub recursive: bool,

    /// Include hidden files and directories.
    #[arg(short = 'H', long)]
    pub hidden: bool,

    /// Follow symbolic links while traversing.
    #[arg(short = 'S', long)]
    pub follow_symlinks: bool,

    /// Do not cross filesystem boundaries when recursing.
    #[arg(short = 'x', long)]
    pub one_filesystem: bool,

    /// Abort after examining this many files.
    #[arg(long, default_value_t = DEFAULT_MAX_FILES)]
    pub max_files: usize,

    /// Lift the file-count limit entirely.
    #[arg(short = 'U', long)]
    pub unlimited: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    pub format: Format,

    /// Suppress the header row of the one-line format.
    #[arg(long)]
    pub no_header: bool,

    /// Cryptographically verify each issuer link before accepting it.
    #[arg(long)]
    pub verify: bool,
}

impl Cli {
    /// Effective file limit, `None` when `--unlimited` is set.
    #[must_use]
    pub fn file_limit(&self) -> Option<usize> {
        if self.unlimited { None } else { Some(self.max_files) }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[derive(Default)]
pub enum Format {
    /// Indented tree, one block per entity.
    #[default]
    Tree,
    /// One line per entity, suitable for awk/grep pipelines.
    Oneline,
    /// JSON output for scripting.
    Json,
}
