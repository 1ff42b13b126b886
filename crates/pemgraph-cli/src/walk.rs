//! Filesystem traversal producing the ordered input list.
//!
//! Directory entries are visited in name order so that the engine's
//! first-wins tie-breaks are reproducible across platforms; `read_dir`
//! iteration order is not.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cli::Cli;
use crate::error::CliError;

/// Traversal policy derived from the command line.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Include dot-prefixed entries.
    pub hidden: bool,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Stay on the filesystem of each traversal root.
    pub one_filesystem: bool,
    /// Abort once this many files have been gathered. `None` lifts the
    /// cap.
    pub limit: Option<usize>,
}

impl From<&Cli> for WalkOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            recursive: cli.recursive,
            hidden: cli.hidden,
            follow_symlinks: cli.follow_symlinks,
            one_filesystem: cli.one_filesystem,
            limit: cli.file_limit(),
        }
    }
}

/// Resolve the command-line paths into the ordered list of files to
/// analyze. With no paths, the current directory's files are used.
///
/// Paths named explicitly must exist; everything discovered below them
/// is best-effort. Exceeding the file limit is the one fatal traversal
/// condition.
pub fn collect(paths: &[PathBuf], options: &WalkOptions) -> Result<Vec<PathBuf>, CliError> {
    let roots: Vec<PathBuf> = if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    };

    let mut files = Vec::new();
    for root in &roots {
        let metadata = fs::metadata(root).map_err(|e| CliError::InaccessiblePath {
            path: root.clone(),
            reason: e.to_string(),
        })?;

        if metadata.is_file() {
            // Explicitly named files are always taken, hidden or not.
            push_file(&mut files, root.clone(), options)?;
        } else if metadata.is_dir() {
            let device = device_id(&metadata);
            walk_dir(root, device, options, &mut files)?;
        }
    }

    debug!(count = files.len(), "collected input files");
    Ok(files)
}

/// Visit one directory level, recursing when the policy allows it.
fn walk_dir(
    dir: &Path,
    root_device: u64,
    options: &WalkOptions,
    files: &mut Vec<PathBuf>,
) -> Result<(), CliError> {
    let reader = match fs::read_dir(dir) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
            return Ok(());
        }
    };

    let mut entries: Vec<PathBuf> = reader
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect();
    entries.sort();

    for path in entries {
        if !options.hidden && is_hidden(&path) {
            continue;
        }

        let link_metadata = match fs::symlink_metadata(&path) {
            Ok(md) => md,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if link_metadata.is_symlink() && !options.follow_symlinks {
            debug!(path = %path.display(), "skipping symlink");
            continue;
        }

        // Resolves through the link when one was allowed above.
        let metadata = match fs::metadata(&path) {
            Ok(md) => md,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if metadata.is_file() {
            push_file(files, path, options)?;
        } else if metadata.is_dir() && options.recursive {
            if options.one_filesystem && device_id(&metadata) != root_device {
                debug!(path = %path.display(), "not crossing filesystem boundary");
                continue;
            }
            walk_dir(&path, root_device, options, files)?;
        }
    }

    Ok(())
}

fn push_file(
    files: &mut Vec<PathBuf>,
    path: PathBuf,
    options: &WalkOptions,
) -> Result<(), CliError> {
    if let Some(limit) = options.limit {
        if files.len() >= limit {
            return Err(CliError::FileLimitReached { limit });
        }
    }
    files.push(path);
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(unix)]
fn device_id(metadata: &fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.dev()
}

#[cfg(not(unix))]
fn device_id(_metadata: &fs::Metadata) -> u64 {
    0
}
