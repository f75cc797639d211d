//! Recursive directory-tree copy with rollback
//!
//! `TreeCopier` mirrors a source directory into a destination directory,
//! preserving relative paths and overwriting existing files. The first entry
//! that fails aborts the copy; depending on the [`Rollback`] policy the
//! destination root is then deleted so no half-written tree is left behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Filesystem primitives used by the copier
pub trait CopyOps {
    /// Create a directory and any missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a regular file, overwriting the destination; returns bytes copied
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Recursively delete a directory
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Move a file or directory within the same filesystem
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

impl<T: CopyOps + ?Sized> CopyOps for &T {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        (**self).copy_file(from, to)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }
}

/// `std::fs` backed operations
#[derive(Debug, Default, Clone, Copy)]
pub struct StdCopyOps;

impl CopyOps for StdCopyOps {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// What to do with the destination when a copy fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rollback {
    /// Delete the destination root if this copy created it
    #[default]
    RemoveCreated,
    /// Leave whatever was written in place
    Keep,
}

/// Statistics of a finished copy
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Directories created or confirmed at the destination (root included)
    pub directories: usize,
    /// Regular files copied
    pub files: usize,
    /// Total bytes copied
    pub bytes: u64,
    /// Source entries that were neither directories nor regular files
    pub skipped: Vec<PathBuf>,
}

/// A failed tree copy
#[derive(Error, Debug)]
#[error("failed to copy {}: {source}", .path.display())]
pub struct CopyError {
    /// Source entry that could not be copied
    pub path: PathBuf,
    /// Underlying cause
    #[source]
    pub source: io::Error,
    /// Whether the destination root was removed afterwards
    pub rolled_back: bool,
}

impl CopyError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
            rolled_back: false,
        }
    }

    /// Human-readable cause
    pub fn reason(&self) -> String {
        if self.rolled_back {
            format!("{} (partial copy removed)", self.source)
        } else {
            self.source.to_string()
        }
    }
}

/// Copies directory trees
#[derive(Debug, Clone)]
pub struct TreeCopier<O: CopyOps = StdCopyOps> {
    ops: O,
    rollback: Rollback,
}

impl TreeCopier<StdCopyOps> {
    /// Create a copier using the real filesystem and full rollback
    pub fn new() -> Self {
        Self::with_ops(StdCopyOps)
    }
}

impl Default for TreeCopier<StdCopyOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: CopyOps> TreeCopier<O> {
    /// Create a copier over custom filesystem operations
    pub fn with_ops(ops: O) -> Self {
        Self {
            ops,
            rollback: Rollback::default(),
        }
    }

    /// Set the rollback policy
    pub fn rollback(mut self, rollback: Rollback) -> Self {
        self.rollback = rollback;
        self
    }

    /// Copy everything under `source_root` into `dest_root`
    ///
    /// `source_root` itself maps to `dest_root`. On failure the walk stops at
    /// the offending entry and, with [`Rollback::RemoveCreated`], `dest_root`
    /// is deleted if it did not exist before the call.
    pub fn copy(&self, source_root: &Path, dest_root: &Path) -> Result<CopyReport, CopyError> {
        if !source_root.is_dir() {
            return Err(CopyError::new(
                source_root,
                io::Error::new(io::ErrorKind::NotFound, "source is not a directory"),
            ));
        }

        let skip = nested_destination(source_root, dest_root)?;
        let dest_existed = dest_root.exists();

        tracing::debug!(
            source = %source_root.display(),
            dest = %dest_root.display(),
            "copying tree"
        );

        match self.walk(source_root, dest_root, skip.as_deref()) {
            Ok(report) => Ok(report),
            Err(mut err) => {
                tracing::warn!(path = %err.path.display(), error = %err.source, "copy failed");

                if self.rollback == Rollback::RemoveCreated && !dest_existed && dest_root.exists() {
                    match self.ops.remove_dir_all(dest_root) {
                        Ok(()) => {
                            err.rolled_back = true;
                            tracing::info!(dest = %dest_root.display(), "removed incomplete copy");
                        }
                        Err(e) => {
                            tracing::error!(
                                dest = %dest_root.display(),
                                error = %e,
                                "failed to remove incomplete copy"
                            );
                        }
                    }
                }

                Err(err)
            }
        }
    }

    fn walk(
        &self,
        source_root: &Path,
        dest_root: &Path,
        skip: Option<&Path>,
    ) -> Result<CopyReport, CopyError> {
        let mut report = CopyReport::default();

        let walker = WalkDir::new(source_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| skip.map_or(true, |skip| entry.path() != skip));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source_root.to_path_buf());
                CopyError::new(path, io::Error::from(e))
            })?;

            let relative = entry.path().strip_prefix(source_root).map_err(|_| {
                CopyError::new(
                    entry.path(),
                    io::Error::new(io::ErrorKind::Other, "entry is outside the source root"),
                )
            })?;
            let target = dest_root.join(relative);

            let file_type = entry.file_type();
            if file_type.is_dir() {
                self.ops
                    .create_dir_all(&target)
                    .map_err(|e| CopyError::new(entry.path(), e))?;
                report.directories += 1;
            } else if file_type.is_file() {
                let bytes = self
                    .ops
                    .copy_file(entry.path(), &target)
                    .map_err(|e| CopyError::new(entry.path(), e))?;
                report.files += 1;
                report.bytes += bytes;
            } else {
                tracing::warn!(
                    path = %entry.path().display(),
                    "skipping entry that is not a regular file or directory"
                );
                report.skipped.push(entry.path().to_path_buf());
            }
        }

        Ok(report)
    }
}

/// Path of `dest` as the walker would see it, when it lies inside `source`
fn nested_destination(source: &Path, dest: &Path) -> Result<Option<PathBuf>, CopyError> {
    let source_abs = std::path::absolute(source).map_err(|e| CopyError::new(source, e))?;
    let dest_abs = std::path::absolute(dest).map_err(|e| CopyError::new(dest, e))?;

    if dest_abs == source_abs {
        return Err(CopyError::new(
            source,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "source and destination are the same directory",
            ),
        ));
    }

    Ok(dest_abs
        .strip_prefix(&source_abs)
        .ok()
        .map(|relative| source.join(relative)))
}

#[cfg(test)]
/// Test double that fails when asked to copy a file with the given name
pub(crate) struct FailOn(pub &'static str);

#[cfg(test)]
impl CopyOps for FailOn {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        StdCopyOps.create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        if from.file_name().is_some_and(|n| n == self.0) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "injected"));
        }
        StdCopyOps.copy_file(from, to)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        StdCopyOps.remove_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        StdCopyOps.rename(from, to)
    }
}
