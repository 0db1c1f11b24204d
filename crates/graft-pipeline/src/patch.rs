//! Patch artifact emission.
//!
//! All non-empty diffs of a round are concatenated, blank-line separated,
//! into a single patch file under the working directory. When no unit
//! changed, nothing is created; the file's absence is a valid outcome. A
//! write failure is reported, never escalated into a build failure.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::result::UnitResult;

/// Directory holding the patch artifact, relative to the working directory.
pub const PATCH_DIR: &str = ".graft";

/// File name of the patch artifact.
pub const PATCH_FILE_NAME: &str = "graft.patch";

/// Errors raised while persisting the patch artifact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatchWriteError {
    /// The patch directory could not be created.
    #[error("failed to create patch directory {path}: {source}")]
    Directory {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The patch file could not be written.
    #[error("failed to write patch file {path}: {source}")]
    Write {
        /// The file that could not be written.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Writes the round's patch artifact.
#[derive(Debug, Clone)]
pub struct PatchWriter {
    directory: PathBuf,
}

impl PatchWriter {
    /// Creates a writer rooted at the given working directory.
    #[must_use]
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            directory: working_dir.as_ref().join(PATCH_DIR),
        }
    }

    /// Returns the path the patch file would be written to.
    #[must_use]
    pub fn patch_path(&self) -> PathBuf {
        self.directory.join(PATCH_FILE_NAME)
    }

    /// Writes every non-empty diff to the patch file.
    ///
    /// Returns the path of the written file, or `None` when no result
    /// carried a diff, in which case nothing is created on disk.
    ///
    /// # Errors
    ///
    /// Returns a [`PatchWriteError`] on I/O failure; callers report it as
    /// a diagnostic and let the round complete.
    pub fn write(&self, results: &[UnitResult]) -> Result<Option<PathBuf>, PatchWriteError> {
        let diffs: Vec<&str> = results.iter().filter_map(UnitResult::diff).collect();
        if diffs.is_empty() {
            return Ok(None);
        }

        fs::create_dir_all(&self.directory).map_err(|source| PatchWriteError::Directory {
            path: self.directory.clone(),
            source,
        })?;

        let mut contents = String::new();
        for diff in diffs {
            contents.push_str(diff);
            contents.push('\n');
        }

        let path = self.patch_path();
        fs::write(&path, contents).map_err(|source| PatchWriteError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use graft_syntax::{MirrorNode, MirrorTree, NodeKind};

    fn tree(text: &str) -> MirrorTree {
        let root = Arc::new(MirrorNode::token(NodeKind::SourceFile, "source_file", "", text));
        MirrorTree::new(root, "", "unit", Arc::from([]))
    }

    fn changed_result(name: &str, before: &str, after: &str) -> UnitResult {
        UnitResult::new(
            PathBuf::from(name),
            tree(before),
            tree(after),
            vec!["rename-type".to_owned()],
        )
    }

    #[test]
    fn zero_diffs_create_no_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = PatchWriter::new(dir.path());
        let unchanged = UnitResult::new(PathBuf::from("a.rs"), tree("x"), tree("x"), Vec::new());

        let written = writer.write(&[unchanged]).expect("write succeeds");
        assert!(written.is_none());
        assert!(!writer.patch_path().exists());
    }

    #[test]
    fn diffs_are_written_blank_line_separated() {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = PatchWriter::new(dir.path());
        let results = [
            changed_result("a.ts", "class A {}\n", "class B {}\n"),
            changed_result("c.ts", "class C {}\n", "class D {}\n"),
        ];

        let written = writer
            .write(&results)
            .expect("write succeeds")
            .expect("patch written");
        let contents = std::fs::read_to_string(written).expect("patch readable");

        assert_eq!(contents.matches("--- a/").count(), 2);
        assert!(contents.contains("+class B {}"));
        assert!(contents.contains("+class D {}"));
        // Each diff ends with its own blank separator line.
        assert!(contents.contains("\n\n"));
    }

    #[test]
    fn write_failure_surfaces_as_an_error_value() {
        let dir = tempfile::tempdir().expect("tempdir");
        // A file where the patch directory should be forces the failure.
        std::fs::write(dir.path().join(PATCH_DIR), b"not a directory").expect("block dir");
        let writer = PatchWriter::new(dir.path());
        let results = [changed_result("a.ts", "class A {}\n", "class B {}\n")];

        assert!(writer.write(&results).is_err());
    }
}
