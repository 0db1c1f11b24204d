//! Per-unit processing results and diff computation.

use std::path::{Path, PathBuf};

use similar::TextDiff;

use graft_syntax::MirrorTree;

/// The outcome of processing one source unit.
///
/// Every successfully processed unit produces a result, including units
/// the recipes left untouched; only changed units contribute a diff to the
/// round's patch.
#[derive(Debug, Clone)]
pub struct UnitResult {
    path: PathBuf,
    before: MirrorTree,
    after: MirrorTree,
    diff: Option<String>,
    applied: Vec<String>,
}

impl UnitResult {
    /// Builds a result from the unit's trees and recipe provenance.
    #[must_use]
    pub fn new(path: PathBuf, before: MirrorTree, after: MirrorTree, applied: Vec<String>) -> Self {
        let diff = unified_diff(&path, &before.serialise(), &after.serialise());
        Self {
            path,
            before,
            after,
            diff,
            applied,
        }
    }

    /// Returns the unit's batch-relative path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mirror tree before transformation.
    #[must_use]
    pub const fn before(&self) -> &MirrorTree {
        &self.before
    }

    /// Returns the mirror tree after transformation.
    #[must_use]
    pub const fn after(&self) -> &MirrorTree {
        &self.after
    }

    /// Returns the unified diff, or `None` when the unit is unchanged.
    #[must_use]
    pub fn diff(&self) -> Option<&str> {
        self.diff.as_deref()
    }

    /// Returns the recipes that changed the unit, in the order they first
    /// made a change.
    #[must_use]
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Returns `true` when the transformation changed the unit's text.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.diff.is_some()
    }
}

/// Computes a line-oriented unified diff, or `None` for identical text.
fn unified_diff(path: &Path, before: &str, after: &str) -> Option<String> {
    if before == after {
        return None;
    }
    let old_header = format!("a/{}", path.display());
    let new_header = format!("b/{}", path.display());
    Some(
        TextDiff::from_lines(before, after)
            .unified_diff()
            .header(&old_header, &new_header)
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use graft_syntax::{MirrorNode, NodeKind};

    fn tree(text: &str) -> MirrorTree {
        let root = Arc::new(MirrorNode::token(NodeKind::SourceFile, "source_file", "", text));
        MirrorTree::new(root, "", "unit", Arc::from([]))
    }

    #[test]
    fn identical_trees_yield_no_diff() {
        let result = UnitResult::new(
            PathBuf::from("src/a.rs"),
            tree("fn main() {}\n"),
            tree("fn main() {}\n"),
            Vec::new(),
        );
        assert!(!result.changed());
        assert!(result.diff().is_none());
    }

    #[test]
    fn changed_trees_yield_a_unified_diff_with_headers() {
        let result = UnitResult::new(
            PathBuf::from("A.ts"),
            tree("class A {}\n"),
            tree("class B {}\n"),
            vec!["rename-type".to_owned()],
        );
        let diff = result.diff().expect("diff present");
        assert!(diff.contains("a/A.ts"));
        assert!(diff.contains("b/A.ts"));
        assert!(diff.contains("-class A {}"));
        assert!(diff.contains("+class B {}"));
        assert_eq!(result.applied(), ["rename-type"]);
    }
}
