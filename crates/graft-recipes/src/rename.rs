//! Built-in recipe: rename a type.
//!
//! Renames a type declaration and every syntactic reference to it within a
//! unit. The match is by token text on identifier and type-reference
//! nodes; occurrence resolution beyond what the host tree encodes is the
//! host's concern, not this recipe's.

use graft_syntax::{MirrorNode, NodeKind};

use crate::error::RecipeError;
use crate::recipe::{Recipe, RecipeContext};

/// Identifier of the rename-type recipe.
pub const RENAME_TYPE_ID: &str = "rename-type";

/// Renames occurrences of a type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameType {
    from: String,
    to: String,
}

impl RenameType {
    /// Creates a rename from one type name to another.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::InvalidArguments`] when either name is empty
    /// or the names are equal.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, RecipeError> {
        let from = from.into();
        let to = to.into();
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(RecipeError::invalid_arguments(
                RENAME_TYPE_ID,
                "both the current and the new type name must be non-empty",
            ));
        }
        if from == to {
            return Err(RecipeError::invalid_arguments(
                RENAME_TYPE_ID,
                "the new type name must differ from the current one",
            ));
        }
        Ok(Self { from, to })
    }

    /// Returns the name being replaced.
    #[must_use]
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Returns the replacement name.
    #[must_use]
    pub fn to(&self) -> &str {
        &self.to
    }
}

impl Recipe for RenameType {
    fn id(&self) -> &str {
        RENAME_TYPE_ID
    }

    fn offer(
        &self,
        node: &MirrorNode,
        _ctx: &RecipeContext<'_>,
    ) -> Result<Option<MirrorNode>, RecipeError> {
        let renameable = matches!(node.kind(), NodeKind::Identifier | NodeKind::TypeReference);
        if renameable && node.text() == Some(self.from.as_str()) {
            return Ok(Some(node.with_text(self.to.clone())));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_replaces_matching_type_reference() {
        let recipe = RenameType::new("A", "B").expect("valid rename");
        let node = MirrorNode::token(NodeKind::TypeReference, "type_identifier", " ", "A");
        let ctx = RecipeContext::new(&[]);

        let replaced = recipe
            .offer(&node, &ctx)
            .expect("offer succeeds")
            .expect("replacement produced");
        assert_eq!(replaced.text(), Some("B"));
        assert_eq!(replaced.leading(), " ");
    }

    #[test]
    fn rename_ignores_other_names_and_kinds() {
        let recipe = RenameType::new("A", "B").expect("valid rename");
        let ctx = RecipeContext::new(&[]);

        let other_name = MirrorNode::token(NodeKind::TypeReference, "type_identifier", "", "C");
        assert!(recipe.offer(&other_name, &ctx).expect("offer").is_none());

        let comment = MirrorNode::token(NodeKind::Comment, "line_comment", "", "// A");
        assert!(recipe.offer(&comment, &ctx).expect("offer").is_none());
    }

    #[test]
    fn rename_rejects_empty_and_identical_names() {
        assert!(RenameType::new("", "B").is_err());
        assert!(RenameType::new("A", "  ").is_err());
        assert!(RenameType::new("A", "A").is_err());
    }
}
