//! Built-in recipe: trim trailing whitespace.
//!
//! Removes spaces and tabs immediately preceding each line break in a
//! node's leading formatting span. Token text, including comments, is left
//! untouched.

use graft_syntax::MirrorNode;

use crate::error::RecipeError;
use crate::recipe::{Recipe, RecipeContext};

/// Identifier of the trim-trailing-whitespace recipe.
pub const TRIM_TRAILING_WHITESPACE_ID: &str = "trim-trailing-whitespace";

/// Strips trailing blanks from formatting spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrimTrailingWhitespace;

impl TrimTrailingWhitespace {
    /// Creates the recipe.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Recipe for TrimTrailingWhitespace {
    fn id(&self) -> &str {
        TRIM_TRAILING_WHITESPACE_ID
    }

    fn offer(
        &self,
        node: &MirrorNode,
        _ctx: &RecipeContext<'_>,
    ) -> Result<Option<MirrorNode>, RecipeError> {
        let trimmed = trim_line_ends(node.leading());
        if trimmed == node.leading() {
            Ok(None)
        } else {
            Ok(Some(node.with_leading(trimmed)))
        }
    }
}

fn trim_line_ends(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    for ch in span.chars() {
        if ch == '\n' {
            while out.ends_with(' ') || out.ends_with('\t') {
                out.pop();
            }
        }
        out.push(ch);
    }
    out
}
