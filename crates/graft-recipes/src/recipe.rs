//! The recipe capability contract and the composite recipe set.
//!
//! A recipe is offered every node of a mirror tree and may return a
//! replacement subtree. Recipes are stateless per invocation and safe to
//! share across the worker threads processing a round; a set of recipes is
//! itself a recipe, applied member-by-member in a fixed order.

use std::sync::Arc;

use graft_syntax::{IndentStyle, MirrorNode, NamedStyle};

use crate::error::RecipeError;

/// Per-unit context passed to every recipe invocation.
///
/// Carries the styles attached to the unit's tree so a recipe that
/// synthesises code can format it idiomatically; captured formatting is
/// never affected.
#[derive(Debug, Clone, Copy)]
pub struct RecipeContext<'a> {
    styles: &'a [NamedStyle],
}

impl<'a> RecipeContext<'a> {
    /// Creates a context over the unit's active styles.
    #[must_use]
    pub const fn new(styles: &'a [NamedStyle]) -> Self {
        Self { styles }
    }

    /// Returns the active styles.
    #[must_use]
    pub const fn styles(&self) -> &'a [NamedStyle] {
        self.styles
    }

    /// Returns the indentation convention for synthesised code.
    ///
    /// Falls back to the default convention when no style is active.
    #[must_use]
    pub fn indent(&self) -> IndentStyle {
        self.styles
            .first()
            .map_or_else(IndentStyle::default, NamedStyle::indent)
    }
}

/// A composable transformation rule.
///
/// `offer` must be deterministic for a given node and context, and must
/// not retain references to the nodes it visits.
pub trait Recipe: Send + Sync {
    /// Stable identifier used for provenance and diagnostics.
    fn id(&self) -> &str;

    /// Offers one node to this recipe.
    ///
    /// Returns `Ok(None)` to leave the node unchanged, or a replacement
    /// subtree to substitute for it.
    ///
    /// # Errors
    ///
    /// Returns a [`RecipeError`] when the recipe cannot process the node;
    /// the engine discards the recipe's effect on that node and records a
    /// diagnostic, leaving the rest of the unit unaffected.
    fn offer(
        &self,
        node: &MirrorNode,
        ctx: &RecipeContext<'_>,
    ) -> Result<Option<MirrorNode>, RecipeError>;
}

/// An ordered set of recipes, itself usable as a single recipe.
#[derive(Clone, Default)]
pub struct RecipeSet {
    recipes: Vec<Arc<dyn Recipe>>,
}

impl RecipeSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set from recipes in application order.
    #[must_use]
    pub fn from_recipes(recipes: Vec<Arc<dyn Recipe>>) -> Self {
        Self { recipes }
    }

    /// Appends a recipe to the end of the application order.
    pub fn push(&mut self, recipe: Arc<dyn Recipe>) {
        self.recipes.push(recipe);
    }

    /// Returns the member recipes in application order.
    #[must_use]
    pub fn recipes(&self) -> &[Arc<dyn Recipe>] {
        &self.recipes
    }

    /// Returns the number of member recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Returns `true` when the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl std::fmt::Debug for RecipeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.recipes.iter().map(|r| r.id()))
            .finish()
    }
}

impl Recipe for RecipeSet {
    fn id(&self) -> &str {
        "composite"
    }

    fn offer(
        &self,
        node: &MirrorNode,
        ctx: &RecipeContext<'_>,
    ) -> Result<Option<MirrorNode>, RecipeError> {
        let mut current: Option<MirrorNode> = None;
        for recipe in &self.recipes {
            let subject = current.as_ref().unwrap_or(node);
            if let Some(replacement) = recipe.offer(subject, ctx)? {
                current = Some(replacement);
            }
        }
        Ok(current)
    }
}
