//! Bounded fixed-point application of recipe sets.
//!
//! One pass offers every node of the tree to every recipe in order. If any
//! recipe changed anything, the engine runs another pass so one recipe's
//! output can feed another's input, up to a fixed bound. Hitting the bound
//! is a deliberate stop, not a failure: the engine returns the latest tree
//! either way.

use std::sync::Arc;

use graft_syntax::{MirrorNode, MirrorTree};

use crate::recipe::{RecipeContext, RecipeSet};

/// Default number of passes before the engine stops iterating.
pub const DEFAULT_MAX_PASSES: usize = 3;

/// How a unit's fixed-point iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPoint {
    /// A full pass completed without any recipe changing a node.
    Converged {
        /// Number of passes run, including the final clean pass.
        passes: usize,
    },
    /// The pass bound was reached while changes were still occurring.
    BoundReached {
        /// Number of passes run.
        passes: usize,
    },
}

impl FixedPoint {
    /// Returns the number of passes run.
    #[must_use]
    pub const fn passes(self) -> usize {
        match self {
            Self::Converged { passes } | Self::BoundReached { passes } => passes,
        }
    }

    /// Returns `true` when iteration stopped at the bound.
    #[must_use]
    pub const fn hit_bound(self) -> bool {
        matches!(self, Self::BoundReached { .. })
    }
}

/// A recipe fault recorded during a pass.
///
/// The faulting recipe's effect on the node was discarded; everything else
/// in the unit proceeded normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFault {
    recipe: String,
    grammar_kind: String,
    message: String,
}

impl RecipeFault {
    fn new(recipe: &str, grammar_kind: &str, message: String) -> Self {
        Self {
            recipe: recipe.to_owned(),
            grammar_kind: grammar_kind.to_owned(),
            message,
        }
    }

    /// Returns the identifier of the faulting recipe.
    #[must_use]
    pub fn recipe(&self) -> &str {
        &self.recipe
    }

    /// Returns the grammar kind of the node being visited.
    #[must_use]
    pub fn grammar_kind(&self) -> &str {
        &self.grammar_kind
    }

    /// Returns the fault description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of applying a recipe set to one mirror tree.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    tree: MirrorTree,
    applied: Vec<String>,
    faults: Vec<RecipeFault>,
    fixed_point: FixedPoint,
}

impl EngineOutcome {
    /// Returns the transformed tree.
    #[must_use]
    pub const fn tree(&self) -> &MirrorTree {
        &self.tree
    }

    /// Consumes the outcome, returning the transformed tree.
    #[must_use]
    pub fn into_tree(self) -> MirrorTree {
        self.tree
    }

    /// Returns the identifiers of recipes that made a change, in the order
    /// they first changed something.
    #[must_use]
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Returns the recipe faults recorded across all passes.
    #[must_use]
    pub fn faults(&self) -> &[RecipeFault] {
        &self.faults
    }

    /// Returns how the iteration ended.
    #[must_use]
    pub const fn fixed_point(&self) -> FixedPoint {
        self.fixed_point
    }

    /// Returns `true` when any recipe changed the tree.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// State accumulated while walking one pass.
#[derive(Default)]
struct PassState {
    changed: bool,
    applied: Vec<String>,
    faults: Vec<RecipeFault>,
}

/// The recipe application engine.
#[derive(Debug, Clone, Copy)]
pub struct Engine {
    max_passes: usize,
}

impl Engine {
    /// Creates an engine with the given pass bound.
    ///
    /// Bounds below one are clamped to one.
    #[must_use]
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes: max_passes.max(1),
        }
    }

    /// Returns the configured pass bound.
    #[must_use]
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Applies a recipe set to a tree, iterating to a bounded fixed point.
    ///
    /// The input tree is never mutated; untouched subtrees are shared
    /// between input and output.
    #[must_use]
    pub fn apply(&self, recipes: &RecipeSet, tree: &MirrorTree) -> EngineOutcome {
        let ctx = RecipeContext::new(tree.styles());
        let mut current = tree.clone();
        let mut applied: Vec<String> = Vec::new();
        let mut faults: Vec<RecipeFault> = Vec::new();
        let mut passes = 0usize;

        loop {
            passes += 1;
            let mut pass = PassState::default();
            let root = transform_node(current.root(), recipes, &ctx, &mut pass);
            faults.extend(pass.faults);
            for id in pass.applied {
                if !applied.contains(&id) {
                    applied.push(id);
                }
            }

            if !pass.changed {
                return EngineOutcome {
                    tree: current,
                    applied,
                    faults,
                    fixed_point: FixedPoint::Converged { passes },
                };
            }

            current = current.with_root(root);

            if passes == self.max_passes {
                return EngineOutcome {
                    tree: current,
                    applied,
                    faults,
                    fixed_point: FixedPoint::BoundReached { passes },
                };
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PASSES)
    }
}

/// Offers one node to every recipe in order, then recurses into children.
///
/// Returns the original `Arc` untouched when nothing changed, so callers
/// can detect change by pointer identity.
fn transform_node(
    node: &Arc<MirrorNode>,
    recipes: &RecipeSet,
    ctx: &RecipeContext<'_>,
    state: &mut PassState,
) -> Arc<MirrorNode> {
    let mut current = Arc::clone(node);

    for recipe in recipes.recipes() {
        match recipe.offer(&current, ctx) {
            Ok(Some(replacement)) => {
                state.changed = true;
                state.applied.push(recipe.id().to_owned());
                current = Arc::new(replacement);
            }
            Ok(None) => {}
            Err(error) => {
                state.faults.push(RecipeFault::new(
                    recipe.id(),
                    current.grammar_kind(),
                    error.to_string(),
                ));
            }
        }
    }

    let mut children = Vec::with_capacity(current.children().len());
    let mut child_changed = false;
    for child in current.children() {
        let transformed = transform_node(child, recipes, ctx, state);
        if !Arc::ptr_eq(&transformed, child) {
            child_changed = true;
        }
        children.push(transformed);
    }
    if child_changed {
        current = Arc::new(current.with_children(children));
    }

    current
}
