//! Recipe and style activation.
//!
//! The registry maps the textual identifiers found in configuration onto
//! activated recipe instances and style objects. Catalog discovery
//! (classpath scanning, home-directory catalogs) is the embedding host's
//! concern; this registry only resolves names it was explicitly given.

use std::collections::HashMap;
use std::sync::Arc;

use graft_syntax::NamedStyle;

use crate::error::RecipeError;
use crate::recipe::{Recipe, RecipeSet};
use crate::trivia::TrimTrailingWhitespace;

/// Registry of activatable recipes and styles.
#[derive(Default)]
pub struct RecipeRegistry {
    recipes: HashMap<String, Arc<dyn Recipe>>,
    styles: HashMap<String, NamedStyle>,
}

impl RecipeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry preloaded with the built-in recipes and the
    /// default style.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Built-ins carry unique ids, so registration cannot collide.
        let _ = registry.register(Arc::new(TrimTrailingWhitespace::new()));
        let _ = registry.register_style(NamedStyle::new(
            "default",
            graft_syntax::IndentStyle::default(),
        ));
        registry
    }

    /// Registers a recipe under its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::AlreadyRegistered`] when a recipe with the
    /// same identifier exists.
    pub fn register(&mut self, recipe: Arc<dyn Recipe>) -> Result<(), RecipeError> {
        let id = recipe.id().to_owned();
        if self.recipes.contains_key(&id) {
            return Err(RecipeError::already_registered(id));
        }
        self.recipes.insert(id, recipe);
        Ok(())
    }

    /// Registers a style under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::AlreadyRegistered`] when a style with the
    /// same name exists.
    pub fn register_style(&mut self, style: NamedStyle) -> Result<(), RecipeError> {
        let name = style.name().to_owned();
        if self.styles.contains_key(&name) {
            return Err(RecipeError::already_registered(name));
        }
        self.styles.insert(name, style);
        Ok(())
    }

    /// Activates the named recipes as a composite set, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::UnknownRecipe`] for the first name that does
    /// not resolve.
    pub fn activate(&self, names: &[String]) -> Result<RecipeSet, RecipeError> {
        let mut set = RecipeSet::new();
        for name in names {
            let recipe = self
                .recipes
                .get(name)
                .ok_or_else(|| RecipeError::unknown_recipe(name))?;
            set.push(Arc::clone(recipe));
        }
        Ok(set)
    }

    /// Activates the named styles, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::UnknownStyle`] for the first name that does
    /// not resolve.
    pub fn activate_styles(&self, names: &[String]) -> Result<Vec<NamedStyle>, RecipeError> {
        names
            .iter()
            .map(|name| {
                self.styles
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RecipeError::unknown_style(name))
            })
            .collect()
    }
}

impl std::fmt::Debug for RecipeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeRegistry")
            .field("recipes", &self.recipes.keys().collect::<Vec<_>>())
            .field("styles", &self.styles.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rename::RenameType;
    use crate::trivia::TRIM_TRAILING_WHITESPACE_ID;

    #[test]
    fn activate_resolves_names_in_order() {
        let mut registry = RecipeRegistry::with_builtins();
        registry
            .register(Arc::new(RenameType::new("A", "B").expect("valid rename")))
            .expect("register succeeds");

        let set = registry
            .activate(&["rename-type".to_owned(), TRIM_TRAILING_WHITESPACE_ID.to_owned()])
            .expect("activation succeeds");
        let ids: Vec<_> = set.recipes().iter().map(|r| r.id().to_owned()).collect();
        assert_eq!(ids, ["rename-type", TRIM_TRAILING_WHITESPACE_ID]);
    }

    #[test]
    fn unknown_names_fail_activation() {
        let registry = RecipeRegistry::with_builtins();
        let result = registry.activate(&["no-such-recipe".to_owned()]);
        assert_eq!(
            result.err(),
            Some(RecipeError::unknown_recipe("no-such-recipe"))
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = RecipeRegistry::new();
        registry
            .register(Arc::new(TrimTrailingWhitespace::new()))
            .expect("first registration succeeds");
        let result = registry.register(Arc::new(TrimTrailingWhitespace::new()));
        assert!(result.is_err());
    }

    #[test]
    fn default_style_is_activatable() {
        let registry = RecipeRegistry::with_builtins();
        let styles = registry
            .activate_styles(&["default".to_owned()])
            .expect("styles activate");
        assert_eq!(styles.len(), 1);
    }
}
