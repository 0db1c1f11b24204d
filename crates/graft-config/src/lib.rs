//! Process-level configuration for the Graft pipeline.
//!
//! The host toolchain owns configuration sourcing; this crate only defines
//! the named keys the pipeline reads, the lookup precedence over a
//! host-supplied properties map and the process environment, and the
//! [`RoundConfig`] snapshot built once at round start and passed by
//! reference into an otherwise stateless pipeline invocation.

mod defaults;
mod source;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_PASSES, default_log_filter, default_log_filter_string,
};
pub use source::{ConfigSource, normalise_key};

/// Configuration keys read by the pipeline.
pub mod keys {
    /// Disables the pipeline for the round when present with any value.
    pub const DISABLE: &str = "graft.disable";
    /// Comma-separated recipe identifiers to activate. Absence disables
    /// the pipeline for the round.
    pub const ACTIVE_RECIPES: &str = "graft.activeRecipes";
    /// Comma-separated style names to activate.
    pub const ACTIVE_STYLES: &str = "graft.activeStyles";
    /// Bound on fixed-point passes per unit.
    pub const MAX_PASSES: &str = "graft.maxPasses";
    /// Emits a warning diagnostic when a unit hits the pass bound.
    pub const REPORT_NON_CONVERGENCE: &str = "graft.reportNonConvergence";
    /// Log filter expression for the tracing subscriber.
    pub const LOG_FILTER: &str = "graft.logFilter";
}

/// Immutable configuration snapshot for one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    enabled: bool,
    active_recipes: Vec<String>,
    active_styles: Vec<String>,
    max_passes: usize,
    report_non_convergence: bool,
    log_filter: String,
}

impl RoundConfig {
    /// Builds the round's configuration from a source.
    ///
    /// The pipeline is enabled only when [`keys::ACTIVE_RECIPES`] resolves
    /// to a value and [`keys::DISABLE`] does not; a disabled round is a
    /// valid outcome, not an error.
    #[must_use]
    pub fn from_source(source: &ConfigSource) -> Self {
        let disabled = source.lookup(keys::DISABLE).is_some();
        let recipes = source.lookup(keys::ACTIVE_RECIPES);
        let enabled = !disabled && recipes.is_some();

        let active_recipes = recipes.as_deref().map(split_names).unwrap_or_default();
        let active_styles = source
            .lookup(keys::ACTIVE_STYLES)
            .as_deref()
            .map(split_names)
            .unwrap_or_default();
        let max_passes = source
            .lookup(keys::MAX_PASSES)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_PASSES)
            .max(1);
        let report_non_convergence = source
            .lookup(keys::REPORT_NON_CONVERGENCE)
            .is_some_and(|value| is_truthy(&value));
        let log_filter = source
            .lookup(keys::LOG_FILTER)
            .unwrap_or_else(default_log_filter_string);

        Self {
            enabled,
            active_recipes,
            active_styles,
            max_passes,
            report_non_convergence,
            log_filter,
        }
    }

    /// Returns whether the pipeline should run this round.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the recipe identifiers to activate, in order.
    #[must_use]
    pub fn active_recipes(&self) -> &[String] {
        &self.active_recipes
    }

    /// Returns the style names to activate, in order.
    #[must_use]
    pub fn active_styles(&self) -> &[String] {
        &self.active_styles
    }

    /// Returns the bound on fixed-point passes per unit.
    #[must_use]
    pub const fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns whether hitting the pass bound emits a diagnostic.
    #[must_use]
    pub const fn report_non_convergence(&self) -> bool {
        self.report_non_convergence
    }

    /// Returns the log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }
}

impl Default for RoundConfig {
    /// A disabled configuration, as if no recipes were activated.
    fn default() -> Self {
        Self {
            enabled: false,
            active_recipes: Vec::new(),
            active_styles: Vec::new(),
            max_passes: DEFAULT_MAX_PASSES,
            report_non_convergence: false,
            log_filter: default_log_filter_string(),
        }
    }
}

fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
