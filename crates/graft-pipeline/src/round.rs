//! The round driver.
//!
//! Runs the locate, mirror, transform, and diff sequence once per host
//! round. Units are independent of one another and are processed
//! in parallel across worker threads; the only shared mutable state is the
//! round's type interner. Every per-unit failure becomes a diagnostic and
//! the round always completes from the host's point of view.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use graft_config::RoundConfig;
use graft_recipes::{Engine, RecipeRegistry, RecipeSet};
use graft_syntax::{NamedStyle, TreeBuilder, TypeInterner, TypeSource};

use crate::diagnostics::Diagnostic;
use crate::host::{HostUnit, SourceHost};
use crate::locator::locate;
use crate::patch::PatchWriter;
use crate::result::UnitResult;

/// Per-round invocation options, built once at round start.
///
/// Replaces ambient process state: the working directory is captured here
/// and passed into an otherwise stateless pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct RoundOptions {
    working_dir: Option<PathBuf>,
}

impl RoundOptions {
    /// Captures options from the current process environment.
    #[must_use]
    pub fn from_environment() -> Self {
        Self {
            working_dir: std::env::current_dir().ok(),
        }
    }

    /// Uses an explicit working directory for path relativisation and the
    /// patch artifact.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the working directory, when one is known.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

/// The outcome of one processing round.
///
/// Always returned, whatever happened inside the round; the host needs no
/// further action regardless of internal failures.
#[derive(Debug, Default)]
pub struct RoundOutcome {
    disabled: bool,
    results: Vec<UnitResult>,
    diagnostics: Vec<Diagnostic>,
    patch: Option<PathBuf>,
}

impl RoundOutcome {
    /// Returns `true` when configuration disabled the round.
    #[must_use]
    pub const fn disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the per-unit results, in host root order.
    #[must_use]
    pub fn results(&self) -> &[UnitResult] {
        &self.results
    }

    /// Returns the diagnostics produced during the round.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the path of the written patch artifact, when one exists.
    #[must_use]
    pub fn patch(&self) -> Option<&Path> {
        self.patch.as_deref()
    }
}

/// How processing one root element ended.
enum UnitOutcome {
    /// The element carried no compilable unit.
    Skipped,
    /// The unit was processed; bound/fault diagnostics may accompany it.
    Completed {
        result: Box<UnitResult>,
        diagnostics: Vec<Diagnostic>,
    },
    /// The unit was excluded from the round.
    Failed(Diagnostic),
}

/// Runs the pipeline once for a host round.
///
/// Performs no work when the host signals the terminal round or when
/// configuration leaves the pipeline disabled; both are valid outcomes,
/// not errors.
pub fn run_round<H: SourceHost>(
    host: &H,
    registry: &RecipeRegistry,
    config: &RoundConfig,
    options: &RoundOptions,
) -> RoundOutcome {
    tracing::info!("Running Graft");

    if host.processing_over() {
        return RoundOutcome::default();
    }

    if !config.enabled() {
        let note =
            Diagnostic::note("Graft is disabled for this round: no active recipes configured");
        return finish(RoundOutcome {
            disabled: true,
            diagnostics: vec![note],
            ..RoundOutcome::default()
        });
    }

    let recipes = match registry.activate(config.active_recipes()) {
        Ok(recipes) => recipes,
        Err(error) => {
            return finish(RoundOutcome {
                diagnostics: vec![Diagnostic::error(format!(
                    "unable to activate recipes: {error}"
                ))],
                ..RoundOutcome::default()
            });
        }
    };
    let styles: Arc<[NamedStyle]> = match registry.activate_styles(config.active_styles()) {
        Ok(styles) => styles.into(),
        Err(error) => {
            return finish(RoundOutcome {
                diagnostics: vec![Diagnostic::error(format!(
                    "unable to activate styles: {error}"
                ))],
                ..RoundOutcome::default()
            });
        }
    };

    let mut diagnostics = vec![Diagnostic::note(format!(
        "Active recipes: {}",
        config.active_recipes().join(", ")
    ))];

    // Fresh per round; nothing interned survives into the next one.
    let interner = TypeInterner::new();
    let engine = Engine::new(config.max_passes());

    let outcomes: Vec<UnitOutcome> = host
        .roots()
        .par_iter()
        .map(|unit| {
            process_unit(
                unit,
                host.types(),
                &styles,
                &interner,
                &recipes,
                engine,
                config,
                options.working_dir(),
            )
        })
        .collect();

    let mut results = Vec::new();
    for outcome in outcomes {
        match outcome {
            UnitOutcome::Skipped => {}
            UnitOutcome::Completed {
                result,
                diagnostics: unit_diagnostics,
            } => {
                results.push(*result);
                diagnostics.extend(unit_diagnostics);
            }
            UnitOutcome::Failed(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let writer = PatchWriter::new(options.working_dir().unwrap_or_else(|| Path::new(".")));
    let patch = match writer.write(&results) {
        Ok(Some(path)) => Some(path),
        Ok(None) => {
            diagnostics.push(Diagnostic::note("Graft produced no changes this round"));
            None
        }
        Err(error) => {
            diagnostics.push(Diagnostic::error(format!(
                "unable to write patch file: {error}"
            )));
            None
        }
    };

    finish(RoundOutcome {
        disabled: false,
        results,
        diagnostics,
        patch,
    })
}

/// Runs one unit through location, mirroring, and recipe application.
#[expect(clippy::too_many_arguments, reason = "round state is deliberately explicit")]
fn process_unit<U: HostUnit>(
    unit: &U,
    types: &dyn TypeSource,
    styles: &Arc<[NamedStyle]>,
    interner: &TypeInterner,
    recipes: &RecipeSet,
    engine: Engine,
    config: &RoundConfig,
    working_dir: Option<&Path>,
) -> UnitOutcome {
    let located = match locate(unit, working_dir) {
        Ok(Some(located)) => located,
        Ok(None) => return UnitOutcome::Skipped,
        Err(error) => {
            return UnitOutcome::Failed(
                Diagnostic::warning(format!("unable to read compilation unit: {error}"))
                    .at(unit.uri().as_str()),
            );
        }
    };

    let location = located.path().display().to_string();
    let builder = TreeBuilder::new(
        located.language(),
        located.text(),
        &location,
        Arc::clone(styles),
        interner,
        types,
    );
    let before = match builder.build(located.syntax().tree()) {
        Ok(tree) => tree,
        Err(error) => {
            return UnitOutcome::Failed(
                Diagnostic::error(format!(
                    "unable to map compilation unit to a mirror tree: {error}"
                ))
                .at(unit.uri().as_str()),
            );
        }
    };

    let outcome = engine.apply(recipes, &before);

    let mut diagnostics: Vec<Diagnostic> = outcome
        .faults()
        .iter()
        .map(|fault| {
            Diagnostic::warning(format!(
                "recipe '{}' faulted on a {} node: {}",
                fault.recipe(),
                fault.grammar_kind(),
                fault.message()
            ))
            .at(location.clone())
        })
        .collect();

    if outcome.fixed_point().hit_bound() && config.report_non_convergence() {
        diagnostics.push(
            Diagnostic::warning(format!(
                "recipes did not converge within {} passes",
                engine.max_passes()
            ))
            .at(location.clone()),
        );
    }

    let applied = outcome.applied().to_vec();
    let after = outcome.into_tree();
    let result = UnitResult::new(located.path().to_path_buf(), before, after, applied);

    UnitOutcome::Completed {
        result: Box::new(result),
        diagnostics,
    }
}

/// Surfaces every diagnostic once, in order, and returns the outcome.
fn finish(outcome: RoundOutcome) -> RoundOutcome {
    for diagnostic in &outcome.diagnostics {
        diagnostic.emit();
    }
    outcome
}
