//! End-to-end behaviour of the round driver.
//!
//! Each test runs a complete round against the in-memory host, using a
//! temporary working directory for path relativisation and the patch
//! artifact.

use std::sync::Arc;

use tempfile::TempDir;
use url::Url;

use graft_config::{ConfigSource, RoundConfig, keys};
use graft_pipeline::{
    MemoryHost, MemoryTypes, MemoryUnit, PATCH_DIR, PATCH_FILE_NAME, RoundOptions, Severity,
    run_round,
};
use graft_recipes::{RecipeRegistry, RenameType};
use graft_syntax::{MirrorNode, SupportedLanguage, TypeDescriptor, TypeShape};

fn unit_uri(dir: &TempDir, name: &str) -> Url {
    Url::from_file_path(dir.path().join(name)).expect("absolute path forms a url")
}

fn typescript_unit(dir: &TempDir, name: &str, text: &str) -> MemoryUnit {
    MemoryUnit::parsed(unit_uri(dir, name), SupportedLanguage::TypeScript, text)
        .expect("unit parses")
}

fn registry_with_rename() -> RecipeRegistry {
    let mut registry = RecipeRegistry::with_builtins();
    registry
        .register(Arc::new(RenameType::new("A", "B").expect("valid rename")))
        .expect("rename registers");
    registry
}

fn config_with_recipes(names: &str) -> RoundConfig {
    let mut source = ConfigSource::new();
    source.insert(keys::ACTIVE_RECIPES, names);
    RoundConfig::from_source(&source)
}

fn options_for(dir: &TempDir) -> RoundOptions {
    RoundOptions::default().with_working_dir(dir.path())
}

#[test]
fn renaming_a_class_produces_one_patch_block() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![typescript_unit(&dir, "A.ts", "class A {}\n")]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert_eq!(outcome.results().len(), 1);
    let result = outcome.results().first().expect("one result");
    assert_eq!(result.applied(), ["rename-type"]);

    let diff = result.diff().expect("unit changed");
    assert!(diff.contains("-class A {}"));
    assert!(diff.contains("+class B {}"));

    let patch = outcome.patch().expect("patch written");
    assert_eq!(patch, dir.path().join(PATCH_DIR).join(PATCH_FILE_NAME));
    let contents = std::fs::read_to_string(patch).expect("patch readable");
    assert_eq!(contents.matches("--- ").count(), 1);
}

#[test]
fn unchanged_units_produce_results_but_no_patch() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![typescript_unit(&dir, "C.ts", "class C {}\n")]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert_eq!(outcome.results().len(), 1);
    assert!(outcome.results().first().expect("result").diff().is_none());
    assert!(outcome.patch().is_none());
    assert!(!dir.path().join(PATCH_DIR).join(PATCH_FILE_NAME).exists());
    assert!(
        outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity() == Severity::Note && d.message().contains("no changes"))
    );
}

#[test]
fn missing_active_recipes_disable_the_round() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![typescript_unit(&dir, "A.ts", "class A {}\n")]);
    let config = RoundConfig::from_source(&ConfigSource::new());

    let outcome = run_round(&host, &registry_with_rename(), &config, &options_for(&dir));

    assert!(outcome.disabled());
    assert!(outcome.results().is_empty());
    assert!(outcome.patch().is_none());
    assert!(
        outcome
            .diagnostics()
            .iter()
            .any(|d| d.message().contains("disabled"))
    );
}

#[test]
fn shared_type_references_intern_to_one_descriptor() {
    let dir = TempDir::new().expect("tempdir");
    let mut types = MemoryTypes::new();
    types.insert_name("Foo", "com.acme.Foo");
    types.insert_shape("com.acme.Foo", TypeShape::default());

    let host = MemoryHost::new(vec![
        MemoryUnit::parsed(
            unit_uri(&dir, "first.rs"),
            SupportedLanguage::Rust,
            "fn take(value: Foo) {}\n",
        )
        .expect("unit parses"),
        MemoryUnit::parsed(
            unit_uri(&dir, "second.rs"),
            SupportedLanguage::Rust,
            "fn make() -> Foo { make() }\n",
        )
        .expect("unit parses"),
    ])
    .with_types(types);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("trim-trailing-whitespace"),
        &options_for(&dir),
    );

    fn collect(node: &MirrorNode, out: &mut Vec<Arc<TypeDescriptor>>) {
        if let Some(descriptor) = node.resolved_type() {
            out.push(Arc::clone(descriptor));
        }
        for child in node.children() {
            collect(child, out);
        }
    }

    let mut descriptors = Vec::new();
    for result in outcome.results() {
        collect(result.before().root(), &mut descriptors);
    }

    assert!(descriptors.len() >= 2, "both units reference the type");
    let first = descriptors.first().expect("descriptor");
    for descriptor in &descriptors {
        assert!(
            TypeDescriptor::same(first, descriptor),
            "resolutions of one name must be reference-identical"
        );
    }
}

#[test]
fn a_failing_unit_does_not_abort_its_neighbours() {
    let dir = TempDir::new().expect("tempdir");
    let broken = MemoryUnit::parsed_from(
        unit_uri(&dir, "broken.ts"),
        SupportedLanguage::TypeScript,
        "class SomethingMuchLonger {}\n",
        "class X {}",
    )
    .expect("unit parses");

    let host = MemoryHost::new(vec![
        typescript_unit(&dir, "first.ts", "class A {}\n"),
        broken,
        typescript_unit(&dir, "third.ts", "class A {}\n"),
    ]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert_eq!(outcome.results().len(), 2);
    assert!(
        outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity() == Severity::Error
                && d.location().is_some_and(|l| l.contains("broken.ts")))
    );

    let patch = outcome.patch().expect("patch written for survivors");
    let contents = std::fs::read_to_string(patch).expect("patch readable");
    assert_eq!(contents.matches("--- ").count(), 2);
    assert!(contents.contains("first.ts"));
    assert!(contents.contains("third.ts"));
}

#[test]
fn fallback_content_still_yields_a_unit() {
    let dir = TempDir::new().expect("tempdir");
    let unit = typescript_unit(&dir, "A.ts", "class A {}\n").with_failing_primary();
    let host = MemoryHost::new(vec![unit]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert_eq!(outcome.results().len(), 1);
    let result = outcome.results().first().expect("result");
    assert_eq!(result.before().serialise(), "class A {}\n");
    assert!(result.changed());
}

#[test]
fn package_only_elements_are_skipped_silently() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![
        MemoryUnit::without_syntax(unit_uri(&dir, "package-info.ts")),
        typescript_unit(&dir, "A.ts", "class A {}\n"),
    ]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert_eq!(outcome.results().len(), 1);
    assert!(
        !outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity() == Severity::Error)
    );
}

#[test]
fn terminal_rounds_do_no_work() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![typescript_unit(&dir, "A.ts", "class A {}\n")])
        .with_processing_over();

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    assert!(outcome.results().is_empty());
    assert!(outcome.patch().is_none());
    assert!(!dir.path().join(PATCH_DIR).exists());
}

#[test]
fn untouched_units_round_trip_byte_exactly() {
    let dir = TempDir::new().expect("tempdir");
    let text = "// header\n\nclass C {\n\tvalue = 1;  // trailing comment\n}\n\n";
    let host = MemoryHost::new(vec![typescript_unit(&dir, "C.ts", text)]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("rename-type"),
        &options_for(&dir),
    );

    let result = outcome.results().first().expect("result");
    assert_eq!(result.before().serialise(), text);
    assert_eq!(result.after().serialise(), text);
}

#[test]
fn cyclic_recipes_stop_at_the_bound_and_still_emit_a_result() {
    use graft_recipes::{Recipe, RecipeContext, RecipeError};
    use graft_syntax::NodeKind;

    struct Flip {
        id: &'static str,
        from: &'static str,
        to: &'static str,
    }

    impl Recipe for Flip {
        fn id(&self) -> &str {
            self.id
        }

        fn offer(
            &self,
            node: &MirrorNode,
            _ctx: &RecipeContext<'_>,
        ) -> Result<Option<MirrorNode>, RecipeError> {
            let renameable =
                matches!(node.kind(), NodeKind::Identifier | NodeKind::TypeReference);
            if renameable && node.text() == Some(self.from) {
                return Ok(Some(node.with_text(self.to)));
            }
            Ok(None)
        }
    }

    let dir = TempDir::new().expect("tempdir");
    let mut registry = RecipeRegistry::new();
    registry
        .register(Arc::new(Flip {
            id: "flip",
            from: "A",
            to: "B",
        }))
        .expect("flip registers");
    registry
        .register(Arc::new(Flip {
            id: "flop",
            from: "B",
            to: "A",
        }))
        .expect("flop registers");

    let mut source = ConfigSource::new();
    source.insert(keys::ACTIVE_RECIPES, "flip,flop");
    source.insert(keys::REPORT_NON_CONVERGENCE, "true");
    let config = RoundConfig::from_source(&source);

    let host = MemoryHost::new(vec![typescript_unit(&dir, "A.ts", "class A {}\n")]);
    let outcome = run_round(&host, &registry, &config, &options_for(&dir));

    // The bound is a stop, not an error: the unit still produces a result.
    assert_eq!(outcome.results().len(), 1);
    assert!(
        outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity() == Severity::Warning && d.message().contains("converge"))
    );
}

#[test]
fn unknown_recipe_names_surface_as_an_activation_error() {
    let dir = TempDir::new().expect("tempdir");
    let host = MemoryHost::new(vec![typescript_unit(&dir, "A.ts", "class A {}\n")]);

    let outcome = run_round(
        &host,
        &registry_with_rename(),
        &config_with_recipes("no-such-recipe"),
        &options_for(&dir),
    );

    assert!(outcome.results().is_empty());
    assert!(
        outcome
            .diagnostics()
            .iter()
            .any(|d| d.severity() == Severity::Error && d.message().contains("no-such-recipe"))
    );
}
