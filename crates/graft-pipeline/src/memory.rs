//! An in-memory host implementation.
//!
//! Backs the test suite and embeddings that already hold parsed units in
//! memory. Parsing here is host-side work: a real host hands the pipeline
//! trees its own front end produced, and this implementation plays that
//! part for text it is given.

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use graft_syntax::{SupportedLanguage, TypeShape, TypeSource};

use crate::host::{ContentAccessor, HostReadError, HostTree, HostUnit, SourceHost};

/// Error raised when the in-memory host cannot parse a unit's text.
#[derive(Debug, Error)]
#[error("failed to parse {location} as {language}: {message}")]
pub struct MemoryParseError {
    /// Location of the unit that failed to parse.
    location: String,
    /// Language the parse was attempted under.
    language: SupportedLanguage,
    /// Description of the failure.
    message: String,
}

/// One in-memory root element.
#[derive(Debug)]
pub struct MemoryUnit {
    uri: Url,
    syntax: Option<HostTree>,
    primary: Option<String>,
    fallback: Option<String>,
}

impl MemoryUnit {
    /// Creates a unit whose tree is parsed from `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`MemoryParseError`] when the grammar cannot be loaded or
    /// the parser produces no tree.
    pub fn parsed(
        uri: Url,
        language: SupportedLanguage,
        text: impl Into<String>,
    ) -> Result<Self, MemoryParseError> {
        let text = text.into();
        let tree = parse(&uri, language, &text)?;
        Ok(Self {
            uri,
            syntax: Some(HostTree::new(language, tree)),
            primary: Some(text),
            fallback: None,
        })
    }

    /// Creates a unit whose tree was parsed from `parse_text` while its
    /// content accessors return `content_text`.
    ///
    /// Real hosts can get into this state when a unit changes between
    /// parse and read; tests use it to provoke mapping failures.
    ///
    /// # Errors
    ///
    /// Returns a [`MemoryParseError`] when parsing `parse_text` fails.
    pub fn parsed_from(
        uri: Url,
        language: SupportedLanguage,
        parse_text: &str,
        content_text: impl Into<String>,
    ) -> Result<Self, MemoryParseError> {
        let tree = parse(&uri, language, parse_text)?;
        Ok(Self {
            uri,
            syntax: Some(HostTree::new(language, tree)),
            primary: Some(content_text.into()),
            fallback: None,
        })
    }

    /// Creates a root element carrying no compilable unit.
    #[must_use]
    pub const fn without_syntax(uri: Url) -> Self {
        Self {
            uri,
            syntax: None,
            primary: None,
            fallback: None,
        }
    }

    /// Moves the unit's text behind the fallback accessor, making the
    /// primary read fail.
    #[must_use]
    pub fn with_failing_primary(mut self) -> Self {
        self.fallback = self.primary.take();
        self
    }
}

impl HostUnit for MemoryUnit {
    fn uri(&self) -> &Url {
        &self.uri
    }

    fn syntax(&self) -> Option<&HostTree> {
        self.syntax.as_ref()
    }

    fn read(&self, accessor: ContentAccessor) -> Result<String, HostReadError> {
        let slot = match accessor {
            ContentAccessor::Primary => &self.primary,
            ContentAccessor::Fallback => &self.fallback,
        };
        slot.clone().ok_or_else(|| {
            HostReadError::new(accessor, self.uri.as_str(), "no content behind this accessor")
        })
    }
}

fn parse(
    uri: &Url,
    language: SupportedLanguage,
    text: &str,
) -> Result<tree_sitter::Tree, MemoryParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|error| MemoryParseError {
            location: uri.as_str().to_owned(),
            language,
            message: error.to_string(),
        })?;
    parser.parse(text, None).ok_or_else(|| MemoryParseError {
        location: uri.as_str().to_owned(),
        language,
        message: "parser produced no tree".to_owned(),
    })
}

/// Map-backed type information for the in-memory host.
#[derive(Debug, Clone, Default)]
pub struct MemoryTypes {
    qualified: HashMap<String, String>,
    shapes: HashMap<String, TypeShape>,
}

impl MemoryTypes {
    /// Creates empty type information.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a simple name to its fully-qualified name.
    pub fn insert_name(&mut self, name: impl Into<String>, qualified: impl Into<String>) {
        self.qualified.insert(name.into(), qualified.into());
    }

    /// Records the shape of a fully-qualified name.
    pub fn insert_shape(&mut self, qualified: impl Into<String>, shape: TypeShape) {
        self.shapes.insert(qualified.into(), shape);
    }
}

impl TypeSource for MemoryTypes {
    fn qualify(&self, name: &str) -> Option<String> {
        self.qualified.get(name).cloned()
    }

    fn describe(&self, qualified: &str) -> Option<TypeShape> {
        self.shapes.get(qualified).cloned()
    }
}

/// An in-memory processing round.
#[derive(Debug, Default)]
pub struct MemoryHost {
    units: Vec<MemoryUnit>,
    over: bool,
    types: MemoryTypes,
}

impl MemoryHost {
    /// Creates a round over the given units.
    #[must_use]
    pub fn new(units: Vec<MemoryUnit>) -> Self {
        Self {
            units,
            over: false,
            types: MemoryTypes::new(),
        }
    }

    /// Attaches type information to the round.
    #[must_use]
    pub fn with_types(mut self, types: MemoryTypes) -> Self {
        self.types = types;
        self
    }

    /// Marks the round as the host's terminal round.
    #[must_use]
    pub const fn with_processing_over(mut self) -> Self {
        self.over = true;
        self
    }
}

impl SourceHost for MemoryHost {
    type Unit = MemoryUnit;

    fn roots(&self) -> &[MemoryUnit] {
        &self.units
    }

    fn processing_over(&self) -> bool {
        self.over
    }

    fn types(&self) -> &dyn TypeSource {
        &self.types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(path: &str) -> Url {
        Url::parse(&format!("memory:{path}")).expect("valid uri")
    }

    #[test]
    fn parsed_unit_reads_through_primary() {
        let unit = MemoryUnit::parsed(uri("/a.rs"), SupportedLanguage::Rust, "fn main() {}\n")
            .expect("unit parses");

        assert!(unit.syntax().is_some());
        assert_eq!(
            unit.read(ContentAccessor::Primary).expect("primary read"),
            "fn main() {}\n"
        );
    }

    #[test]
    fn failing_primary_moves_text_to_fallback() {
        let unit = MemoryUnit::parsed(uri("/a.rs"), SupportedLanguage::Rust, "fn main() {}\n")
            .expect("unit parses")
            .with_failing_primary();

        assert!(unit.read(ContentAccessor::Primary).is_err());
        assert_eq!(
            unit.read(ContentAccessor::Fallback).expect("fallback read"),
            "fn main() {}\n"
        );
    }

    #[test]
    fn unit_without_syntax_reports_no_tree() {
        let unit = MemoryUnit::without_syntax(uri("/package-info.rs"));
        assert!(unit.syntax().is_none());
    }
}
