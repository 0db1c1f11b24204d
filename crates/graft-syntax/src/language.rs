//! Language detection, grammar selection, and node-kind classification.
//!
//! This module provides the [`SupportedLanguage`] enum for identifying the
//! language of a host-supplied parse tree and for mapping the grammar's raw
//! node kinds onto the semantic [`NodeKind`] categories carried by mirror
//! nodes.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::tree::NodeKind;

/// Languages whose host parse trees can be mirrored.
///
/// Each variant maps to a Tree-sitter grammar. The pipeline never parses
/// text itself; the grammar handles exist so hosts and tests can produce
/// the parse trees the mirror builder consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    #[default]
    Rust,
    /// Python source files (`.py`).
    Python,
    /// TypeScript source files (`.ts`, `.tsx`).
    TypeScript,
}

impl SupportedLanguage {
    /// Detects the language from a file extension.
    ///
    /// Returns `None` if the extension is not recognised.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let normalised = ext.to_ascii_lowercase();
        match normalised.as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Detects the language from a file path by examining its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter grammar for this language.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            // Use a TSX-capable grammar so `.tsx` is parsed correctly.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the lower-case identifier for this language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
        }
    }

    /// Returns all supported languages.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Rust, Self::Python, Self::TypeScript]
    }

    /// Classifies a grammar node kind into the semantic category mirrored
    /// by [`NodeKind`].
    ///
    /// Anonymous grammar nodes (punctuation, keywords) are always plain
    /// tokens. Named nodes the classifier does not recognise fall back to
    /// the structural suffix of their kind string, and finally to
    /// [`NodeKind::Other`].
    #[must_use]
    pub fn classify(self, grammar_kind: &str, named: bool) -> NodeKind {
        if !named {
            return NodeKind::Token;
        }
        if let Some(kind) = self.classify_named(grammar_kind) {
            return kind;
        }
        if grammar_kind.ends_with("_statement") || grammar_kind.ends_with("_declaration") {
            return NodeKind::Statement;
        }
        if grammar_kind.ends_with("_expression") {
            return NodeKind::Expression;
        }
        NodeKind::Other
    }

    fn classify_named(self, grammar_kind: &str) -> Option<NodeKind> {
        match self {
            Self::Rust => classify_rust(grammar_kind),
            Self::Python => classify_python(grammar_kind),
            Self::TypeScript => classify_typescript(grammar_kind),
        }
    }
}

fn classify_rust(kind: &str) -> Option<NodeKind> {
    match kind {
        "source_file" => Some(NodeKind::SourceFile),
        "struct_item" | "enum_item" | "union_item" | "trait_item" => {
            Some(NodeKind::TypeDeclaration)
        }
        "function_item" | "function_signature_item" => Some(NodeKind::FunctionDeclaration),
        "field_declaration" => Some(NodeKind::FieldDeclaration),
        "use_declaration" | "extern_crate_declaration" => Some(NodeKind::ImportDeclaration),
        "let_declaration" => Some(NodeKind::Statement),
        "identifier" | "field_identifier" | "shorthand_field_identifier" => {
            Some(NodeKind::Identifier)
        }
        "type_identifier" | "primitive_type" => Some(NodeKind::TypeReference),
        "line_comment" | "block_comment" => Some(NodeKind::Comment),
        _ => None,
    }
}

fn classify_python(kind: &str) -> Option<NodeKind> {
    match kind {
        "module" => Some(NodeKind::SourceFile),
        "class_definition" => Some(NodeKind::TypeDeclaration),
        "function_definition" => Some(NodeKind::FunctionDeclaration),
        "import_statement" | "import_from_statement" => Some(NodeKind::ImportDeclaration),
        "identifier" => Some(NodeKind::Identifier),
        "comment" => Some(NodeKind::Comment),
        "call" | "attribute" | "lambda" => Some(NodeKind::Expression),
        _ => None,
    }
}

fn classify_typescript(kind: &str) -> Option<NodeKind> {
    match kind {
        "program" => Some(NodeKind::SourceFile),
        "class_declaration"
        | "abstract_class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "type_alias_declaration" => Some(NodeKind::TypeDeclaration),
        "function_declaration" | "generator_function_declaration" | "method_definition" => {
            Some(NodeKind::FunctionDeclaration)
        }
        "public_field_definition" | "property_signature" => Some(NodeKind::FieldDeclaration),
        "import_statement" => Some(NodeKind::ImportDeclaration),
        "identifier" | "property_identifier" | "shorthand_property_identifier" => {
            Some(NodeKind::Identifier)
        }
        "type_identifier" => Some(NodeKind::TypeReference),
        "comment" => Some(NodeKind::Comment),
        _ => None,
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing a language identifier fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the input that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "python" | "py" => Ok(Self::Python),
            "typescript" | "ts" => Ok(Self::TypeScript),
            other => Err(LanguageParseError(other.to_owned())),
        }
    }
}
