//! The lossless Mirror Tree.
//!
//! A [`MirrorTree`] is an immutable structured mirror of one host parse
//! tree. Every node carries the exact inter-token text that precedes it, so
//! serialising an unmodified tree reproduces the unit's original text
//! byte-for-byte. Transformations never mutate a tree in place; they build
//! replacement nodes and share the untouched remainder through [`Arc`]s.

use std::fmt;
use std::sync::Arc;

use crate::style::NamedStyle;
use crate::types::TypeDescriptor;

/// Semantic category of a mirror node.
///
/// Kinds mirror the source grammar at the granularity recipes care about;
/// the raw grammar kind string is retained alongside for anything finer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum NodeKind {
    /// The root of a compilation unit.
    SourceFile,
    /// A named type declaration (class, struct, enum, trait, interface).
    TypeDeclaration,
    /// A function or method declaration.
    FunctionDeclaration,
    /// A field or property declaration inside a type.
    FieldDeclaration,
    /// An import/use declaration.
    ImportDeclaration,
    /// A statement.
    Statement,
    /// An expression.
    Expression,
    /// An identifier in a value position.
    Identifier,
    /// An identifier in a type position.
    TypeReference,
    /// A comment surfaced as its own node by the grammar.
    Comment,
    /// A bare token: punctuation, keywords, literals' fragments.
    Token,
    /// A named grammar node with no finer classification.
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::SourceFile => "source-file",
            Self::TypeDeclaration => "type-declaration",
            Self::FunctionDeclaration => "function-declaration",
            Self::FieldDeclaration => "field-declaration",
            Self::ImportDeclaration => "import-declaration",
            Self::Statement => "statement",
            Self::Expression => "expression",
            Self::Identifier => "identifier",
            Self::TypeReference => "type-reference",
            Self::Comment => "comment",
            Self::Token => "token",
            Self::Other => "other",
        };
        f.write_str(label)
    }
}

/// One node of a mirror tree.
///
/// Nodes are either tokens (carrying their exact source text) or interior
/// nodes (carrying children in source order). Both carry the formatting
/// span that precedes them. Synthetic nodes have no source representation;
/// they serialise from whatever formatting a recipe assigned them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorNode {
    kind: NodeKind,
    grammar_kind: String,
    leading: String,
    text: Option<String>,
    children: Vec<Arc<MirrorNode>>,
    synthetic: bool,
    resolved_type: Option<Arc<TypeDescriptor>>,
}

impl MirrorNode {
    /// Creates a token node with its leading formatting and exact text.
    #[must_use]
    pub fn token(
        kind: NodeKind,
        grammar_kind: impl Into<String>,
        leading: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            grammar_kind: grammar_kind.into(),
            leading: leading.into(),
            text: Some(text.into()),
            children: Vec::new(),
            synthetic: false,
            resolved_type: None,
        }
    }

    /// Creates an interior node with its leading formatting and children.
    #[must_use]
    pub fn interior(
        kind: NodeKind,
        grammar_kind: impl Into<String>,
        leading: impl Into<String>,
        children: Vec<Arc<Self>>,
    ) -> Self {
        Self {
            kind,
            grammar_kind: grammar_kind.into(),
            leading: leading.into(),
            text: None,
            children,
            synthetic: false,
            resolved_type: None,
        }
    }

    /// Creates a synthetic token with empty formatting.
    ///
    /// Synthetic nodes mirror host constructs with no source-level
    /// representation; recipes may skip them or assign default formatting
    /// when modifying them.
    #[must_use]
    pub fn synthetic(kind: NodeKind, grammar_kind: impl Into<String>) -> Self {
        Self {
            kind,
            grammar_kind: grammar_kind.into(),
            leading: String::new(),
            text: Some(String::new()),
            children: Vec::new(),
            synthetic: true,
            resolved_type: None,
        }
    }

    /// Returns the semantic kind of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the grammar's raw kind string.
    #[must_use]
    pub fn grammar_kind(&self) -> &str {
        &self.grammar_kind
    }

    /// Returns the formatting span preceding this node.
    #[must_use]
    pub fn leading(&self) -> &str {
        &self.leading
    }

    /// Returns the token text, or `None` for interior nodes.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the children of this node in source order.
    #[must_use]
    pub fn children(&self) -> &[Arc<Self>] {
        &self.children
    }

    /// Returns whether this node has no source-level representation.
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// Returns the interned type descriptor resolved for this node, if any.
    #[must_use]
    pub fn resolved_type(&self) -> Option<&Arc<TypeDescriptor>> {
        self.resolved_type.as_ref()
    }

    /// Returns a copy of this node with different token text.
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        let mut node = self.clone();
        node.text = Some(text.into());
        node
    }

    /// Returns a copy of this node with different leading formatting.
    #[must_use]
    pub fn with_leading(&self, leading: impl Into<String>) -> Self {
        let mut node = self.clone();
        node.leading = leading.into();
        node
    }

    /// Returns a copy of this node with different children.
    #[must_use]
    pub fn with_children(&self, children: Vec<Arc<Self>>) -> Self {
        let mut node = self.clone();
        node.children = children;
        node
    }

    /// Returns a copy of this node with an interned type descriptor.
    #[must_use]
    pub fn with_resolved_type(&self, descriptor: Arc<TypeDescriptor>) -> Self {
        let mut node = self.clone();
        node.resolved_type = Some(descriptor);
        node
    }

    /// Serialises this node and its descendants into `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.leading);
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.write_to(out);
        }
    }
}

/// The lossless mirror of one source unit.
#[derive(Debug, Clone)]
pub struct MirrorTree {
    root: Arc<MirrorNode>,
    trailing: String,
    location: String,
    styles: Arc<[NamedStyle]>,
}

impl MirrorTree {
    /// Creates a mirror tree from its root node.
    ///
    /// `trailing` is any text following the final token of the unit;
    /// `styles` are the formatting conventions attached at the root, which
    /// never alter captured formatting and are consulted only when recipes
    /// synthesise new code.
    #[must_use]
    pub fn new(
        root: Arc<MirrorNode>,
        trailing: impl Into<String>,
        location: impl Into<String>,
        styles: Arc<[NamedStyle]>,
    ) -> Self {
        Self {
            root,
            trailing: trailing.into(),
            location: location.into(),
            styles,
        }
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &Arc<MirrorNode> {
        &self.root
    }

    /// Returns the text following the unit's final token.
    #[must_use]
    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// Returns the location of the unit this tree mirrors.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the styles attached at the root.
    #[must_use]
    pub fn styles(&self) -> &[NamedStyle] {
        &self.styles
    }

    /// Returns a tree sharing this one's metadata with a replacement root.
    #[must_use]
    pub fn with_root(&self, root: Arc<MirrorNode>) -> Self {
        Self {
            root,
            trailing: self.trailing.clone(),
            location: self.location.clone(),
            styles: Arc::clone(&self.styles),
        }
    }

    /// Serialises the tree back to source text.
    ///
    /// For a tree built from a host parse and not yet transformed, the
    /// output equals the unit's original text byte-for-byte.
    #[must_use]
    pub fn serialise(&self) -> String {
        let mut out = String::new();
        self.root.write_to(&mut out);
        out.push_str(&self.trailing);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(leading: &str, text: &str) -> Arc<MirrorNode> {
        Arc::new(MirrorNode::token(NodeKind::Token, "tok", leading, text))
    }

    #[test]
    fn serialise_concatenates_leading_and_text_in_order() {
        let root = Arc::new(MirrorNode::interior(
            NodeKind::SourceFile,
            "source_file",
            "",
            vec![token("", "fn"), token(" ", "main"), token("", "()")],
        ));
        let tree = MirrorTree::new(root, "\n", "unit.rs", Arc::from([]));

        assert_eq!(tree.serialise(), "fn main()\n");
    }

    #[test]
    fn synthetic_nodes_serialise_to_nothing_by_default() {
        let synthetic = Arc::new(MirrorNode::synthetic(NodeKind::Token, "tok"));
        let root = Arc::new(MirrorNode::interior(
            NodeKind::SourceFile,
            "source_file",
            "",
            vec![token("", "x"), synthetic],
        ));
        let tree = MirrorTree::new(root, "", "unit.rs", Arc::from([]));

        assert_eq!(tree.serialise(), "x");
    }

    #[test]
    fn with_text_preserves_leading_formatting() {
        let node = MirrorNode::token(NodeKind::Identifier, "identifier", "  ", "old");
        let renamed = node.with_text("new");

        assert_eq!(renamed.leading(), "  ");
        assert_eq!(renamed.text(), Some("new"));
        assert_eq!(renamed.kind(), NodeKind::Identifier);
    }

    #[test]
    fn with_root_shares_trailing_and_styles() {
        let tree = MirrorTree::new(token("", "a"), "\n", "unit.rs", Arc::from([]));
        let replaced = tree.with_root(token("", "b"));

        assert_eq!(replaced.serialise(), "b\n");
        assert_eq!(replaced.location(), "unit.rs");
    }
}
