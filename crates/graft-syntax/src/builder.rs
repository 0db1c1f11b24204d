//! Lossless mirror construction from host parse trees.
//!
//! The builder walks a host-supplied Tree-sitter tree in source order and
//! reconstructs it as a [`MirrorTree`]. At each node it captures the exact
//! inter-token text preceding the node as that node's leading formatting,
//! resolves referenced types through the round's [`TypeInterner`], and
//! recurses into children. Any text a grammar leaves uncovered by child
//! nodes is preserved as a trailing fragment, so serialisation is always
//! byte-exact.

use std::sync::Arc;

use crate::error::MirrorError;
use crate::language::SupportedLanguage;
use crate::style::NamedStyle;
use crate::tree::{MirrorNode, MirrorTree, NodeKind};
use crate::types::{TypeInterner, TypeSource};

/// Builds mirror trees for one source unit.
///
/// A builder borrows the unit's text and the round-scoped interner; it is
/// cheap to construct per unit and holds no mutable state of its own.
pub struct TreeBuilder<'a> {
    language: SupportedLanguage,
    source: &'a str,
    location: &'a str,
    styles: Arc<[NamedStyle]>,
    interner: &'a TypeInterner,
    types: &'a dyn TypeSource,
}

impl<'a> TreeBuilder<'a> {
    /// Creates a builder for a unit's text.
    ///
    /// `styles` are attached at the resulting tree's root; they do not
    /// alter the formatting captured from `source`.
    #[must_use]
    pub fn new(
        language: SupportedLanguage,
        source: &'a str,
        location: &'a str,
        styles: Arc<[NamedStyle]>,
        interner: &'a TypeInterner,
        types: &'a dyn TypeSource,
    ) -> Self {
        Self {
            language,
            source,
            location,
            styles,
            interner,
            types,
        }
    }

    /// Mirrors a host parse tree into a lossless [`MirrorTree`].
    ///
    /// # Errors
    ///
    /// Returns a [`MirrorError`] when the host tree contains a shape the
    /// builder cannot mirror, typically because the tree was parsed from
    /// text other than this unit's content.
    pub fn build(&self, tree: &tree_sitter::Tree) -> Result<MirrorTree, MirrorError> {
        let mut offset = 0usize;
        let root = self.mirror_node(tree.root_node(), &mut offset)?;
        let trailing = self.slice(offset, self.source.len(), "end-of-file")?;
        Ok(MirrorTree::new(
            Arc::new(root),
            trailing,
            self.location,
            Arc::clone(&self.styles),
        ))
    }

    fn mirror_node(
        &self,
        node: tree_sitter::Node<'_>,
        offset: &mut usize,
    ) -> Result<MirrorNode, MirrorError> {
        let start = node.start_byte();
        let end = node.end_byte();
        if start < *offset || end < start {
            return Err(MirrorError::mapping(
                self.location,
                format!(
                    "node '{}' at {start}..{end} overlaps already-mirrored text ending at {offset}",
                    node.kind()
                ),
            ));
        }

        let kind = self.language.classify(node.kind(), node.is_named());

        if node.is_missing() {
            // Zero-width: the grammar inferred a token the source lacks.
            return Ok(MirrorNode::synthetic(kind, node.kind()));
        }

        let leading = self.slice(*offset, start, node.kind())?;
        *offset = start;

        if node.child_count() == 0 {
            let text = self.slice(start, end, node.kind())?;
            *offset = end;
            return Ok(self.mirror_token(kind, node.kind(), leading, text));
        }

        let mut children = Vec::with_capacity(node.child_count());
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            children.push(Arc::new(self.mirror_node(child, offset)?));
        }
        if *offset < end {
            // Text owned by this node but surfaced by no child; keep it as
            // an anonymous fragment so the mirror stays byte-exact.
            let residue = self.slice(*offset, end, node.kind())?;
            *offset = end;
            children.push(Arc::new(MirrorNode::token(
                NodeKind::Token,
                node.kind(),
                "",
                residue,
            )));
        }

        Ok(MirrorNode::interior(kind, node.kind(), leading, children))
    }

    fn mirror_token(
        &self,
        kind: NodeKind,
        grammar_kind: &str,
        leading: String,
        text: String,
    ) -> MirrorNode {
        let node = MirrorNode::token(kind, grammar_kind, leading, text);
        if kind != NodeKind::TypeReference {
            return node;
        }
        match node.text().and_then(|name| self.types.qualify(name)) {
            Some(qualified) => {
                let descriptor = self.interner.resolve(&qualified, self.types);
                node.with_resolved_type(descriptor)
            }
            None => node,
        }
    }

    fn slice(&self, start: usize, end: usize, grammar_kind: &str) -> Result<String, MirrorError> {
        self.source
            .get(start..end)
            .map(str::to_owned)
            .ok_or_else(|| {
                MirrorError::span_out_of_bounds(self.location, grammar_kind, start, end)
            })
    }
}
