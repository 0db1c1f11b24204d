//! Lossless syntactic mirroring for the Graft transformation pipeline.
//!
//! This crate rebuilds host-supplied parse trees into immutable
//! [`MirrorTree`]s that preserve every whitespace and comment span, so that
//! re-serialising an unmodified tree reproduces the unit's original text
//! byte-for-byte. It also owns the round-scoped [`TypeInterner`] that keeps
//! type identity consistent across an entire batch of units.
//!
//! # Example: mirroring a parsed unit
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use graft_syntax::{NoTypeInfo, SupportedLanguage, TreeBuilder, TypeInterner};
//!
//! let source = "fn main() {}\n";
//! let mut parser = tree_sitter::Parser::new();
//! parser.set_language(&SupportedLanguage::Rust.grammar())?;
//! let parsed = parser.parse(source, None).expect("host parse");
//!
//! let interner = TypeInterner::new();
//! let builder = TreeBuilder::new(
//!     SupportedLanguage::Rust,
//!     source,
//!     "src/main.rs",
//!     Arc::from([]),
//!     &interner,
//!     &NoTypeInfo,
//! );
//! let mirror = builder.build(&parsed)?;
//! assert_eq!(mirror.serialise(), source);
//! ```

mod builder;
mod error;
mod language;
mod style;
mod tree;
mod types;

pub use builder::TreeBuilder;
pub use error::MirrorError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use style::{IndentStyle, NamedStyle};
pub use tree::{MirrorNode, MirrorTree, NodeKind};
pub use types::{
    NoTypeInfo, TypeDescriptor, TypeInterner, TypeKind, TypeMember, TypeShape, TypeSource,
};
