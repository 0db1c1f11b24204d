//! Host ingestion interfaces.
//!
//! The host toolchain owns parsing and semantic resolution; the pipeline
//! consumes its output through these traits. Each root element of a round
//! offers an opaque parse-tree handle, a source location, and textual
//! content behind an ordered pair of accessors. The host also answers
//! whether the round is the terminal one, after which the pipeline does no
//! further work.

use std::fmt;

use thiserror::Error;
use url::Url;

use graft_syntax::{SupportedLanguage, TypeSource};

/// Which of the host's content access paths to read.
///
/// Reads are attempted in [`ContentAccessor::ATTEMPT_ORDER`]; the first
/// success wins and later accessors are never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentAccessor {
    /// The host's preferred byte/char content API.
    Primary,
    /// The secondary access path tried when the primary read fails.
    Fallback,
}

impl ContentAccessor {
    /// The fixed order in which accessors are attempted.
    pub const ATTEMPT_ORDER: [Self; 2] = [Self::Primary, Self::Fallback];

    /// Returns the accessor's lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ContentAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a host content read fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{accessor} content read failed for {location}: {message}")]
pub struct HostReadError {
    /// The accessor that failed.
    accessor: ContentAccessor,
    /// Location of the unit being read.
    location: String,
    /// Description of the failure.
    message: String,
}

impl HostReadError {
    /// Creates a read error.
    #[must_use]
    pub fn new(
        accessor: ContentAccessor,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            accessor,
            location: location.into(),
            message: message.into(),
        }
    }

    /// Returns the accessor that failed.
    #[must_use]
    pub const fn accessor(&self) -> ContentAccessor {
        self.accessor
    }
}

/// An opaque handle to a host parse tree.
///
/// The pipeline treats the tree as read-only input; it never re-parses or
/// edits it.
#[derive(Debug)]
pub struct HostTree {
    language: SupportedLanguage,
    tree: tree_sitter::Tree,
}

impl HostTree {
    /// Wraps a host parse tree with the language it was parsed under.
    #[must_use]
    pub const fn new(language: SupportedLanguage, tree: tree_sitter::Tree) -> Self {
        Self { language, tree }
    }

    /// Returns the language of the parse tree.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the underlying parse tree.
    #[must_use]
    pub const fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }
}

/// One root element supplied by the host for the current round.
pub trait HostUnit: Sync {
    /// Returns the unit's source location.
    fn uri(&self) -> &Url;

    /// Returns the unit's parse tree, or `None` when the element carries
    /// no compilable unit (for example a package-only file). A `None` is a
    /// skip, never an error.
    fn syntax(&self) -> Option<&HostTree>;

    /// Reads the unit's text through the given accessor.
    ///
    /// # Errors
    ///
    /// Returns a [`HostReadError`] when that access path fails; callers
    /// fall back to the next accessor in [`ContentAccessor::ATTEMPT_ORDER`].
    fn read(&self, accessor: ContentAccessor) -> Result<String, HostReadError>;
}

/// A host-triggered processing round.
pub trait SourceHost: Sync {
    /// The host's root element type.
    type Unit: HostUnit;

    /// Returns the root elements of the current round.
    fn roots(&self) -> &[Self::Unit];

    /// Returns `true` when the host has signalled the terminal round;
    /// the pipeline then performs no work.
    fn processing_over(&self) -> bool;

    /// Returns the host's type information for this round.
    fn types(&self) -> &dyn TypeSource;
}
