//! Error types for mirror-tree construction.
//!
//! A mirror build fails only when the host tree cannot be reproduced
//! byte-exactly from the unit's text; every failure carries the location of
//! the originating unit so the pipeline can report it without aborting the
//! round.

use thiserror::Error;

/// Errors raised while mirroring a host parse tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MirrorError {
    /// The host tree contains a shape the builder cannot mirror.
    #[error("cannot mirror host tree at {location}: {message}")]
    Mapping {
        /// Location of the unit whose tree failed to map.
        location: String,
        /// Description of the unmappable shape.
        message: String,
    },

    /// A node span does not fall on valid boundaries of the unit's text.
    ///
    /// This is the usual symptom of a host handing the builder a tree that
    /// was parsed from different text than the unit's content accessors
    /// return.
    #[error("node span {start}..{end} is invalid for {location} ({grammar_kind})")]
    SpanOutOfBounds {
        /// Location of the unit whose tree failed to map.
        location: String,
        /// Raw grammar kind of the offending node.
        grammar_kind: String,
        /// Start byte of the invalid span.
        start: usize,
        /// End byte of the invalid span.
        end: usize,
    },
}

impl MirrorError {
    /// Creates a mapping error.
    #[must_use]
    pub fn mapping(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mapping {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a span-out-of-bounds error.
    #[must_use]
    pub fn span_out_of_bounds(
        location: impl Into<String>,
        grammar_kind: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Self {
        Self::SpanOutOfBounds {
            location: location.into(),
            grammar_kind: grammar_kind.into(),
            start,
            end,
        }
    }

    /// Returns the location of the unit the error originated in.
    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            Self::Mapping { location, .. } | Self::SpanOutOfBounds { location, .. } => location,
        }
    }
}
