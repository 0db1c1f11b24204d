//! Formatting styles attached to mirror trees.
//!
//! Styles are conventions, not captured formatting: building a mirror tree
//! records the unit's verbatim whitespace regardless of any style, and
//! styles are consulted only when a recipe inserts code that has no
//! original formatting to preserve.

/// Indentation convention for synthesised code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    use_tabs: bool,
    width: usize,
}

impl IndentStyle {
    /// Creates a space-indentation style of the given width.
    #[must_use]
    pub const fn spaces(width: usize) -> Self {
        Self {
            use_tabs: false,
            width,
        }
    }

    /// Creates a tab-indentation style.
    #[must_use]
    pub const fn tabs() -> Self {
        Self {
            use_tabs: true,
            width: 1,
        }
    }

    /// Returns one unit of indentation under this style.
    #[must_use]
    pub fn unit(&self) -> String {
        if self.use_tabs {
            "\t".repeat(self.width)
        } else {
            " ".repeat(self.width)
        }
    }
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self::spaces(4)
    }
}

/// A named set of formatting conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStyle {
    name: String,
    indent: IndentStyle,
}

impl NamedStyle {
    /// Creates a named style.
    #[must_use]
    pub fn new(name: impl Into<String>, indent: IndentStyle) -> Self {
        Self {
            name: name.into(),
            indent,
        }
    }

    /// Returns the style's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the indentation convention.
    #[must_use]
    pub const fn indent(&self) -> IndentStyle {
        self.indent
    }
}
