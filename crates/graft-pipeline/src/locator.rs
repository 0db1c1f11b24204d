//! Source unit location and content access.
//!
//! Turns a host root element into a [`SourceUnit`]: a batch-relative path
//! plus the unit's original text. Elements without a compilable unit are
//! skipped silently; content is read through the host's accessors in a
//! fixed order, falling back before giving up on the unit.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use graft_syntax::SupportedLanguage;

use crate::host::{ContentAccessor, HostTree, HostUnit};

/// Error raised when a unit's content cannot be read by any accessor.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no accessor could read {location}: {message}")]
pub struct LocateError {
    /// Location of the unreadable unit.
    location: String,
    /// Description of the last failed read.
    message: String,
}

impl LocateError {
    /// Creates a locate error.
    #[must_use]
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// A located source unit, immutable for the rest of the round.
#[derive(Debug)]
pub struct SourceUnit<'h> {
    path: PathBuf,
    text: String,
    syntax: &'h HostTree,
    uri: &'h Url,
}

impl<'h> SourceUnit<'h> {
    /// Returns the unit's batch-relative path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the unit's original text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the host parse tree handle.
    #[must_use]
    pub const fn syntax(&self) -> &'h HostTree {
        self.syntax
    }

    /// Returns the unit's source location.
    #[must_use]
    pub const fn uri(&self) -> &'h Url {
        self.uri
    }

    /// Returns the unit's language.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.syntax.language()
    }
}

/// Resolves a host root element to a source unit.
///
/// Returns `Ok(None)` when the element carries no compilable unit; that is
/// a skip, never a fatal condition.
///
/// # Errors
///
/// Returns a [`LocateError`] only when every content accessor fails.
pub fn locate<'h, U: HostUnit>(
    unit: &'h U,
    working_dir: Option<&Path>,
) -> Result<Option<SourceUnit<'h>>, LocateError> {
    let Some(syntax) = unit.syntax() else {
        return Ok(None);
    };

    let text = read_with_fallback(unit)?;
    let path = resolve_path(unit.uri(), working_dir);

    Ok(Some(SourceUnit {
        path,
        text,
        syntax,
        uri: unit.uri(),
    }))
}

/// Attempts each content accessor in order, short-circuiting on success.
fn read_with_fallback<U: HostUnit>(unit: &U) -> Result<String, LocateError> {
    let mut last_failure = None;
    for accessor in ContentAccessor::ATTEMPT_ORDER {
        match unit.read(accessor) {
            Ok(text) => return Ok(text),
            Err(error) => last_failure = Some(error),
        }
    }
    Err(LocateError::new(
        unit.uri().as_str(),
        last_failure.map_or_else(|| "no accessors attempted".to_owned(), |e| e.to_string()),
    ))
}

/// Computes the unit's batch-relative path.
///
/// Relativises the location against the working directory when both are
/// available and related; otherwise keeps the original location. A path
/// that cannot be relativised is not an error.
fn resolve_path(uri: &Url, working_dir: Option<&Path>) -> PathBuf {
    let absolute = uri
        .to_file_path()
        .unwrap_or_else(|()| PathBuf::from(uri.path()));
    let Some(base) = working_dir else {
        return absolute;
    };
    match absolute.strip_prefix(base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => absolute,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryUnit;

    fn uri(path: &str) -> Url {
        Url::parse(&format!("file://{path}")).expect("valid uri")
    }

    #[test]
    fn elements_without_units_are_skipped_not_failed() {
        let unit = MemoryUnit::without_syntax(uri("/work/package-info.rs"));
        let located = locate(&unit, None).expect("locate succeeds");
        assert!(located.is_none());
    }

    #[test]
    fn paths_are_relativised_against_the_working_directory() {
        let unit = MemoryUnit::parsed(
            uri("/work/src/main.rs"),
            SupportedLanguage::Rust,
            "fn main() {}\n",
        )
        .expect("unit parses");

        let located = locate(&unit, Some(Path::new("/work")))
            .expect("locate succeeds")
            .expect("unit located");
        assert_eq!(located.path(), Path::new("src/main.rs"));
    }

    #[test]
    fn unrelated_roots_fall_back_to_the_original_location() {
        let unit = MemoryUnit::parsed(
            uri("/elsewhere/main.rs"),
            SupportedLanguage::Rust,
            "fn main() {}\n",
        )
        .expect("unit parses");

        let located = locate(&unit, Some(Path::new("/work")))
            .expect("locate succeeds")
            .expect("unit located");
        assert_eq!(located.path(), Path::new("/elsewhere/main.rs"));
    }

    #[test]
    fn fallback_accessor_rescues_a_failing_primary() {
        let unit = MemoryUnit::parsed(
            uri("/work/a.rs"),
            SupportedLanguage::Rust,
            "fn main() {}\n",
        )
        .expect("unit parses")
        .with_failing_primary();

        let located = locate(&unit, None)
            .expect("locate succeeds")
            .expect("unit located");
        assert_eq!(located.text(), "fn main() {}\n");
    }

    #[test]
    fn all_accessors_failing_gives_up_on_the_unit() {
        // Applying the failure twice drains both accessors.
        let unreadable = MemoryUnit::parsed(
            uri("/work/a.rs"),
            SupportedLanguage::Rust,
            "fn main() {}\n",
        )
        .expect("unit parses")
        .with_failing_primary()
        .with_failing_primary();

        assert!(locate(&unreadable, None).is_err());
    }
}
