//! Round diagnostics.
//!
//! Every failure inside the pipeline is converted into a [`Diagnostic`] at
//! the smallest unit of work and surfaced through the host's standard
//! messaging channel (here: `tracing`) at a matching severity. No
//! diagnostic ever fails the host's build.

use serde::Serialize;

/// Severity of a diagnostic, mirroring the host's messaging levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note.
    Note,
    /// A recoverable problem worth the user's attention.
    Warning,
    /// A failure that excluded a unit or artifact from the round.
    Error,
}

/// One message surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    location: Option<String>,
    message: String,
}

impl Diagnostic {
    /// Creates an informational note.
    #[must_use]
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            location: None,
            message: message.into(),
        }
    }

    /// Creates a warning.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: None,
            message: message.into(),
        }
    }

    /// Creates an error.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: None,
            message: message.into(),
        }
    }

    /// Attaches the location of the unit the diagnostic concerns.
    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the unit location, if the diagnostic concerns one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Surfaces the diagnostic through the tracing channel.
    pub fn emit(&self) {
        let location = self.location.as_deref().unwrap_or("");
        match self.severity {
            Severity::Note => tracing::info!(location, "{}", self.message),
            Severity::Warning => tracing::warn!(location, "{}", self.message),
            Severity::Error => tracing::error!(location, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_is_attached_and_reported() {
        let diagnostic = Diagnostic::warning("mapping failed").at("src/a.rs");
        assert_eq!(diagnostic.severity(), Severity::Warning);
        assert_eq!(diagnostic.location(), Some("src/a.rs"));
    }

    #[test]
    fn diagnostics_serialise_for_structured_sinks() {
        let diagnostic = Diagnostic::error("unable to map unit").at("src/a.rs");
        let json = serde_json::to_string(&diagnostic).expect("serialises");
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("src/a.rs"));
    }
}
