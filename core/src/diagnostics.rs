//! Diagnostics for corrections made during schema normalization.
//!
//! Normalization never aborts on inconsistent constraints. It rewrites them
//! into a consistent form and reports each finding through a [`Notifier`].
//! [`Diagnostics`] is the standard notifier: it records findings in order.

use std::fmt;

use serde::Serialize;
use tracing::{error, warn};

/// Severity of a normalization finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A property was ignored without changing the meaning of the schema.
    Warning,
    /// A property was inconsistent and has been corrected.
    Error,
}

/// One finding reported during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path of the nested schema, empty for the root (e.g. `items`).
    pub location: String,
    pub message: String,
    /// The corrective action taken, for error findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.location.is_empty() {
            write!(f, "{}: ", self.location)?;
        }
        f.write_str(&self.message)?;
        if let Some(resolution) = &self.resolution {
            write!(f, ". {resolution}")?;
        }
        Ok(())
    }
}

/// Receives normalization findings.
pub trait Notifier {
    /// Reports a property that was ignored.
    fn notify_warning(&mut self, location: &str, message: &str);

    /// Reports an inconsistency and the correction applied to it.
    fn notify_error(&mut self, location: &str, message: &str, resolution: &str);
}

/// Ordered collection of findings.
///
/// # Examples
///
/// ```
/// use valuegen_core::{Diagnostics, Notifier, Severity};
///
/// let mut diagnostics = Diagnostics::new();
/// diagnostics.notify_error("items", "minItems=5 is greater than maxItems=2", "Adjusting minItems to maxItems");
///
/// assert!(diagnostics.has_errors());
/// assert_eq!(diagnostics.iter().next().unwrap().severity, Severity::Error);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns `true` if any finding has [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }

    /// Emits every finding as a `tracing` event.
    pub fn report(&self) {
        for diagnostic in &self.entries {
            match diagnostic.severity {
                Severity::Warning => warn!(location = %diagnostic.location, "{}", diagnostic.message),
                Severity::Error => error!(
                    location = %diagnostic.location,
                    resolution = diagnostic.resolution.as_deref().unwrap_or(""),
                    "{}",
                    diagnostic.message
                ),
            }
        }
    }
}

impl Notifier for Diagnostics {
    fn notify_warning(&mut self, location: &str, message: &str) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            location: location.to_string(),
            message: message.to_string(),
            resolution: None,
        });
    }

    fn notify_error(&mut self, location: &str, message: &str, resolution: &str) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            location: location.to_string(),
            message: message.to_string(),
            resolution: Some(resolution.to_string()),
        });
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_keep_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.notify_warning("", "first");
        diagnostics.notify_error("items", "second", "fixed");

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_warnings_alone_are_not_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.notify_warning("", "ignored");
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn test_display_includes_location_and_resolution() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.notify_error("items", "minLength=9 is greater than maxLength=3", "Adjusting minLength to maxLength");

        let shown = diagnostics.iter().next().unwrap().to_string();
        assert_eq!(
            shown,
            "items: minLength=9 is greater than maxLength=3. Adjusting minLength to maxLength"
        );
    }
}
