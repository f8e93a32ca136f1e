//! Error types for domain validation.

use std::collections::BTreeMap;
use thiserror::Error;

/// A request failed validation.
///
/// Messages are grouped per field so callers can render them next to the
/// offending input. Field names use the wire (camelCase) spelling.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("One or more validation errors occurred: {}", self.summary())]
pub struct ValidationError {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Create an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error with a single field message.
    #[must_use]
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.push(field, message);
        error
    }

    /// Record a message against a field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` when no messages were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages recorded for one field.
    #[must_use]
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// All messages, keyed by field.
    #[must_use]
    pub const fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Consume the error and return the field map.
    #[must_use]
    pub fn into_errors(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn summary(&self) -> String {
        self.errors
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = ValidationError::field("description", "Too short.");
        assert_eq!(
            err.to_string(),
            "One or more validation errors occurred: Too short."
        );
        assert_eq!(err.messages_for("description"), ["Too short."]);
        assert!(err.messages_for("priority").is_empty());
    }

    #[test]
    fn test_empty_into_result() {
        assert!(ValidationError::new().into_result().is_ok());

        let mut err = ValidationError::new();
        err.push("pageSize", "bad");
        err.push("pageSize", "worse");
        let Err(err) = err.into_result() else {
            unreachable!("non-empty error must be returned");
        };
        assert_eq!(err.messages_for("pageSize").len(), 2);
    }
}
