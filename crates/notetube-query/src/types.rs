//! Generative call outcomes.

/// Result of one generation request. Degraded paths are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The model answered with non-blank text.
    Generated(String),
    /// The model answered, but with nothing usable.
    Empty,
    /// Timeout, connection failure, or an error status.
    Unavailable(String),
}

impl GenerateOutcome {
    /// Classify raw model output.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Generated(text)
        }
    }
}
