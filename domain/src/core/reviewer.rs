//! Reviewer identity

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an independent reviewer in the council.
///
/// Reviewer ids are opaque strings configured by the operator (e.g.
/// `"gpt-5.2-codex"`, `"claude-sonnet-4.5"`). The engine never interprets
/// them beyond equality and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerId(String);

impl ReviewerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get a short display name for the reviewer
    ///
    /// E.g., "claude-sonnet-4.5" -> "claude"
    pub fn short_name(&self) -> &str {
        self.0.split(['-', '_']).next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReviewerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name() {
        assert_eq!(ReviewerId::new("claude-sonnet-4.5").short_name(), "claude");
        assert_eq!(ReviewerId::new("gpt_5_codex").short_name(), "gpt");
        assert_eq!(ReviewerId::new("solo").short_name(), "solo");
    }

    #[test]
    fn test_display_roundtrip() {
        let id = ReviewerId::new("gemini-3-pro");
        assert_eq!(id.to_string(), "gemini-3-pro");
        assert_eq!(id.as_str(), "gemini-3-pro");
    }
}
