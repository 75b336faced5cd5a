//! Run mode and document phase enums
//!
//! Both parse with an explicit unknown-key error so an invalid value fails
//! before any budget is spent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level pipeline selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Full review pipeline: independent reviews, cross-scoring, consensus
    #[default]
    Review,
    /// Delegate to the external attack-surface pipeline
    RedTeam,
    /// Three parallel perspective queries, synthesized without cross-scoring
    Inquiry,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Review => "review",
            RunMode::RedTeam => "red-team",
            RunMode::Inquiry => "inquiry",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "review" => Ok(RunMode::Review),
            "red-team" | "redteam" | "red_team" => Ok(RunMode::RedTeam),
            "inquiry" => Ok(RunMode::Inquiry),
            _ => Err(format!(
                "unknown mode: {}. Valid: review, red-team, inquiry",
                s
            )),
        }
    }
}

/// Kind of planning artifact under review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentPhase {
    Prd,
    Sdd,
    Sprint,
    Beads,
    Spec,
}

impl DocumentPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentPhase::Prd => "prd",
            DocumentPhase::Sdd => "sdd",
            DocumentPhase::Sprint => "sprint",
            DocumentPhase::Beads => "beads",
            DocumentPhase::Spec => "spec",
        }
    }
}

impl fmt::Display for DocumentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prd" => Ok(DocumentPhase::Prd),
            "sdd" => Ok(DocumentPhase::Sdd),
            "sprint" => Ok(DocumentPhase::Sprint),
            "beads" => Ok(DocumentPhase::Beads),
            "spec" => Ok(DocumentPhase::Spec),
            _ => Err(format!(
                "unknown document phase: {}. Valid: prd, sdd, sprint, beads, spec",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("review".parse::<RunMode>().ok(), Some(RunMode::Review));
        assert_eq!("red-team".parse::<RunMode>().ok(), Some(RunMode::RedTeam));
        assert_eq!("redteam".parse::<RunMode>().ok(), Some(RunMode::RedTeam));
        assert_eq!("INQUIRY".parse::<RunMode>().ok(), Some(RunMode::Inquiry));
        assert!("audit".parse::<RunMode>().is_err());
    }

    #[test]
    fn test_document_phase_parse() {
        assert_eq!("prd".parse::<DocumentPhase>().ok(), Some(DocumentPhase::Prd));
        assert_eq!("beads".parse::<DocumentPhase>().ok(), Some(DocumentPhase::Beads));
        assert!("rfc".parse::<DocumentPhase>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(RunMode::RedTeam.to_string(), "red-team");
        assert_eq!(DocumentPhase::Sdd.to_string(), "sdd");
    }
}
