//! Run phase state machine
//!
//! The review pipeline walks INIT → KNOWLEDGE → PHASE1 → PHASE2 → CONSENSUS
//! → INTEGRATE → DONE. Red-team and inquiry are alternate terminal graphs
//! entered directly from INIT. Transitions are forward-only; DONE is
//! reachable from any phase so zero-quorum short-circuits are legal moves.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Init,
    Knowledge,
    Phase1,
    Phase2,
    Consensus,
    Integrate,
    RedTeam,
    Inquiry,
    Done,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Init => "init",
            RunPhase::Knowledge => "knowledge",
            RunPhase::Phase1 => "phase1",
            RunPhase::Phase2 => "phase2",
            RunPhase::Consensus => "consensus",
            RunPhase::Integrate => "integrate",
            RunPhase::RedTeam => "red_team",
            RunPhase::Inquiry => "inquiry",
            RunPhase::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RunPhase::Done)
    }

    /// Whether `next` is a legal forward transition from this phase.
    ///
    /// Skips are legal (KNOWLEDGE is optional; PHASE2/CONSENSUS may be
    /// dropped on budget denial), backward moves are not. DONE is reachable
    /// from anywhere for short-circuits.
    pub fn can_advance_to(&self, next: RunPhase) -> bool {
        if next == RunPhase::Done {
            return !self.is_terminal();
        }

        matches!(
            (self, next),
            (RunPhase::Init, RunPhase::Knowledge)
                | (RunPhase::Init, RunPhase::Phase1)
                | (RunPhase::Init, RunPhase::RedTeam)
                | (RunPhase::Init, RunPhase::Inquiry)
                | (RunPhase::Knowledge, RunPhase::Phase1)
                | (RunPhase::Phase1, RunPhase::Phase2)
                | (RunPhase::Phase1, RunPhase::Integrate)
                | (RunPhase::Phase2, RunPhase::Consensus)
                | (RunPhase::Phase2, RunPhase::Integrate)
                | (RunPhase::Consensus, RunPhase::Integrate)
        )
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_graph_forward() {
        assert!(RunPhase::Init.can_advance_to(RunPhase::Knowledge));
        assert!(RunPhase::Knowledge.can_advance_to(RunPhase::Phase1));
        assert!(RunPhase::Phase1.can_advance_to(RunPhase::Phase2));
        assert!(RunPhase::Phase2.can_advance_to(RunPhase::Consensus));
        assert!(RunPhase::Consensus.can_advance_to(RunPhase::Integrate));
        assert!(RunPhase::Integrate.can_advance_to(RunPhase::Done));
    }

    #[test]
    fn test_skips_are_legal() {
        // --skip-knowledge
        assert!(RunPhase::Init.can_advance_to(RunPhase::Phase1));
        // budget denial drops phase2 and consensus
        assert!(RunPhase::Phase1.can_advance_to(RunPhase::Integrate));
        assert!(RunPhase::Phase2.can_advance_to(RunPhase::Integrate));
    }

    #[test]
    fn test_backward_is_illegal() {
        assert!(!RunPhase::Phase2.can_advance_to(RunPhase::Phase1));
        assert!(!RunPhase::Consensus.can_advance_to(RunPhase::Knowledge));
        assert!(!RunPhase::Phase1.can_advance_to(RunPhase::Init));
        assert!(!RunPhase::Done.can_advance_to(RunPhase::Done));
    }

    #[test]
    fn test_alternate_graphs_from_init_only() {
        assert!(RunPhase::Init.can_advance_to(RunPhase::RedTeam));
        assert!(RunPhase::Init.can_advance_to(RunPhase::Inquiry));
        assert!(!RunPhase::Phase1.can_advance_to(RunPhase::RedTeam));
        assert!(!RunPhase::Knowledge.can_advance_to(RunPhase::Inquiry));
    }

    #[test]
    fn test_short_circuit_to_done() {
        assert!(RunPhase::Phase1.can_advance_to(RunPhase::Done));
        assert!(RunPhase::RedTeam.can_advance_to(RunPhase::Done));
        assert!(RunPhase::Inquiry.can_advance_to(RunPhase::Done));
    }
}
