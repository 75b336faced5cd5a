//! Reviewer id to command routing
//!
//! The roster is the only place a reviewer id resolves to something
//! executable. Lookup failures are explicit errors, never a silent
//! fallthrough to some default command.

use crate::config::file_config::CommandSpec;
use council_domain::ReviewerId;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("no command configured for reviewer '{0}'")]
    UnknownReviewer(ReviewerId),

    #[error("reviewer '{reviewer}' command '{program}' not found on PATH")]
    MissingProgram { reviewer: ReviewerId, program: String },
}

/// Maps each reviewer in the roster to the command that backs it.
#[derive(Debug, Clone, Default)]
pub struct CommandRoster {
    commands: HashMap<ReviewerId, CommandSpec>,
}

impl CommandRoster {
    pub fn new(commands: HashMap<ReviewerId, CommandSpec>) -> Self {
        Self { commands }
    }

    pub fn from_config(commands: &HashMap<String, CommandSpec>) -> Self {
        Self {
            commands: commands
                .iter()
                .map(|(id, spec)| (ReviewerId::new(id), spec.clone()))
                .collect(),
        }
    }

    pub fn insert(&mut self, reviewer: ReviewerId, spec: CommandSpec) {
        self.commands.insert(reviewer, spec);
    }

    pub fn resolve(&self, reviewer: &ReviewerId) -> Result<&CommandSpec, RosterError> {
        self.commands
            .get(reviewer)
            .ok_or_else(|| RosterError::UnknownReviewer(reviewer.clone()))
    }

    /// Check that every roster entry resolves to a command that exists on
    /// PATH. Run before dispatch so a broken roster fails with zero spend.
    pub fn verify(&self, reviewers: &[ReviewerId]) -> Result<(), RosterError> {
        for reviewer in reviewers {
            let spec = self.resolve(reviewer)?;
            if which::which(&spec.program).is_err() {
                return Err(RosterError::MissingProgram {
                    reviewer: reviewer.clone(),
                    program: spec.program.clone(),
                });
            }
        }
        Ok(())
    }
}
