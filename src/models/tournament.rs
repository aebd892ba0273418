//! Tournament snapshot: participants, stages and ranking settings.

use crate::models::game::GameMatch;
use crate::models::participant::{Participant, ParticipantId};
use crate::models::stage::Stage;
use crate::models::standing::{TieBreakRule, DEFAULT_TIE_BREAK_RULES};
use serde::{Deserialize, Serialize};

/// Unique identifier for a tournament.
pub type TournamentId = u64;

fn default_tie_break_rules() -> Vec<TieBreakRule> {
    DEFAULT_TIE_BREAK_RULES.to_vec()
}

/// Read-only snapshot of a tournament, taken atomically from the store.
///
/// Derived views (brackets, standings, warnings) are computed from it and never
/// written back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    /// Ranking rules for group stages, in order.
    #[serde(default = "default_tie_break_rules")]
    pub tie_break_rules: Vec<TieBreakRule>,
    /// Seed for the `RANDOM` tie-break, fixed per tournament so rankings are reproducible.
    #[serde(default)]
    pub seed: u64,
}

impl Tournament {
    pub fn new(id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            participants: Vec::new(),
            stages: Vec::new(),
            tie_break_rules: default_tie_break_rules(),
            seed: 0,
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Every match across all stages, in stage order.
    pub fn all_matches(&self) -> Vec<&GameMatch> {
        self.stages.iter().flat_map(|s| s.matches()).collect()
    }
}
