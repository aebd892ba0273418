//! Stages (knockout bracket or round-robin groups) and groups.

use crate::models::game::{GameMatch, GroupId, StageId};
use crate::models::participant::ParticipantId;
use crate::models::standing::{StandingRow, TieBreakRule};
use serde::{Deserialize, Serialize};

/// A closed pool of participants playing round-robin.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub participants: Vec<ParticipantId>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

impl Group {
    /// Ranking of the group's participants. Not stored: computed from the matches each call.
    pub fn standings(&self, rules: &[TieBreakRule], seed: u64) -> Vec<StandingRow> {
        crate::logic::compute_standings(&self.participants, &self.matches, rules, seed)
    }
}

/// Phase-specific content of a stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageKind {
    /// One single-elimination bracket.
    Knockout { matches: Vec<GameMatch> },
    Group { groups: Vec<Group> },
}

/// A named phase of the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub name: String,
    pub kind: StageKind,
}

impl Stage {
    pub fn knockout(id: StageId, name: impl Into<String>, matches: Vec<GameMatch>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: StageKind::Knockout { matches },
        }
    }

    pub fn groups(id: StageId, name: impl Into<String>, groups: Vec<Group>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: StageKind::Group { groups },
        }
    }

    /// Every match of the stage, groups flattened in order.
    pub fn matches(&self) -> Vec<&GameMatch> {
        match &self.kind {
            StageKind::Knockout { matches } => matches.iter().collect(),
            StageKind::Group { groups } => groups.iter().flat_map(|g| g.matches.iter()).collect(),
        }
    }

    /// Knockout matches with winners propagated; `None` for group stages.
    pub fn bracket(&self) -> Option<Vec<GameMatch>> {
        match &self.kind {
            StageKind::Knockout { matches } => Some(crate::logic::resolve_advancement(matches)),
            StageKind::Group { .. } => None,
        }
    }
}
