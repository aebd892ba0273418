//! Standing rows and tie-break rules for group stages.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One ranking criterion. Each rule only reorders rows tied on all earlier rules.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TieBreakRule {
    Wins,
    SetDiff,
    GameDiff,
    HeadToHead,
    Random,
}

/// Rules used when a tournament does not configure its own.
pub const DEFAULT_TIE_BREAK_RULES: [TieBreakRule; 5] = [
    TieBreakRule::Wins,
    TieBreakRule::SetDiff,
    TieBreakRule::GameDiff,
    TieBreakRule::HeadToHead,
    TieBreakRule::Random,
];

impl fmt::Display for TieBreakRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieBreakRule::Wins => write!(f, "WINS"),
            TieBreakRule::SetDiff => write!(f, "SET_DIFF"),
            TieBreakRule::GameDiff => write!(f, "GAME_DIFF"),
            TieBreakRule::HeadToHead => write!(f, "HEAD_TO_HEAD"),
            TieBreakRule::Random => write!(f, "RANDOM"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown tie-break rule: {0}")]
pub struct ParseRuleError(pub String);

impl FromStr for TieBreakRule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WINS" => Ok(TieBreakRule::Wins),
            "SET_DIFF" => Ok(TieBreakRule::SetDiff),
            "GAME_DIFF" => Ok(TieBreakRule::GameDiff),
            "HEAD_TO_HEAD" => Ok(TieBreakRule::HeadToHead),
            "RANDOM" => Ok(TieBreakRule::Random),
            _ => Err(ParseRuleError(s.to_string())),
        }
    }
}

/// Derived per-participant record. Recomputed from finished matches on every read.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub participant: ParticipantId,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub set_diff: i64,
    pub game_diff: i64,
    /// Wins against each opponent.
    pub head_to_head: BTreeMap<ParticipantId, u32>,
}

impl StandingRow {
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            ..Self::default()
        }
    }

    /// Wins recorded against `opponent`.
    pub fn wins_against(&self, opponent: ParticipantId) -> u32 {
        self.head_to_head.get(&opponent).copied().unwrap_or(0)
    }
}
