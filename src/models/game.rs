//! Match (game), its status, version token and result snapshot.

use crate::models::error::MatchError;
use crate::models::participant::ParticipantId;
use crate::models::score::{MatchFormat, Score, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match. Assigned in creation order by the store.
pub type MatchId = u64;

/// Unique identifier for a stage.
pub type StageId = u64;

/// Unique identifier for a group inside a group stage.
pub type GroupId = u64;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Scheduled,
    InProgress,
    Done,
    Disputed,
    Cancelled,
}

impl MatchStatus {
    /// Statuses that reject plain edits; only an override may change them.
    pub fn is_locked(self) -> bool {
        matches!(
            self,
            MatchStatus::Done | MatchStatus::Disputed | MatchStatus::Cancelled
        )
    }

    /// Short label for live displays.
    pub fn label(self) -> &'static str {
        match self {
            MatchStatus::Pending => "Pending",
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::InProgress => "Live",
            MatchStatus::Done => "Finished",
            MatchStatus::Disputed => "Disputed",
            MatchStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "PENDING"),
            MatchStatus::Scheduled => write!(f, "SCHEDULED"),
            MatchStatus::InProgress => write!(f, "IN_PROGRESS"),
            MatchStatus::Done => write!(f, "DONE"),
            MatchStatus::Disputed => write!(f, "DISPUTED"),
            MatchStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Opaque change-detection token. A new one is issued on every accepted edit.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(Uuid);

impl Version {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Open dispute on a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    pub reason: Option<String>,
    pub opened_at: DateTime<Utc>,
}

/// The result-bearing part of a match: what an edit changes and what undo restores.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultState {
    pub score: Option<Score>,
    pub winner: Option<Side>,
    pub status: MatchStatus,
    pub forced: bool,
    pub dispute: Option<Dispute>,
}

/// A single match between two optional sides.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub stage_id: StageId,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    /// 1-based, increasing toward the final.
    pub round: u32,
    /// Position within the round.
    #[serde(default)]
    pub slot: u32,
    /// Empty until bracket advancement (or generation) fills it.
    #[serde(default)]
    pub side_a: Option<ParticipantId>,
    #[serde(default)]
    pub side_b: Option<ParticipantId>,
    #[serde(default)]
    pub format: MatchFormat,
    #[serde(default)]
    pub score: Option<Score>,
    /// None if not decided.
    #[serde(default)]
    pub winner: Option<Side>,
    #[serde(default)]
    pub status: MatchStatus,
    /// Closed by an override without validator participation.
    #[serde(default)]
    pub forced: bool,
    #[serde(default)]
    pub dispute: Option<Dispute>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    pub version: Version,
    pub updated_at: DateTime<Utc>,
}

impl GameMatch {
    /// Create an empty pending match. Rounds start at 1.
    pub fn new(
        id: MatchId,
        stage_id: StageId,
        round: u32,
        slot: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, MatchError> {
        if round == 0 {
            return Err(MatchError::InvalidRound { round });
        }
        Ok(Self {
            id,
            stage_id,
            group_id: None,
            round,
            slot,
            side_a: None,
            side_b: None,
            format: MatchFormat::default(),
            score: None,
            winner: None,
            status: MatchStatus::Pending,
            forced: false,
            dispute: None,
            court: None,
            starts_at: None,
            version: Version::generate(),
            updated_at: now,
        })
    }

    /// Fill both sides. The same participant may not play itself.
    pub fn with_sides(
        mut self,
        side_a: Option<ParticipantId>,
        side_b: Option<ParticipantId>,
    ) -> Result<Self, MatchError> {
        if let (Some(a), Some(b)) = (side_a, side_b) {
            if a == b {
                return Err(MatchError::DuplicateParticipant(a));
            }
        }
        self.side_a = side_a;
        self.side_b = side_b;
        Ok(self)
    }

    pub fn with_format(mut self, format: MatchFormat) -> Self {
        self.format = format;
        self
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_court(mut self, court: impl Into<String>) -> Self {
        self.court = Some(court.into());
        self
    }

    pub fn starting_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    /// Participant on the given side, if assigned.
    pub fn participant(&self, side: Side) -> Option<ParticipantId> {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    /// The side that is filled when exactly one is (a bye).
    pub fn bye_side(&self) -> Option<Side> {
        match (self.side_a, self.side_b) {
            (Some(_), None) => Some(Side::A),
            (None, Some(_)) => Some(Side::B),
            _ => None,
        }
    }

    /// Winner of a finished match: the stored winner, else the one the stored score implies.
    pub fn definite_winner(&self) -> Option<Side> {
        if self.status != MatchStatus::Done {
            return None;
        }
        self.winner.or_else(|| {
            self.score
                .as_ref()
                .and_then(|score| crate::logic::winner_from_score(score, &self.format))
        })
    }

    /// Participant id of the definite winner.
    pub fn winner_id(&self) -> Option<ParticipantId> {
        self.definite_winner().and_then(|side| self.participant(side))
    }

    pub fn result_state(&self) -> ResultState {
        ResultState {
            score: self.score.clone(),
            winner: self.winner,
            status: self.status,
            forced: self.forced,
            dispute: self.dispute.clone(),
        }
    }

    /// Overwrite the result-bearing fields with a recorded state.
    pub fn restore(&mut self, state: ResultState) {
        self.score = state.score;
        self.winner = state.winner;
        self.status = state.status;
        self.forced = state.forced;
        self.dispute = state.dispute;
    }
}
