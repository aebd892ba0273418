//! Data structures for live tournaments: participants, matches, scores, stages, standings.

mod error;
mod game;
mod participant;
mod score;
mod stage;
mod standing;
mod tournament;

pub use error::{MatchError, ResultError, ScoreError, StoreError};
pub use game::{
    Dispute, GameMatch, GroupId, MatchId, MatchStatus, ResultState, StageId, Version,
};
pub use participant::{Participant, ParticipantId};
pub use score::{GameSet, GoalTally, MatchFormat, Score, Side, DEFAULT_BEST_OF};
pub use stage::{Group, Stage, StageKind};
pub use standing::{ParseRuleError, StandingRow, TieBreakRule, DEFAULT_TIE_BREAK_RULES};
pub use tournament::{Tournament, TournamentId};
