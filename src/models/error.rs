//! Error types for score validation, match transitions, storage and result submission.
//!
//! Every error is a value with a stable `code()` that callers surface verbatim.

use crate::models::game::{MatchId, MatchStatus, Version};
use crate::models::participant::ParticipantId;
use crate::models::score::{GameSet, Side};
use thiserror::Error;

/// A submitted score is not a legal result for its format.
///
/// Always recoverable by resubmitting a corrected score.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ScoreError {
    #[error("score is empty or malformed")]
    InvalidScore,
    #[error("more sets than a best of {best_of} allows")]
    TooManySets { best_of: u32 },
    #[error("set {index} ({}-{}) is not a legal set result", set.a, set.b)]
    InvalidSet { index: usize, set: GameSet },
    #[error("score does not determine a winner")]
    NoWinner,
    #[error("side {side:?} reports {wins} set wins, more than the format allows")]
    TooManyWins { side: Side, wins: u32 },
    #[error("goal limit {limit} must be positive")]
    InvalidLimit { limit: i32 },
    #[error("score exceeds the goal limit of {limit}")]
    LimitExceeded { limit: i32 },
    #[error("a tie at the goal limit is not allowed")]
    TieNotAllowed,
    #[error("best of {best_of} is not a valid set format")]
    InvalidFormat { best_of: u32 },
    #[error("score kind does not match the match format")]
    FormatMismatch,
}

impl ScoreError {
    pub fn code(&self) -> &'static str {
        match self {
            ScoreError::InvalidScore => "INVALID_SCORE",
            ScoreError::TooManySets { .. } => "TOO_MANY_SETS",
            ScoreError::InvalidSet { .. } => "INVALID_SET",
            ScoreError::NoWinner => "NO_WINNER",
            ScoreError::TooManyWins { .. } => "TOO_MANY_WINS",
            ScoreError::InvalidLimit { .. } => "INVALID_LIMIT",
            ScoreError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            ScoreError::TieNotAllowed => "TIE_NOT_ALLOWED",
            ScoreError::InvalidFormat { .. } => "INVALID_FORMAT",
            ScoreError::FormatMismatch => "FORMAT_MISMATCH",
        }
    }
}

/// A requested edit is not allowed for the match in its current state.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MatchError {
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error("match is {status} and cannot be edited without an override")]
    Locked { status: MatchStatus },
    #[error("this change requires override capability")]
    OverrideRequired,
    #[error("cannot move a match from {from} to {to}")]
    InvalidTransition { from: MatchStatus, to: MatchStatus },
    #[error("edit carries neither a score nor a status")]
    EmptyEdit,
    #[error("closing the match requires a winner")]
    MissingWinner,
    #[error("match is not disputed")]
    NotDisputed,
    #[error("caller may not resolve disputes")]
    Forbidden,
    #[error("undo window expired {elapsed_secs}s after the edit")]
    UndoExpired { elapsed_secs: i64 },
    #[error("no edit to undo")]
    UndoNotFound,
    #[error("round {round} is invalid, rounds start at 1")]
    InvalidRound { round: u32 },
    #[error("participant {0} cannot play both sides")]
    DuplicateParticipant(ParticipantId),
}

impl MatchError {
    pub fn code(&self) -> &'static str {
        match self {
            MatchError::Score(e) => e.code(),
            MatchError::Locked { .. } => "MATCH_LOCKED",
            MatchError::OverrideRequired => "OVERRIDE_REQUIRED",
            MatchError::InvalidTransition { .. } => "INVALID_TRANSITION",
            MatchError::EmptyEdit => "EMPTY_EDIT",
            MatchError::MissingWinner => "MISSING_WINNER",
            MatchError::NotDisputed => "NOT_DISPUTED",
            MatchError::Forbidden => "FORBIDDEN",
            MatchError::UndoExpired { .. } => "UNDO_EXPIRED",
            MatchError::UndoNotFound => "UNDO_NOT_FOUND",
            MatchError::InvalidRound { .. } => "INVALID_ROUND",
            MatchError::DuplicateParticipant(_) => "DUPLICATE_PARTICIPANT",
        }
    }
}

/// Failure reported by a match store.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("match {match_id} is at version {actual}, not {expected}")]
    VersionMismatch {
        match_id: MatchId,
        expected: Version,
        actual: Version,
    },
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error("match {0} already exists")]
    AlreadyExists(MatchId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::VersionMismatch { .. } => "CONFLICT",
            StoreError::NotFound(_) => "MATCH_NOT_FOUND",
            StoreError::AlreadyExists(_) => "MATCH_EXISTS",
            StoreError::Unavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

/// Errors returned by the result controller.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ResultError {
    /// The caller's view is stale: re-fetch the match and retry against the new version.
    #[error("match {match_id} changed (expected version {expected}, found {actual})")]
    Conflict {
        match_id: MatchId,
        expected: Version,
        actual: Version,
    },
    #[error("match {0} not found")]
    NotFound(MatchId),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Store(StoreError),
}

impl ResultError {
    pub fn code(&self) -> &'static str {
        match self {
            ResultError::Conflict { .. } => "CONFLICT",
            ResultError::NotFound(_) => "MATCH_NOT_FOUND",
            ResultError::Match(e) => e.code(),
            ResultError::Store(e) => e.code(),
        }
    }

    /// True when re-fetching and retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResultError::Conflict { .. })
    }
}

impl From<StoreError> for ResultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionMismatch {
                match_id,
                expected,
                actual,
            } => ResultError::Conflict {
                match_id,
                expected,
                actual,
            },
            StoreError::NotFound(id) => ResultError::NotFound(id),
            other => ResultError::Store(other),
        }
    }
}

impl From<ScoreError> for ResultError {
    fn from(err: ScoreError) -> Self {
        ResultError::Match(MatchError::Score(err))
    }
}
