//! Match state machine: which edits a match accepts and what status results.
//!
//! ```text
//! PENDING <-> SCHEDULED -> IN_PROGRESS -> DONE
//!    *  -> DISPUTED -> PENDING | IN_PROGRESS   (override / dispute resolution)
//!    non-DONE -> CANCELLED
//! ```
//!
//! All functions here are pure: they return the next version of the match and
//! leave the input untouched. Persisting goes through the result controller.

use crate::logic::score::validate_score;
use crate::models::{Dispute, GameMatch, MatchError, MatchStatus, ResultState, Score, Side};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Seconds after an accepted edit during which it may be undone.
pub const UNDO_WINDOW_SECS: i64 = 60;

pub fn undo_window() -> Duration {
    Duration::seconds(UNDO_WINDOW_SECS)
}

/// A requested change to a match result.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResultEdit {
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub status: Option<MatchStatus>,
    /// Declared winner. Only honored on the override path (`force` + `Done`).
    #[serde(default)]
    pub winner: Option<Side>,
    /// The caller holds override capability. Verified before the edit reaches the engine.
    #[serde(default)]
    pub force: bool,
    /// Free-text reason, recorded when opening a dispute.
    #[serde(default)]
    pub reason: Option<String>,
}

impl ResultEdit {
    /// Edit carrying a score only.
    pub fn score(score: Score) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    /// Edit requesting a status only.
    pub fn status(status: MatchStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_winner(mut self, winner: Side) -> Self {
        self.winner = Some(winner);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.status.is_none()
    }
}

/// Result state captured right before an accepted edit. One slot per match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UndoSnapshot {
    pub before: ResultState,
    pub recorded_at: DateTime<Utc>,
}

/// Allowed status-only transitions. `DONE` and `DISPUTED` are never entered this
/// way: a score, a bye or an override decides them.
pub fn can_transition(from: MatchStatus, to: MatchStatus, force: bool) -> bool {
    use MatchStatus::*;
    match (from, to) {
        (_, Done) | (_, Disputed) => false,
        (Pending | Scheduled, Scheduled) => true,
        (_, Scheduled) => false,
        (Pending | Scheduled | InProgress, Pending | InProgress | Cancelled) => true,
        (Done | Disputed, Pending | InProgress) => force,
        (Disputed, Cancelled) => force,
        (Cancelled, Pending) => force,
        _ => false,
    }
}

/// Apply an edit to a match and return the resulting match.
///
/// - `DONE`, `DISPUTED` and `CANCELLED` matches reject plain edits (`MATCH_LOCKED`).
/// - A score always goes through the validator, whose status wins over the requested one.
/// - `force` with status `DONE` closes the match with the declared winner, unvalidated.
/// - Status `DISPUTED` needs `force` and freezes the match until resolved.
/// - `CANCELLED` only leaves through a forced reopen to `PENDING`.
pub fn apply_result(
    game: &GameMatch,
    edit: &ResultEdit,
    now: DateTime<Utc>,
) -> Result<GameMatch, MatchError> {
    if edit.is_empty() {
        return Err(MatchError::EmptyEdit);
    }
    if game.status.is_locked() && !edit.force {
        return Err(MatchError::Locked {
            status: game.status,
        });
    }

    // A cancelled match only reopens to PENDING; scores and overrides wait until then.
    if game.status == MatchStatus::Cancelled
        && (edit.score.is_some() || edit.status != Some(MatchStatus::Pending))
    {
        return Err(MatchError::InvalidTransition {
            from: MatchStatus::Cancelled,
            to: edit.status.unwrap_or(MatchStatus::Done),
        });
    }

    let mut next = game.clone();
    match (edit.status, &edit.score) {
        (Some(MatchStatus::Disputed), _) => open_dispute(&mut next, edit, now)?,
        (Some(MatchStatus::Done), _) if edit.force => force_close(&mut next, edit)?,
        (_, Some(score)) => record_score(&mut next, score)?,
        (Some(status), None) => change_status(&mut next, status, edit.force)?,
        (None, None) => return Err(MatchError::EmptyEdit),
    }
    Ok(next)
}

fn record_score(next: &mut GameMatch, score: &Score) -> Result<(), MatchError> {
    let outcome = validate_score(score, &next.format)?;
    next.score = Some(outcome.normalized);
    next.winner = outcome.winner;
    next.status = outcome.status;
    next.forced = false;
    next.dispute = None;
    Ok(())
}

/// Manual override: the declared winner (or the only filled side) is taken as-is.
/// Without either, a submitted score is validated as usual.
fn force_close(next: &mut GameMatch, edit: &ResultEdit) -> Result<(), MatchError> {
    let winner = match edit.winner.or_else(|| next.bye_side()) {
        Some(side) => side,
        None => {
            return match &edit.score {
                Some(score) => record_score(next, score),
                None => Err(MatchError::MissingWinner),
            }
        }
    };
    if let Some(score) = &edit.score {
        next.score = Some(score.clone());
    }
    next.winner = Some(winner);
    next.status = MatchStatus::Done;
    next.forced = true;
    next.dispute = None;
    Ok(())
}

fn change_status(next: &mut GameMatch, to: MatchStatus, force: bool) -> Result<(), MatchError> {
    let from = next.status;
    if to == MatchStatus::Done {
        // Closing without a score is only a bye: one side present, it advances.
        let side = next.bye_side().ok_or(MatchError::MissingWinner)?;
        next.winner = Some(side);
        next.status = MatchStatus::Done;
        next.forced = false;
        return Ok(());
    }
    if !can_transition(from, to, force) {
        return Err(MatchError::InvalidTransition { from, to });
    }
    match to {
        MatchStatus::Pending => {
            next.score = None;
            next.winner = None;
            next.forced = false;
            next.dispute = None;
        }
        MatchStatus::InProgress => {
            next.winner = None;
            next.forced = false;
            next.dispute = None;
        }
        _ => {}
    }
    next.status = to;
    Ok(())
}

fn open_dispute(
    next: &mut GameMatch,
    edit: &ResultEdit,
    now: DateTime<Utc>,
) -> Result<(), MatchError> {
    if !edit.force {
        return Err(MatchError::OverrideRequired);
    }
    if edit.score.is_some() || next.status == MatchStatus::Disputed {
        return Err(MatchError::InvalidTransition {
            from: next.status,
            to: MatchStatus::Disputed,
        });
    }
    next.status = MatchStatus::Disputed;
    next.dispute = Some(Dispute {
        reason: edit.reason.clone(),
        opened_at: now,
    });
    Ok(())
}

/// Close a dispute. The match resumes as `IN_PROGRESS` when points are on the
/// board, otherwise `PENDING`; the winner is cleared for re-entry.
pub fn resolve_dispute(game: &GameMatch, may_resolve: bool) -> Result<GameMatch, MatchError> {
    if !may_resolve {
        return Err(MatchError::Forbidden);
    }
    if game.status != MatchStatus::Disputed {
        return Err(MatchError::NotDisputed);
    }
    let mut next = game.clone();
    next.status = if next.score.as_ref().is_some_and(Score::has_points) {
        MatchStatus::InProgress
    } else {
        MatchStatus::Pending
    };
    next.winner = None;
    next.forced = false;
    next.dispute = None;
    Ok(next)
}

/// Restore the state recorded before the last accepted edit, within the undo window.
pub fn undo(
    game: &GameMatch,
    snapshot: &UndoSnapshot,
    now: DateTime<Utc>,
) -> Result<GameMatch, MatchError> {
    let elapsed = now - snapshot.recorded_at;
    if elapsed > undo_window() {
        return Err(MatchError::UndoExpired {
            elapsed_secs: elapsed.num_seconds(),
        });
    }
    let mut next = game.clone();
    next.restore(snapshot.before.clone());
    Ok(next)
}
