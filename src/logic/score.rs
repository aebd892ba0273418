//! Score validation for set-based and goal-race matches.
//!
//! Both validators are pure and total: every input yields either a normalized
//! outcome or a tagged [`ScoreError`].

use crate::models::{GameSet, GoalTally, MatchFormat, MatchStatus, Score, ScoreError, Side};

/// Games a side needs to take a set outright (with a two-game margin).
const MIN_GAMES_TO_WIN: i32 = 6;
/// Games of the winner in a tiebreak set (7-6).
const TIEBREAK_GAMES: i32 = 7;
const WIN_BY: i32 = 2;

/// Accepted set-based result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetOutcome {
    pub winner: Side,
    pub sets_a: u32,
    pub sets_b: u32,
    pub games_a: i64,
    pub games_b: i64,
    pub normalized: Vec<GameSet>,
}

/// Accepted goal-race tally: a winner only once one side reaches the limit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GoalOutcome {
    pub winner: Option<Side>,
    pub status: MatchStatus,
    pub normalized: GoalTally,
}

/// Format-independent view of an accepted score.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreOutcome {
    pub winner: Option<Side>,
    pub status: MatchStatus,
    pub normalized: Score,
}

/// A set is legal when it ends 7-6 on a tiebreak, or the winner has at least
/// six games and a two-game margin.
pub fn is_legal_set(set: &GameSet) -> bool {
    if set.a < 0 || set.b < 0 {
        return false;
    }
    let max = set.a.max(set.b);
    let diff = (set.a - set.b).abs();
    if max == TIEBREAK_GAMES && diff == 1 {
        return true;
    }
    max >= MIN_GAMES_TO_WIN && diff >= WIN_BY
}

/// Validate a complete best-of-`best_of` set score and derive the winner.
///
/// A side wins once its set count exceeds `best_of / 2`. Sets played after
/// the match was decided are rejected as extra sets.
pub fn validate_set_score(sets: &[GameSet], best_of: u32) -> Result<SetOutcome, ScoreError> {
    if best_of == 0 || best_of % 2 == 0 {
        return Err(ScoreError::InvalidFormat { best_of });
    }
    if sets.is_empty() {
        return Err(ScoreError::InvalidScore);
    }
    if sets.len() > best_of as usize {
        return Err(ScoreError::TooManySets { best_of });
    }

    let majority = best_of / 2 + 1;
    let (mut sets_a, mut sets_b) = (0u32, 0u32);
    let (mut games_a, mut games_b) = (0i64, 0i64);
    let mut decided_at = None;

    for (index, set) in sets.iter().enumerate() {
        if !is_legal_set(set) {
            return Err(ScoreError::InvalidSet { index, set: *set });
        }
        match set.taken_by() {
            Some(Side::A) => sets_a += 1,
            Some(Side::B) => sets_b += 1,
            None => return Err(ScoreError::InvalidSet { index, set: *set }),
        }
        games_a = games_a.saturating_add(i64::from(set.a));
        games_b = games_b.saturating_add(i64::from(set.b));
        if decided_at.is_none() && (sets_a >= majority || sets_b >= majority) {
            decided_at = Some(index);
        }
    }

    if sets_a == sets_b {
        return Err(ScoreError::NoWinner);
    }
    if sets_a > majority {
        return Err(ScoreError::TooManyWins {
            side: Side::A,
            wins: sets_a,
        });
    }
    if sets_b > majority {
        return Err(ScoreError::TooManyWins {
            side: Side::B,
            wins: sets_b,
        });
    }
    if matches!(decided_at, Some(index) if index + 1 < sets.len()) {
        return Err(ScoreError::TooManySets { best_of });
    }

    let winner = if sets_a >= majority {
        Side::A
    } else if sets_b >= majority {
        Side::B
    } else {
        return Err(ScoreError::NoWinner);
    };

    Ok(SetOutcome {
        winner,
        sets_a,
        sets_b,
        games_a,
        games_b,
        normalized: sets.to_vec(),
    })
}

/// Validate a goal-race tally. There are no draws: a tie at the limit is rejected.
pub fn validate_goal_score(goals: &GoalTally) -> Result<GoalOutcome, ScoreError> {
    let GoalTally { a, b, limit } = *goals;
    if a < 0 || b < 0 {
        return Err(ScoreError::InvalidScore);
    }
    if limit <= 0 {
        return Err(ScoreError::InvalidLimit { limit });
    }
    if a > limit || b > limit {
        return Err(ScoreError::LimitExceeded { limit });
    }
    if a == limit && b == limit {
        return Err(ScoreError::TieNotAllowed);
    }

    let (winner, status) = if a == limit {
        (Some(Side::A), MatchStatus::Done)
    } else if b == limit {
        (Some(Side::B), MatchStatus::Done)
    } else if a > 0 || b > 0 {
        (None, MatchStatus::InProgress)
    } else {
        (None, MatchStatus::Pending)
    };

    Ok(GoalOutcome {
        winner,
        status,
        normalized: *goals,
    })
}

/// Validate a score against the format of the match it is submitted for.
pub fn validate_score(score: &Score, format: &MatchFormat) -> Result<ScoreOutcome, ScoreError> {
    match (score, format) {
        (Score::Sets { sets }, MatchFormat::Sets { best_of }) => {
            let outcome = validate_set_score(sets, *best_of)?;
            Ok(ScoreOutcome {
                winner: Some(outcome.winner),
                status: MatchStatus::Done,
                normalized: Score::Sets {
                    sets: outcome.normalized,
                },
            })
        }
        (Score::Goals(tally), MatchFormat::GoalRace { limit }) => {
            if tally.limit != *limit {
                return Err(ScoreError::InvalidLimit { limit: tally.limit });
            }
            let outcome = validate_goal_score(tally)?;
            Ok(ScoreOutcome {
                winner: outcome.winner,
                status: outcome.status,
                normalized: Score::Goals(outcome.normalized),
            })
        }
        _ => Err(ScoreError::FormatMismatch),
    }
}

/// Winner implied by a score, if it is valid and decided.
pub fn winner_from_score(score: &Score, format: &MatchFormat) -> Option<Side> {
    validate_score(score, format).ok().and_then(|o| o.winner)
}
