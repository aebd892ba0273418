//! Live warnings: advisory operational issues for organizers. Never blocks edits.

use crate::logic::score::validate_score;
use crate::models::{GameMatch, MatchId, MatchStatus, Participant, ParticipantId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default horizon for start-time and court checks.
pub const DEFAULT_LOOKAHEAD_MINUTES: i64 = 60;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LiveWarning {
    RequiresAction { participant_id: ParticipantId },
    MissingCourt { match_id: MatchId },
    MissingStart { match_id: MatchId },
    /// A finished match whose stored score no longer validates against its format.
    InvalidScore { match_id: MatchId, code: String },
}

/// Scan a snapshot for issues.
///
/// Flagged participants come first, then match findings in input order. Only
/// upcoming matches (not `DONE` or `CANCELLED`) are checked for start time and
/// court; a court is expected once the start falls within `lookahead` of `now`.
pub fn scan_warnings<'a, I>(
    matches: I,
    participants: &[Participant],
    lookahead: Duration,
    now: DateTime<Utc>,
) -> Vec<LiveWarning>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut warnings: Vec<LiveWarning> = participants
        .iter()
        .filter(|p| p.requires_action)
        .map(|p| LiveWarning::RequiresAction {
            participant_id: p.id,
        })
        .collect();

    let horizon = now
        .checked_add_signed(lookahead)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    for m in matches {
        match m.status {
            MatchStatus::Done => {
                if let Some(score) = &m.score {
                    if let Err(err) = validate_score(score, &m.format) {
                        warnings.push(LiveWarning::InvalidScore {
                            match_id: m.id,
                            code: err.code().to_string(),
                        });
                    }
                }
            }
            MatchStatus::Cancelled => {}
            _ => match m.starts_at {
                None => warnings.push(LiveWarning::MissingStart { match_id: m.id }),
                Some(start) if start <= horizon && m.court.is_none() => {
                    warnings.push(LiveWarning::MissingCourt { match_id: m.id })
                }
                Some(_) => {}
            },
        }
    }
    warnings
}
