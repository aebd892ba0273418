//! Knockout bracket: propagate each finished match's winner into the next round.

use crate::models::{GameMatch, ParticipantId};
use std::collections::BTreeMap;

/// Resolve winner propagation over all matches of one knockout stage.
///
/// Rounds are processed in ascending order. Within a round, matches are
/// ordered by `(round, id)`, i.e. creation order, never by start time, so the
/// bracket topology does not move when matches are rescheduled. The winner of
/// round `r` position `i` goes to round `r + 1` position `i / 2`: side A for
/// even `i`, side B for odd `i`. Filled slots are never overwritten, which makes
/// the resolution idempotent.
///
/// The input is left untouched; the returned matches keep the input order.
pub fn resolve_advancement(matches: &[GameMatch]) -> Vec<GameMatch> {
    let mut resolved = matches.to_vec();

    let mut rounds: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, m) in resolved.iter().enumerate() {
        if m.round > 0 {
            rounds.entry(m.round).or_default().push(idx);
        }
    }
    for indices in rounds.values_mut() {
        indices.sort_by_key(|&i| (resolved[i].round, resolved[i].id));
    }
    let rounds: Vec<Vec<usize>> = rounds.into_values().collect();

    let mut placed = 0usize;
    for pair in rounds.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        for (position, &idx) in current.iter().enumerate() {
            let Some(winner) = resolved[idx].winner_id() else {
                continue;
            };
            let Some(&target) = next.get(position / 2) else {
                continue;
            };
            if place_winner(&mut resolved[target], winner, position % 2 == 0) {
                placed += 1;
            }
        }
    }

    log::debug!(
        "Resolved bracket over {} match(es): {} slot(s) filled",
        resolved.len(),
        placed
    );
    resolved
}

/// Put `winner` into side A (`to_side_a`) or side B of `target` if that slot is
/// empty and the other side is not already the same participant.
fn place_winner(target: &mut GameMatch, winner: ParticipantId, to_side_a: bool) -> bool {
    let (slot, other) = if to_side_a {
        (&mut target.side_a, target.side_b)
    } else {
        (&mut target.side_b, target.side_a)
    };
    if slot.is_some() || other == Some(winner) {
        return false;
    }
    *slot = Some(winner);
    true
}
