//! Group standings: accumulate finished matches, then rank with ordered tie-break rules.

use crate::models::{GameMatch, MatchStatus, ParticipantId, Side, StandingRow, TieBreakRule};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, HashSet};

/// Compute a deterministic ranking of `participants` over `matches`.
///
/// Only `DONE` matches with two known, distinct participants and a definite
/// winner count. Ranking is tiered: rows tied on the rules applied so far form
/// a block, and the next rule only reorders rows inside that block. Rows no
/// rule separates keep their input order. The same inputs and `seed` always
/// produce the same order.
pub fn compute_standings(
    participants: &[ParticipantId],
    matches: &[GameMatch],
    rules: &[TieBreakRule],
    seed: u64,
) -> Vec<StandingRow> {
    let mut seen = HashSet::new();
    let ids: Vec<ParticipantId> = participants
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut rows: Vec<StandingRow> = ids.iter().map(|&id| StandingRow::new(id)).collect();
    let index: HashMap<ParticipantId, usize> =
        ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut counted = 0usize;
    for m in matches {
        if m.status != MatchStatus::Done {
            continue;
        }
        let (Some(a), Some(b)) = (m.side_a, m.side_b) else {
            continue;
        };
        let (Some(&ia), Some(&ib)) = (index.get(&a), index.get(&b)) else {
            continue;
        };
        if ia == ib {
            continue;
        }
        let Some(winner) = m.definite_winner() else {
            continue;
        };
        let (sets_a, sets_b, games_a, games_b) =
            m.score.as_ref().map(|s| s.totals()).unwrap_or_default();

        let (win_idx, lose_idx, loser_id) = match winner {
            Side::A => (ia, ib, b),
            Side::B => (ib, ia, a),
        };
        rows[win_idx].wins += 1;
        rows[lose_idx].losses += 1;
        *rows[win_idx].head_to_head.entry(loser_id).or_insert(0) += 1;

        let set_margin = sets_a.saturating_sub(sets_b);
        let game_margin = games_a.saturating_sub(games_b);
        rows[ia].played += 1;
        rows[ia].set_diff = rows[ia].set_diff.saturating_add(set_margin);
        rows[ia].game_diff = rows[ia].game_diff.saturating_add(game_margin);
        rows[ib].played += 1;
        rows[ib].set_diff = rows[ib].set_diff.saturating_sub(set_margin);
        rows[ib].game_diff = rows[ib].game_diff.saturating_sub(game_margin);
        counted += 1;
    }

    let draws = draw_values(&ids, seed);
    let order = rank_block((0..rows.len()).collect(), &rows, rules, &draws);
    let mut slots: Vec<Option<StandingRow>> = rows.into_iter().map(Some).collect();
    let ranked: Vec<StandingRow> = order.into_iter().filter_map(|i| slots[i].take()).collect();

    log::debug!(
        "Computed standings for {} participant(s) from {} finished match(es)",
        ranked.len(),
        counted
    );
    ranked
}

/// One value per participant from a generator seeded with `seed`, assigned in
/// ascending id order so the draw does not depend on input order.
fn draw_values(ids: &[ParticipantId], seed: u64) -> HashMap<ParticipantId, u64> {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    sorted.into_iter().map(|id| (id, rng.gen::<u64>())).collect()
}

/// Order one block of tied rows (indices into `rows`) by the first rule, then
/// recurse into each sub-block still tied on it with the remaining rules.
fn rank_block(
    block: Vec<usize>,
    rows: &[StandingRow],
    rules: &[TieBreakRule],
    draws: &HashMap<ParticipantId, u64>,
) -> Vec<usize> {
    let Some((rule, rest)) = rules.split_first() else {
        return block;
    };
    if block.len() < 2 {
        return block;
    }

    // Higher key ranks first.
    let mut keyed: Vec<(i128, usize)> = block
        .iter()
        .map(|&i| (rule_key(*rule, i, &block, rows, draws), i))
        .collect();
    // Stable: equal keys keep their incoming order.
    keyed.sort_by(|x, y| y.0.cmp(&x.0));

    let mut out = Vec::with_capacity(keyed.len());
    let mut start = 0;
    while start < keyed.len() {
        let key = keyed[start].0;
        let end = keyed[start..]
            .iter()
            .position(|&(k, _)| k != key)
            .map_or(keyed.len(), |n| start + n);
        let tier: Vec<usize> = keyed[start..end].iter().map(|&(_, i)| i).collect();
        out.extend(rank_block(tier, rows, rest, draws));
        start = end;
    }
    out
}

fn rule_key(
    rule: TieBreakRule,
    i: usize,
    block: &[usize],
    rows: &[StandingRow],
    draws: &HashMap<ParticipantId, u64>,
) -> i128 {
    let row = &rows[i];
    match rule {
        TieBreakRule::Wins => i128::from(row.wins),
        TieBreakRule::SetDiff => i128::from(row.set_diff),
        TieBreakRule::GameDiff => i128::from(row.game_diff),
        // Mini-league: wins against the other rows of this block only.
        TieBreakRule::HeadToHead => block
            .iter()
            .filter(|&&j| j != i)
            .map(|&j| i128::from(row.wins_against(rows[j].participant)))
            .sum(),
        // Lowest draw first.
        TieBreakRule::Random => -i128::from(draws.get(&row.participant).copied().unwrap_or(0)),
    }
}
