//! Score representations: set-based and goal-race, plus the match format they are checked against.

use serde::{Deserialize, Serialize};

/// Default number of sets for a set-based match (best of 3).
pub const DEFAULT_BEST_OF: u32 = 3;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Games won by each side in one set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSet {
    pub a: i32,
    pub b: i32,
}

impl GameSet {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Side that took the set, `None` for a drawn set.
    pub fn taken_by(&self) -> Option<Side> {
        match self.a.cmp(&self.b) {
            std::cmp::Ordering::Greater => Some(Side::A),
            std::cmp::Ordering::Less => Some(Side::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Running goal tally for a race to `limit`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GoalTally {
    pub a: i32,
    pub b: i32,
    pub limit: i32,
}

impl GoalTally {
    pub fn new(a: i32, b: i32, limit: i32) -> Self {
        Self { a, b, limit }
    }
}

/// A stored or submitted score. Exactly one representation per match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Score {
    Sets { sets: Vec<GameSet> },
    Goals(GoalTally),
}

impl Score {
    /// Set-based score from `(a, b)` pairs.
    pub fn sets<I>(sets: I) -> Self
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        Score::Sets {
            sets: sets.into_iter().map(|(a, b)| GameSet::new(a, b)).collect(),
        }
    }

    /// Goal-race score.
    pub fn goals(a: i32, b: i32, limit: i32) -> Self {
        Score::Goals(GoalTally::new(a, b, limit))
    }

    /// True when any game or goal has been recorded.
    pub fn has_points(&self) -> bool {
        match self {
            Score::Sets { sets } => sets.iter().any(|s| s.a > 0 || s.b > 0),
            Score::Goals(g) => g.a > 0 || g.b > 0,
        }
    }

    /// Raw totals as `(sets_a, sets_b, games_a, games_b)`, without validation.
    ///
    /// Goal-race scores count goals as games and contribute no sets. Sums are
    /// `i64` and saturate.
    pub fn totals(&self) -> (i64, i64, i64, i64) {
        match self {
            Score::Sets { sets } => sets.iter().fold((0, 0, 0, 0), |acc, set| {
                let (sa, sb) = match set.taken_by() {
                    Some(Side::A) => (1, 0),
                    Some(Side::B) => (0, 1),
                    None => (0, 0),
                };
                (
                    acc.0.saturating_add(sa),
                    acc.1.saturating_add(sb),
                    acc.2.saturating_add(i64::from(set.a)),
                    acc.3.saturating_add(i64::from(set.b)),
                )
            }),
            Score::Goals(g) => (0, 0, i64::from(g.a), i64::from(g.b)),
        }
    }
}

/// How a match is scored. Set on the match at generation time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchFormat {
    Sets { best_of: u32 },
    GoalRace { limit: i32 },
}

impl Default for MatchFormat {
    fn default() -> Self {
        MatchFormat::Sets {
            best_of: DEFAULT_BEST_OF,
        }
    }
}
