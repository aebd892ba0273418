//! Engine configuration from the environment.
//! LIVE_LOOKAHEAD_MINUTES (e.g. 60), LIVE_TIE_BREAK_RULES (e.g. WINS,HEAD_TO_HEAD,RANDOM),
//! LIVE_SEED (e.g. 42). Unset or malformed values fall back to the defaults.

use crate::logic::DEFAULT_LOOKAHEAD_MINUTES;
use crate::models::{TieBreakRule, Tournament, DEFAULT_TIE_BREAK_RULES};
use chrono::Duration;

/// Upper bound for `LIVE_LOOKAHEAD_MINUTES` (one week).
const MAX_LOOKAHEAD_MINUTES: i64 = 7 * 24 * 60;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineConfig {
    pub lookahead_minutes: i64,
    pub tie_break_rules: Vec<TieBreakRule>,
    /// Overrides the snapshot's seed when set.
    pub seed: Option<u64>,
}

fn default_lookahead_minutes() -> i64 {
    DEFAULT_LOOKAHEAD_MINUTES
}

fn default_tie_break_rules() -> Vec<TieBreakRule> {
    DEFAULT_TIE_BREAK_RULES.to_vec()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_minutes: default_lookahead_minutes(),
            tie_break_rules: default_tie_break_rules(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookahead_minutes = match lookup("LIVE_LOOKAHEAD_MINUTES") {
            None => default_lookahead_minutes(),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(minutes) if (0..=MAX_LOOKAHEAD_MINUTES).contains(&minutes) => minutes,
                _ => {
                    log::warn!("Ignoring LIVE_LOOKAHEAD_MINUTES={:?}, using default", raw);
                    default_lookahead_minutes()
                }
            },
        };

        let tie_break_rules = match lookup("LIVE_TIE_BREAK_RULES") {
            None => default_tie_break_rules(),
            Some(raw) => match parse_rules(&raw) {
                Some(rules) => rules,
                None => {
                    log::warn!("Ignoring LIVE_TIE_BREAK_RULES={:?}, using default", raw);
                    default_tie_break_rules()
                }
            },
        };

        let seed = lookup("LIVE_SEED").and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                log::warn!("Ignoring LIVE_SEED={:?}", raw);
                None
            }
        });

        Self {
            lookahead_minutes,
            tie_break_rules,
            seed,
        }
    }

    pub fn lookahead(&self) -> Duration {
        Duration::minutes(self.lookahead_minutes)
    }

    /// Fill in what the snapshot leaves open: tie-break rules when it lists none,
    /// and the seed when one is configured.
    pub fn apply(&self, tournament: &mut Tournament) {
        if tournament.tie_break_rules.is_empty() {
            tournament.tie_break_rules = self.tie_break_rules.clone();
        }
        if let Some(seed) = self.seed {
            tournament.seed = seed;
        }
    }
}

/// Comma-separated rule names. `None` if any entry is unknown or the list is empty.
fn parse_rules(raw: &str) -> Option<Vec<TieBreakRule>> {
    let rules = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<TieBreakRule>().ok())
        .collect::<Option<Vec<_>>>()?;
    if rules.is_empty() {
        None
    } else {
        Some(rules)
    }
}
