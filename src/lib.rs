//! Live tournament results: library with models and the result engine.

pub mod config;
pub mod logic;
pub mod models;

pub use config::EngineConfig;
pub use logic::{
    apply_result, build_live_view, compute_standings, resolve_advancement, resolve_dispute,
    scan_warnings, undo, validate_goal_score, validate_score, validate_set_score,
    InMemoryMatchStore, LiveView, LiveWarning, ManualClock, MatchStore, ResultController,
    ResultEdit,
};
pub use models::{
    GameMatch, GameSet, GoalTally, MatchError, MatchFormat, MatchId, MatchStatus, Participant,
    ParticipantId, ResultError, Score, ScoreError, Side, Stage, StandingRow, StoreError,
    TieBreakRule, Tournament, TournamentId, Version,
};
