//! Tournament result engine: validation, match transitions, brackets, standings, live checks.

mod advancement;
mod conflict;
mod live;
mod match_state;
mod score;
mod standings;
mod warnings;

pub use advancement::resolve_advancement;
pub use conflict::{
    Clock, InMemoryMatchStore, ManualClock, MatchRecord, MatchStore, ResultController,
    SystemClock,
};
pub use live::{build_live_view, GroupView, LiveView, MatchView, StageView};
pub use match_state::{
    apply_result, can_transition, resolve_dispute, undo, undo_window, ResultEdit, UndoSnapshot,
    UNDO_WINDOW_SECS,
};
pub use score::{
    is_legal_set, validate_goal_score, validate_score, validate_set_score, winner_from_score,
    GoalOutcome, ScoreOutcome, SetOutcome,
};
pub use standings::compute_standings;
pub use warnings::{scan_warnings, LiveWarning, DEFAULT_LOOKAHEAD_MINUTES};
