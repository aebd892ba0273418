//! Integration tests for the match state machine: scores, overrides, disputes and undo.

use chrono::{DateTime, Duration, TimeZone, Utc};
use live_tournament_results::logic::{can_transition, UndoSnapshot};
use live_tournament_results::{
    apply_result, resolve_dispute, undo, GameMatch, MatchError, MatchFormat, MatchStatus,
    ResultEdit, Score, Side,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).unwrap()
}

fn game() -> GameMatch {
    GameMatch::new(1, 1, 1, 0, t0())
        .unwrap()
        .with_sides(Some(10), Some(20))
        .unwrap()
}

fn finished() -> GameMatch {
    apply_result(
        &game(),
        &ResultEdit::score(Score::sets([(6, 4), (6, 3)])),
        t0(),
    )
    .unwrap()
}

#[test]
fn new_match_rejects_round_zero_and_self_play() {
    assert_eq!(
        GameMatch::new(1, 1, 0, 0, t0()).unwrap_err(),
        MatchError::InvalidRound { round: 0 }
    );
    let err = GameMatch::new(1, 1, 1, 0, t0())
        .unwrap()
        .with_sides(Some(5), Some(5))
        .unwrap_err();
    assert_eq!(err.code(), "DUPLICATE_PARTICIPANT");
}

#[test]
fn valid_score_closes_the_match() {
    let m = finished();
    assert_eq!(m.status, MatchStatus::Done);
    assert_eq!(m.winner, Some(Side::A));
    assert_eq!(m.winner_id(), Some(10));
    assert!(!m.forced);
}

#[test]
fn invalid_score_is_rejected_and_input_untouched() {
    let m = game();
    let err = apply_result(&m, &ResultEdit::score(Score::sets([(6, 5)])), t0()).unwrap_err();
    assert_eq!(err.code(), "INVALID_SET");
    assert_eq!(m.status, MatchStatus::Pending);
    assert!(m.score.is_none());
}

#[test]
fn partial_goal_race_keeps_the_match_running() {
    let m = game().with_format(MatchFormat::GoalRace { limit: 5 });
    let running = apply_result(&m, &ResultEdit::score(Score::goals(2, 1, 5)), t0()).unwrap();
    assert_eq!(running.status, MatchStatus::InProgress);
    assert_eq!(running.winner, None);

    let done = apply_result(&running, &ResultEdit::score(Score::goals(2, 5, 5)), t0()).unwrap();
    assert_eq!(done.status, MatchStatus::Done);
    assert_eq!(done.winner_id(), Some(20));
}

#[test]
fn finished_match_is_locked_without_override() {
    let err = apply_result(
        &finished(),
        &ResultEdit::score(Score::sets([(4, 6), (4, 6)])),
        t0(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        MatchError::Locked {
            status: MatchStatus::Done
        }
    );
    assert_eq!(err.code(), "MATCH_LOCKED");
}

#[test]
fn override_can_correct_a_finished_score() {
    let fixed = apply_result(
        &finished(),
        &ResultEdit::score(Score::sets([(4, 6), (4, 6)])).forced(),
        t0(),
    )
    .unwrap();
    assert_eq!(fixed.status, MatchStatus::Done);
    assert_eq!(fixed.winner, Some(Side::B));
}

#[test]
fn forced_close_takes_the_declared_winner() {
    let m = apply_result(
        &game(),
        &ResultEdit::status(MatchStatus::Done)
            .with_winner(Side::B)
            .forced(),
        t0(),
    )
    .unwrap();
    assert_eq!(m.status, MatchStatus::Done);
    assert_eq!(m.winner, Some(Side::B));
    assert!(m.forced);
}

#[test]
fn forced_close_without_winner_or_score_is_rejected() {
    let err = apply_result(
        &game(),
        &ResultEdit::status(MatchStatus::Done).forced(),
        t0(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "MISSING_WINNER");
}

#[test]
fn bye_closes_with_the_only_side() {
    let bye = GameMatch::new(2, 1, 1, 1, t0())
        .unwrap()
        .with_sides(None, Some(30))
        .unwrap();
    let m = apply_result(&bye, &ResultEdit::status(MatchStatus::Done), t0()).unwrap();
    assert_eq!(m.status, MatchStatus::Done);
    assert_eq!(m.winner_id(), Some(30));

    let err = apply_result(&game(), &ResultEdit::status(MatchStatus::Done), t0()).unwrap_err();
    assert_eq!(err, MatchError::MissingWinner);
}

#[test]
fn empty_edit_is_rejected() {
    let err = apply_result(&game(), &ResultEdit::default(), t0()).unwrap_err();
    assert_eq!(err.code(), "EMPTY_EDIT");
}

#[test]
fn status_transitions_follow_the_lifecycle() {
    let scheduled = apply_result(&game(), &ResultEdit::status(MatchStatus::Scheduled), t0()).unwrap();
    assert_eq!(scheduled.status, MatchStatus::Scheduled);

    let live = apply_result(&scheduled, &ResultEdit::status(MatchStatus::InProgress), t0()).unwrap();
    assert_eq!(live.status, MatchStatus::InProgress);

    let err = apply_result(&live, &ResultEdit::status(MatchStatus::Scheduled), t0()).unwrap_err();
    assert_eq!(
        err,
        MatchError::InvalidTransition {
            from: MatchStatus::InProgress,
            to: MatchStatus::Scheduled
        }
    );
}

#[test]
fn cancelled_match_only_reopens_with_override() {
    let cancelled = apply_result(&game(), &ResultEdit::status(MatchStatus::Cancelled), t0()).unwrap();
    assert_eq!(cancelled.status, MatchStatus::Cancelled);

    let err = apply_result(&cancelled, &ResultEdit::status(MatchStatus::Pending), t0()).unwrap_err();
    assert_eq!(err.code(), "MATCH_LOCKED");

    let reopened = apply_result(
        &cancelled,
        &ResultEdit::status(MatchStatus::Pending).forced(),
        t0(),
    )
    .unwrap();
    assert_eq!(reopened.status, MatchStatus::Pending);
}

#[test]
fn cancelled_match_takes_no_result_even_when_forced() {
    let cancelled = apply_result(&game(), &ResultEdit::status(MatchStatus::Cancelled), t0()).unwrap();

    let edits = [
        ResultEdit::score(Score::sets([(6, 4), (6, 3)])).forced(),
        ResultEdit::status(MatchStatus::Done).with_winner(Side::A).forced(),
        ResultEdit::status(MatchStatus::InProgress).forced(),
        ResultEdit::status(MatchStatus::Pending)
            .with_score(Score::sets([(6, 4), (6, 3)]))
            .forced(),
    ];
    for edit in &edits {
        let err = apply_result(&cancelled, edit, t0()).unwrap_err();
        assert_eq!(err.code(), "INVALID_TRANSITION", "{edit:?}");
    }

    // Reopen first, then the result goes through.
    let reopened = apply_result(
        &cancelled,
        &ResultEdit::status(MatchStatus::Pending).forced(),
        t0(),
    )
    .unwrap();
    let done = apply_result(&reopened, &edits[0], t0()).unwrap();
    assert_eq!(done.status, MatchStatus::Done);
    assert_eq!(done.winner, Some(Side::A));
}

#[test]
fn finished_match_cannot_be_cancelled() {
    let err = apply_result(
        &finished(),
        &ResultEdit::status(MatchStatus::Cancelled).forced(),
        t0(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "INVALID_TRANSITION");
}

#[test]
fn reopening_to_pending_clears_the_result() {
    let reopened = apply_result(
        &finished(),
        &ResultEdit::status(MatchStatus::Pending).forced(),
        t0(),
    )
    .unwrap();
    assert_eq!(reopened.status, MatchStatus::Pending);
    assert!(reopened.score.is_none());
    assert!(reopened.winner.is_none());
}

#[test]
fn dispute_needs_override_and_freezes_the_match() {
    let err = apply_result(
        &finished(),
        &ResultEdit::status(MatchStatus::Disputed).with_reason("wrong score"),
        t0(),
    )
    .unwrap_err();
    // A finished match is locked before the dispute rule is even reached.
    assert_eq!(err.code(), "MATCH_LOCKED");

    let err = apply_result(
        &game(),
        &ResultEdit::status(MatchStatus::Disputed),
        t0(),
    )
    .unwrap_err();
    assert_eq!(err, MatchError::OverrideRequired);

    let disputed = apply_result(
        &finished(),
        &ResultEdit::status(MatchStatus::Disputed)
            .with_reason("wrong score")
            .forced(),
        t0(),
    )
    .unwrap();
    assert_eq!(disputed.status, MatchStatus::Disputed);
    assert_eq!(
        disputed.dispute.as_ref().and_then(|d| d.reason.as_deref()),
        Some("wrong score")
    );
    assert_eq!(disputed.definite_winner(), None);

    let err = apply_result(
        &disputed,
        &ResultEdit::score(Score::sets([(6, 1), (6, 1)])),
        t0(),
    )
    .unwrap_err();
    assert_eq!(err.code(), "MATCH_LOCKED");
}

#[test]
fn resolving_a_dispute_reopens_the_match() {
    let disputed = apply_result(
        &finished(),
        &ResultEdit::status(MatchStatus::Disputed).forced(),
        t0(),
    )
    .unwrap();

    assert_eq!(
        resolve_dispute(&disputed, false).unwrap_err(),
        MatchError::Forbidden
    );

    let resolved = resolve_dispute(&disputed, true).unwrap();
    assert_eq!(resolved.status, MatchStatus::InProgress);
    assert!(resolved.winner.is_none());
    assert!(resolved.dispute.is_none());

    assert_eq!(
        resolve_dispute(&resolved, true).unwrap_err().code(),
        "NOT_DISPUTED"
    );
}

#[test]
fn undo_restores_within_the_window() {
    let before = game();
    let after = finished();
    let snapshot = UndoSnapshot {
        before: before.result_state(),
        recorded_at: t0(),
    };

    let restored = undo(&after, &snapshot, t0() + Duration::seconds(60)).unwrap();
    assert_eq!(restored.result_state(), before.result_state());

    let err = undo(&after, &snapshot, t0() + Duration::seconds(61)).unwrap_err();
    assert_eq!(err, MatchError::UndoExpired { elapsed_secs: 61 });
}

#[test]
fn transition_table() {
    use MatchStatus::*;
    assert!(can_transition(Pending, Scheduled, false));
    assert!(can_transition(Scheduled, Pending, false));
    assert!(can_transition(Scheduled, InProgress, false));
    assert!(!can_transition(Pending, Done, true));
    assert!(!can_transition(Done, Pending, false));
    assert!(can_transition(Done, Pending, true));
    assert!(can_transition(Disputed, InProgress, true));
    assert!(!can_transition(Done, Cancelled, true));
    assert!(!can_transition(Cancelled, InProgress, true));
}
