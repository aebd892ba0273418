//! Integration tests for the result controller: versions, conflicts, undo and disputes.

use chrono::{DateTime, Duration, TimeZone, Utc};
use live_tournament_results::logic::MatchRecord;
use live_tournament_results::{
    GameMatch, InMemoryMatchStore, ManualClock, MatchStatus, MatchStore, ResultController,
    ResultEdit, ResultError, Score, Side, StoreError, Version,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 3, 14, 0, 0).unwrap()
}

fn pairing(id: u64, a: u64, b: u64) -> GameMatch {
    GameMatch::new(id, 1, 1, id as u32, t0())
        .unwrap()
        .with_sides(Some(a), Some(b))
        .unwrap()
}

fn controller() -> ResultController<InMemoryMatchStore, ManualClock> {
    let store = InMemoryMatchStore::with_matches(vec![pairing(1, 10, 20), pairing(2, 30, 40)]);
    ResultController::new(store, ManualClock::new(t0()))
}

fn a_wins() -> ResultEdit {
    ResultEdit::score(Score::sets([(6, 4), (6, 4)]))
}

#[test]
fn accepted_edit_issues_a_new_version() {
    let ctl = controller();
    let before = ctl.get(1).unwrap();

    let after = ctl.submit_result(1, before.version, &a_wins()).unwrap();
    assert_ne!(after.version, before.version);
    assert_eq!(after.status, MatchStatus::Done);
    assert_eq!(after.winner, Some(Side::A));
    assert_eq!(ctl.get(1).unwrap(), after);
}

#[test]
fn stale_version_gets_conflict() {
    let ctl = controller();
    let seen = ctl.get(1).unwrap().version;

    ctl.submit_result(1, seen, &a_wins()).unwrap();
    let err = ctl
        .submit_result(1, seen, &ResultEdit::score(Score::sets([(4, 6), (4, 6)])))
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert!(err.is_retryable());
    assert_eq!(ctl.get(1).unwrap().winner, Some(Side::A));
}

#[test]
fn retry_after_refetch_succeeds() {
    let ctl = controller();
    let seen = ctl.get(1).unwrap().version;
    ctl.submit_result(1, seen, &a_wins()).unwrap();

    let fresh = ctl.get(1).unwrap().version;
    let fixed = ctl
        .submit_result(
            1,
            fresh,
            &ResultEdit::score(Score::sets([(4, 6), (4, 6)])).forced(),
        )
        .unwrap();
    assert_eq!(fixed.winner, Some(Side::B));
}

#[test]
fn concurrent_writers_on_one_version_yield_one_winner() {
    let ctl = controller();
    let seen = ctl.get(1).unwrap().version;

    let results: Vec<Result<GameMatch, ResultError>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ctl = &ctl;
                s.spawn(move || {
                    let edit = if i % 2 == 0 {
                        a_wins()
                    } else {
                        ResultEdit::score(Score::sets([(3, 6), (3, 6)]))
                    };
                    ctl.submit_result(1, seen, &edit)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.code() == "CONFLICT"));
}

#[test]
fn rejected_edit_changes_nothing() {
    let ctl = controller();
    let before = ctl.get(1).unwrap();
    let err = ctl
        .submit_result(1, before.version, &ResultEdit::score(Score::sets([(6, 5)])))
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_SET");
    assert_eq!(ctl.get(1).unwrap(), before);
    assert_eq!(ctl.undo_last(1).unwrap_err().code(), "UNDO_NOT_FOUND");
}

#[test]
fn unknown_match_is_not_found() {
    let ctl = controller();
    let err = ctl
        .submit_result(99, Version::generate(), &a_wins())
        .unwrap_err();
    assert_eq!(err, ResultError::NotFound(99));
    assert_eq!(err.code(), "MATCH_NOT_FOUND");
}

#[test]
fn undo_inside_the_window_restores_the_previous_result() {
    let ctl = controller();
    let before = ctl.get(1).unwrap();
    ctl.submit_result(1, before.version, &a_wins()).unwrap();

    ctl.clock().advance(Duration::seconds(45));
    let restored = ctl.undo_last(1).unwrap();
    assert_eq!(restored.result_state(), before.result_state());
    assert_ne!(restored.version, before.version);

    // One step deep.
    assert_eq!(ctl.undo_last(1).unwrap_err().code(), "UNDO_NOT_FOUND");
}

#[test]
fn undo_at_exactly_sixty_seconds_still_succeeds() {
    let ctl = controller();
    let before = ctl.get(1).unwrap();
    ctl.submit_result(1, before.version, &a_wins()).unwrap();

    ctl.clock().advance(Duration::seconds(60));
    let restored = ctl.undo_last(1).unwrap();
    assert_eq!(restored.status, MatchStatus::Pending);
    assert_eq!(restored.result_state(), before.result_state());
}

#[test]
fn undo_after_the_window_expires_and_leaves_the_match_alone() {
    let ctl = controller();
    let seen = ctl.get(1).unwrap().version;
    let done = ctl.submit_result(1, seen, &a_wins()).unwrap();

    ctl.clock().advance(Duration::seconds(61));
    let err = ctl.undo_last(1).unwrap_err();
    assert_eq!(err.code(), "UNDO_EXPIRED");
    assert_eq!(ctl.get(1).unwrap(), done);
}

#[test]
fn undo_only_reverts_the_latest_edit() {
    let ctl = controller();
    let v0 = ctl.get(2).unwrap().version;
    let started = ctl
        .submit_result(2, v0, &ResultEdit::status(MatchStatus::InProgress))
        .unwrap();
    ctl.clock().advance(Duration::seconds(30));
    ctl.submit_result(2, started.version, &a_wins()).unwrap();

    let back = ctl.undo_last(2).unwrap();
    assert_eq!(back.status, MatchStatus::InProgress);
    assert!(back.score.is_none());
}

#[test]
fn dispute_flow_through_the_controller() {
    let ctl = controller();
    let v0 = ctl.get(1).unwrap().version;
    let done = ctl.submit_result(1, v0, &a_wins()).unwrap();

    let err = ctl
        .submit_result(1, done.version, &ResultEdit::status(MatchStatus::Disputed))
        .unwrap_err();
    assert_eq!(err.code(), "MATCH_LOCKED");

    let disputed = ctl
        .submit_result(
            1,
            done.version,
            &ResultEdit::status(MatchStatus::Disputed)
                .with_reason("score sheet differs")
                .forced(),
        )
        .unwrap();
    assert_eq!(disputed.status, MatchStatus::Disputed);

    let err = ctl
        .resolve_dispute(1, disputed.version, false)
        .unwrap_err();
    assert_eq!(err.code(), "FORBIDDEN");

    let err = ctl.resolve_dispute(1, done.version, true).unwrap_err();
    assert_eq!(err.code(), "CONFLICT");

    let resolved = ctl.resolve_dispute(1, disputed.version, true).unwrap();
    assert_eq!(resolved.status, MatchStatus::InProgress);
    assert!(resolved.dispute.is_none());
}

#[test]
fn snapshot_is_ordered_by_id() {
    let store = InMemoryMatchStore::with_matches(vec![pairing(3, 1, 2), pairing(1, 3, 4)]);
    store.insert(MatchRecord::new(pairing(2, 5, 6))).unwrap();
    let ctl = ResultController::with_system_clock(store);
    let ids: Vec<u64> = ctl.snapshot().unwrap().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn store_rejects_duplicates_and_stale_swaps() {
    let store = InMemoryMatchStore::new();
    let m = pairing(1, 1, 2);
    store.insert(MatchRecord::new(m.clone())).unwrap();

    let err = store.insert(MatchRecord::new(m.clone())).unwrap_err();
    assert_eq!(err, StoreError::AlreadyExists(1));
    assert_eq!(err.code(), "MATCH_EXISTS");

    let stale = Version::generate();
    let err = store
        .compare_and_swap(stale, MatchRecord::new(m.clone()))
        .unwrap_err();
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(ResultError::from(err).code(), "CONFLICT");

    store.compare_and_swap(m.version, MatchRecord::new(m)).unwrap();
}
