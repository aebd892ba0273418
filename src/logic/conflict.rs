//! Result controller: the single mutation path for match results.
//!
//! Edits are reconciled with optimistic concurrency. Each submission carries the
//! version the caller last saw; the store swaps the record only if that version
//! is still current, so a losing writer gets `CONFLICT` and retries instead of
//! blocking. Every accepted edit keeps a one-slot snapshot for undo.

use crate::logic::match_state::{self, ResultEdit, UndoSnapshot};
use crate::models::{GameMatch, MatchError, MatchId, ResultError, StoreError, Version};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// A stored match plus its pending undo slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub game: GameMatch,
    #[serde(default)]
    pub undo: Option<UndoSnapshot>,
}

impl MatchRecord {
    pub fn new(game: GameMatch) -> Self {
        Self { game, undo: None }
    }
}

/// Durable match storage keyed by id.
pub trait MatchStore: Send + Sync {
    fn load(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// Add a new record. Fails if the id is taken.
    fn insert(&self, record: MatchRecord) -> Result<(), StoreError>;

    /// Replace the record with the same id only if its current version is `expected`.
    fn compare_and_swap(&self, expected: Version, record: MatchRecord) -> Result<(), StoreError>;

    /// All matches, read atomically, ordered by id.
    fn snapshot(&self) -> Result<Vec<GameMatch>, StoreError>;
}

/// In-process store. The version check and the write happen under one write guard.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    records: RwLock<HashMap<MatchId, MatchRecord>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with matches, as created by bracket/group generation.
    pub fn with_matches(matches: impl IntoIterator<Item = GameMatch>) -> Self {
        let records = matches
            .into_iter()
            .map(|m| (m.id, MatchRecord::new(m)))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("lock error".to_string())
}

impl MatchStore for InMemoryMatchStore {
    fn load(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        let g = self.records.read().map_err(|_| poisoned())?;
        Ok(g.get(&id).cloned())
    }

    fn insert(&self, record: MatchRecord) -> Result<(), StoreError> {
        let mut g = self.records.write().map_err(|_| poisoned())?;
        let id = record.game.id;
        if g.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        g.insert(id, record);
        Ok(())
    }

    fn compare_and_swap(&self, expected: Version, record: MatchRecord) -> Result<(), StoreError> {
        let mut g = self.records.write().map_err(|_| poisoned())?;
        let id = record.game.id;
        let current = g.get(&id).ok_or(StoreError::NotFound(id))?;
        if current.game.version != expected {
            return Err(StoreError::VersionMismatch {
                match_id: id,
                expected,
                actual: current.game.version,
            });
        }
        g.insert(id, record);
        Ok(())
    }

    fn snapshot(&self) -> Result<Vec<GameMatch>, StoreError> {
        let g = self.records.read().map_err(|_| poisoned())?;
        let mut matches: Vec<GameMatch> = g.values().map(|r| r.game.clone()).collect();
        matches.sort_by_key(|m| m.id);
        Ok(matches)
    }
}

/// Wall-clock source for the undo window.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. For tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        match self.now.lock() {
            Ok(mut g) => *g = now,
            Err(poisoned) => *poisoned.into_inner() = now,
        }
    }

    pub fn advance(&self, by: Duration) {
        self.set(self.now() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        match self.now.lock() {
            Ok(g) => *g,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Accepts, rejects and undoes result edits against a [`MatchStore`].
#[derive(Debug)]
pub struct ResultController<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: MatchStore> ResultController<S, SystemClock> {
    pub fn with_system_clock(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: MatchStore, C: Clock> ResultController<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current state of a match.
    pub fn get(&self, match_id: MatchId) -> Result<GameMatch, ResultError> {
        Ok(self.load(match_id)?.game)
    }

    /// Atomic snapshot of every match, for brackets, standings and warnings.
    pub fn snapshot(&self) -> Result<Vec<GameMatch>, ResultError> {
        Ok(self.store.snapshot()?)
    }

    /// Submit an edit against the version the caller last observed.
    ///
    /// On `CONFLICT` the caller must re-fetch and retry; nothing is merged.
    pub fn submit_result(
        &self,
        match_id: MatchId,
        expected_version: Version,
        edit: &ResultEdit,
    ) -> Result<GameMatch, ResultError> {
        let record = self.load_at(match_id, expected_version)?;
        let now = self.clock.now();
        let next = match_state::apply_result(&record.game, edit, now)?;
        let accepted = self.commit(&record, next, now)?;
        log::info!(
            "Accepted result edit on match {}: {} -> {} (version {})",
            match_id,
            record.game.status,
            accepted.status,
            accepted.version
        );
        Ok(accepted)
    }

    /// Close a dispute. `may_resolve` is the caller's capability, decided upstream.
    pub fn resolve_dispute(
        &self,
        match_id: MatchId,
        expected_version: Version,
        may_resolve: bool,
    ) -> Result<GameMatch, ResultError> {
        let record = self.load_at(match_id, expected_version)?;
        let now = self.clock.now();
        let next = match_state::resolve_dispute(&record.game, may_resolve)?;
        let accepted = self.commit(&record, next, now)?;
        log::info!(
            "Resolved dispute on match {}: now {}",
            match_id,
            accepted.status
        );
        Ok(accepted)
    }

    /// Revert the most recent accepted edit if it is still inside the undo window.
    ///
    /// History is one step deep: after an undo there is nothing left to undo.
    pub fn undo_last(&self, match_id: MatchId) -> Result<GameMatch, ResultError> {
        let record = self.load(match_id)?;
        let snapshot = record.undo.as_ref().ok_or(MatchError::UndoNotFound)?;
        let now = self.clock.now();
        let mut next = match_state::undo(&record.game, snapshot, now)?;
        next.version = Version::generate();
        next.updated_at = now;

        self.swap(record.game.version, MatchRecord::new(next.clone()))?;
        log::info!(
            "Undid last edit on match {}: back to {} (version {})",
            match_id,
            next.status,
            next.version
        );
        Ok(next)
    }

    fn load(&self, match_id: MatchId) -> Result<MatchRecord, ResultError> {
        self.store
            .load(match_id)?
            .ok_or(ResultError::NotFound(match_id))
    }

    /// Load and reject early when the caller's version is already stale.
    fn load_at(&self, match_id: MatchId, expected: Version) -> Result<MatchRecord, ResultError> {
        let record = self.load(match_id)?;
        if record.game.version != expected {
            log::warn!(
                "Rejected stale edit on match {}: expected {}, current {}",
                match_id,
                expected,
                record.game.version
            );
            return Err(ResultError::Conflict {
                match_id,
                expected,
                actual: record.game.version,
            });
        }
        Ok(record)
    }

    /// Stamp a new version, keep the pre-edit state for undo and swap it in.
    fn commit(
        &self,
        current: &MatchRecord,
        mut next: GameMatch,
        now: DateTime<Utc>,
    ) -> Result<GameMatch, ResultError> {
        next.version = Version::generate();
        next.updated_at = now;
        let record = MatchRecord {
            game: next.clone(),
            undo: Some(UndoSnapshot {
                before: current.game.result_state(),
                recorded_at: now,
            }),
        };
        self.swap(current.game.version, record)?;
        Ok(next)
    }

    fn swap(&self, expected: Version, record: MatchRecord) -> Result<(), ResultError> {
        self.store
            .compare_and_swap(expected, record)
            .map_err(|err| {
                if let StoreError::VersionMismatch { match_id, .. } = &err {
                    log::warn!("Lost concurrent write on match {}", match_id);
                }
                ResultError::from(err)
            })
    }
}
