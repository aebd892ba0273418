//! Live view: what viewers see, assembled from a tournament snapshot on every read.

use crate::logic::warnings::{scan_warnings, LiveWarning};
use crate::models::{
    GameMatch, GroupId, StageId, StageKind, StandingRow, Tournament, TournamentId,
};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// A match with its display label.
#[derive(Clone, Debug, Serialize)]
pub struct MatchView {
    #[serde(flatten)]
    pub game: GameMatch,
    pub status_label: &'static str,
}

impl From<GameMatch> for MatchView {
    fn from(game: GameMatch) -> Self {
        let status_label = game.status.label();
        Self { game, status_label }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct GroupView {
    pub id: GroupId,
    pub name: String,
    pub standings: Vec<StandingRow>,
    pub matches: Vec<MatchView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct StageView {
    pub id: StageId,
    pub name: String,
    /// Knockout matches with winners propagated. Empty for group stages.
    pub bracket: Vec<MatchView>,
    pub groups: Vec<GroupView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiveView {
    pub tournament_id: TournamentId,
    pub name: String,
    pub stages: Vec<StageView>,
    pub warnings: Vec<LiveWarning>,
}

/// Build the live view. Pure: the snapshot is not modified.
pub fn build_live_view(
    tournament: &Tournament,
    now: DateTime<Utc>,
    lookahead: Duration,
) -> LiveView {
    let stages = tournament
        .stages
        .iter()
        .map(|stage| match &stage.kind {
            StageKind::Knockout { matches } => StageView {
                id: stage.id,
                name: stage.name.clone(),
                bracket: crate::logic::resolve_advancement(matches)
                    .into_iter()
                    .map(MatchView::from)
                    .collect(),
                groups: Vec::new(),
            },
            StageKind::Group { groups } => StageView {
                id: stage.id,
                name: stage.name.clone(),
                bracket: Vec::new(),
                groups: groups
                    .iter()
                    .map(|g| GroupView {
                        id: g.id,
                        name: g.name.clone(),
                        standings: g.standings(&tournament.tie_break_rules, tournament.seed),
                        matches: g.matches.iter().cloned().map(MatchView::from).collect(),
                    })
                    .collect(),
            },
        })
        .collect();

    let warnings = scan_warnings(
        tournament.all_matches(),
        &tournament.participants,
        lookahead,
        now,
    );

    LiveView {
        tournament_id: tournament.id,
        name: tournament.name.clone(),
        stages,
        warnings,
    }
}

impl Tournament {
    /// See [`build_live_view`].
    pub fn live_view(&self, now: DateTime<Utc>, lookahead: Duration) -> LiveView {
        build_live_view(self, now, lookahead)
    }
}
