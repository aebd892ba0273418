//! Offline renderer for tournament snapshots.
//! Run with: cargo run --bin live -- snapshot.json [view|warnings|standings]
//! `view` (default) and `warnings` print JSON; `standings` prints every group as CSV.
//! Settings come from the environment, see `EngineConfig`.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use live_tournament_results::models::StageKind;
use live_tournament_results::{scan_warnings, EngineConfig, Tournament};
use serde::Serialize;
use std::io;

#[derive(Debug, Clone, Copy)]
enum Mode {
    View,
    Warnings,
    Standings,
}

fn parse_mode(arg: Option<&str>) -> Result<Mode> {
    match arg {
        None | Some("view") => Ok(Mode::View),
        Some("warnings") => Ok(Mode::Warnings),
        Some("standings") => Ok(Mode::Standings),
        Some(other) => bail!("unknown mode {:?}, expected view, warnings or standings", other),
    }
}

#[derive(Serialize)]
struct StandingsLine<'a> {
    stage: &'a str,
    group: &'a str,
    rank: usize,
    participant: u64,
    label: &'a str,
    played: u32,
    wins: u32,
    losses: u32,
    set_diff: i64,
    game_diff: i64,
}

fn write_standings(tournament: &Tournament) -> Result<()> {
    let mut out = csv::Writer::from_writer(io::stdout());
    for stage in &tournament.stages {
        let StageKind::Group { groups } = &stage.kind else {
            continue;
        };
        for group in groups {
            let rows = group.standings(&tournament.tie_break_rules, tournament.seed);
            for (i, row) in rows.iter().enumerate() {
                let label = tournament
                    .participant(row.participant)
                    .map(|p| p.label.as_str())
                    .unwrap_or("");
                out.serialize(StandingsLine {
                    stage: &stage.name,
                    group: &group.name,
                    rank: i + 1,
                    participant: row.participant,
                    label,
                    played: row.played,
                    wins: row.wins,
                    losses: row.losses,
                    set_diff: row.set_diff,
                    game_diff: row.game_diff,
                })?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: live <snapshot.json> [view|warnings|standings]");
    };
    let mode = parse_mode(args.next().as_deref())?;

    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let mut tournament: Tournament =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;

    let config = EngineConfig::from_env();
    config.apply(&mut tournament);
    log::info!(
        "Loaded tournament {} ({} stage(s), {} participant(s))",
        tournament.id,
        tournament.stages.len(),
        tournament.participants.len()
    );

    let now = Utc::now();
    match mode {
        Mode::View => {
            let view = tournament.live_view(now, config.lookahead());
            serde_json::to_writer_pretty(io::stdout(), &view)?;
            println!();
        }
        Mode::Warnings => {
            let warnings = scan_warnings(
                tournament.all_matches(),
                &tournament.participants,
                config.lookahead(),
                now,
            );
            serde_json::to_writer_pretty(io::stdout(), &warnings)?;
            println!();
        }
        Mode::Standings => write_standings(&tournament)?,
    }
    Ok(())
}
