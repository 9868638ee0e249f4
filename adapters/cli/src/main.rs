#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Bomber matches.
//!
//! Every seat is taken by an autopilot that steers through its own
//! [`PlayerView`], so a run exercises exactly the surface a real client would
//! use. Runs are fully determined by the match seed.

mod autopilot;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use bomber_core::{AgentKind, Command, Event, EventKind, EventRecorder};
use bomber_world::{query, PlayerView, SharedWorld, World};
use clap::Parser;
use tracing::{debug, info};

use crate::{autopilot::Autopilot, settings::MatchFile};

/// Runs a headless Bomber match with autopilot players.
#[derive(Debug, Parser)]
#[command(name = "bomber", version)]
struct Cli {
    /// TOML match file with `[game]` and `[run]` tables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the match seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the number of ticks per round.
    #[arg(long)]
    ticks: Option<u64>,
    /// Overrides the number of rounds.
    #[arg(long)]
    rounds: Option<u64>,
    /// Overrides the number of autopilot players.
    #[arg(long)]
    players: Option<usize>,
    /// Prints the board as seen by the first player after every tick.
    #[arg(long)]
    render: bool,
}

/// Entry point for the Bomber command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut file = match &cli.config {
        Some(path) => MatchFile::load(path)?,
        None => MatchFile::default(),
    };
    file.apply_overrides(&cli);

    run(&file, cli.render)
}

fn run(file: &MatchFile, show_board: bool) -> Result<()> {
    let seats = file.run.players.unwrap_or(file.game.player_spawns.len());
    ensure!(
        seats <= file.game.player_spawns.len(),
        "{seats} players requested but only {} spawns are configured",
        file.game.player_spawns.len()
    );

    let world = World::seeded(file.game.clone()).context("failed to build the world")?;
    let world = SharedWorld::new(world);

    let mut pilots = Vec::with_capacity(seats);
    let mut logs = Vec::with_capacity(seats);
    for seat in 0..seats {
        let recorder = EventRecorder::new();
        let view = PlayerView::join(&world, recorder.clone())
            .with_context(|| format!("seat {seat} could not join"))?;
        let seed = file.game.seed.wrapping_add(seat as u64 + 1);
        info!(seat, agent = %view.agent_id(), "autopilot seated");
        pilots.push(Autopilot::new(view, seed));
        logs.push(recorder);
    }

    for round in 0..file.run.rounds {
        if round > 0 {
            world.apply(Command::NewGame, &mut Vec::new());
        }
        let ticks = play_round(&world, &mut pilots, file.run.ticks, show_board)?;
        let guard = world.lock();
        println!(
            "round {round}: {ticks} ticks, {} of {seats} players and {} hostiles alive",
            query::live_count(&guard, AgentKind::Player),
            query::live_count(&guard, AgentKind::Hostile),
        );
    }

    for (pilot, log) in pilots.iter().zip(&logs) {
        println!(
            "{}: {} deaths, {} hostiles killed",
            pilot.view().agent_id(),
            log.count(EventKind::AgentKilled),
            log.count(EventKind::HostileKilled),
        );
    }

    Ok(())
}

/// Plays until the tick limit or until every player is dead.
fn play_round(
    world: &SharedWorld,
    pilots: &mut [Autopilot],
    ticks: u64,
    show_board: bool,
) -> Result<u64> {
    let mut events: Vec<Event> = Vec::new();

    for tick in 1..=ticks {
        for pilot in pilots.iter_mut() {
            let intent = pilot.steer().context("autopilot lost its agent")?;
            debug!(agent = %pilot.view().agent_id(), ?intent, "autopilot steered");
        }

        events.clear();
        world.apply(Command::Tick, &mut events);
        for event in &events {
            info!(
                tick = event.tick,
                recipient = %event.recipient,
                victim = %event.victim,
                kind = ?event.kind,
                "event delivered"
            );
        }

        if show_board {
            if let Some(first) = pilots.first() {
                println!("tick {tick}\n{}", render::board(&first.view().snapshot()));
            }
        }

        if query::live_count(&world.lock(), AgentKind::Player) == 0 {
            return Ok(tick);
        }
    }

    Ok(ticks)
}
