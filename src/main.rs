//! Echolocation - Headless Room Runner
//!
//! Creates a room, lays out a pattern, joins a single participant and
//! prints every room event for a fixed number of ticks. Handy for hearing
//! (well, reading) what a layout does without a client attached.

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::broadcast::error::RecvError;

use echolocation::core::config::EngineConfig;
use echolocation::core::error::Result;
use echolocation::core::types::{ParticipantId, RoomCode};
use echolocation::pattern::Pattern;
use echolocation::room::{RoomEvent, RoomManager};

#[derive(Parser, Debug)]
#[command(name = "echolocation")]
#[command(about = "Run a grid sequencer room headless and print its events")]
struct Args {
    /// Engine configuration (TOML); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Room code to create
    #[arg(long, default_value = "1234")]
    room: String,

    /// Number of ticks to run before shutting down
    #[arg(long, default_value_t = 16)]
    ticks: u64,

    /// Tick period to request once the room is running (milliseconds)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed for a random layout instead of the demo layout
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("echolocation=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_toml(path)?,
        None => EngineConfig::default(),
    };
    tracing::info!("Echolocation starting (delay {}ms)", config.timing.default_delay_ms);

    let manager = RoomManager::new(config);
    let code = RoomCode::new(args.room.clone());
    let room = manager.create_room(code.clone()).await?;

    let pattern = match args.seed {
        Some(seed) => {
            tracing::info!("Using random layout with seed {}", seed);
            Pattern::random(seed, 0.25)
        }
        None => Pattern::demo(),
    };
    pattern.apply_to_room(&room).await?;

    let mut events = room.subscribe();
    let participant = ParticipantId::new();
    manager.join_room(&code, participant).await?;

    if let Some(delay_ms) = args.delay_ms {
        if let Err(e) = manager.submit_delay_change(&code, delay_ms).await {
            tracing::warn!("{}", e);
        }
    }

    let mut ticks_seen = 0;
    while ticks_seen < args.ticks {
        match events.recv().await {
            Ok(event) => {
                if matches!(event, RoomEvent::Tick(_)) {
                    ticks_seen += 1;
                }
                print_event(&event, &args.format)?;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Output fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    manager.leave_room(&code, &participant).await?;
    manager.delete_room(&code).await;
    tracing::info!("Ran {} ticks in room {}", ticks_seen, code);
    Ok(())
}

fn print_event(event: &RoomEvent, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }

    match event {
        RoomEvent::Tick(output) => {
            let played: Vec<String> = output
                .sounds
                .iter()
                .filter(|(_, sounds)| !sounds.is_empty())
                .map(|(instrument, sounds)| format!("{}: {}", instrument, sounds.pitches.join(" ")))
                .collect();
            if played.is_empty() {
                println!("tick {:>4} |", output.tick);
            } else {
                println!("tick {:>4} | {}", output.tick, played.join(" | "));
            }
        }
        RoomEvent::GridChanged(grid) => {
            let filled = grid.iter().filter(|(_, cell)| !cell.is_empty()).count();
            println!("grid changed: {} cells filled", filled);
        }
        RoomEvent::DelayChanged(delay) => {
            println!(
                "delay now {}ms (allowed {}-{}ms)",
                delay.delay_ms, delay.min_delay_ms, delay.max_delay_ms
            );
        }
    }
    Ok(())
}
