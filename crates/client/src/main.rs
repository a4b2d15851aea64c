//! Arena client binary.
//!
//! Composition root that loads `.env` and CLI configuration, sets up
//! logging, loads entity templates, and runs a scripted skirmish while
//! printing every bus event.
//!
//! ```bash
//! cargo run -p arena-client -- --delay-ms 1500
//! RUST_LOG=debug cargo run -p arena-client -- --templates crates/game/content/data/entities.toml
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arena_client::{SkirmishOptions, describe, run_skirmish};
use clap::Parser;
use combat_content::TemplateLoader;
use combat_runtime::{Arena, Event, RuntimeConfig, Topic};
use tokio::sync::broadcast::Receiver;
use tokio::sync::broadcast::error::RecvError;

/// Scripted combat skirmish
#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Run a scripted combat skirmish", long_about = None)]
#[command(version)]
struct Cli {
    /// Template file (TOML or RON). Uses the built-in catalog when omitted
    #[arg(short, long, value_name = "PATH")]
    templates: Option<PathBuf>,

    /// Delay before the second entity's scheduled kill
    #[arg(long, value_name = "MS", default_value_t = 2_000)]
    delay_ms: u64,

    /// Template for the entity beaten to death
    #[arg(long, default_value = "grunt")]
    first: String,

    /// Template for the entity killed on a timer
    #[arg(long, default_value = "brute")]
    second: String,

    /// Leave the timed-out entity in the arena instead of removing it
    #[arg(long)]
    keep_corpse: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(arena_client::logging::env_filter())
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::from_env();
    tracing::info!("Persistence: {}", config.enable_persistence);

    let catalog = match &cli.templates {
        Some(path) => TemplateLoader::load(path)
            .with_context(|| format!("loading templates from {}", path.display()))?,
        None => TemplateLoader::builtin()?,
    };
    tracing::debug!("Templates: {:?}", catalog.names().collect::<Vec<_>>());

    let arena = Arena::builder().config(config).build()?;
    let printer = tokio::spawn(print_events([
        arena.subscribe(Topic::Combat),
        arena.subscribe(Topic::Lifecycle),
        arena.subscribe(Topic::Display),
    ]));

    let options = SkirmishOptions {
        first: cli.first,
        second: cli.second,
        kill_delay: Duration::from_millis(cli.delay_ms),
        force_destroy: !cli.keep_corpse,
    };
    let outcome = run_skirmish(&arena, &catalog, &options).await;

    // Stopping every worker closes the bus, which ends the printer once it
    // has drained what is already queued.
    arena.shutdown().await?;
    printer.await?;
    outcome?;

    tracing::info!("Arena shutdown complete");
    Ok(())
}

async fn print_events([mut combat, mut lifecycle, mut display]: [Receiver<Event>; 3]) {
    // A topic reports `Closed` only after its backlog is drained.
    let mut open = [true; 3];

    loop {
        let (topic, received) = tokio::select! {
            event = combat.recv(), if open[0] => (0, event),
            event = lifecycle.recv(), if open[1] => (1, event),
            event = display.recv(), if open[2] => (2, event),
            else => break,
        };
        match received {
            Ok(event) => println!("{}", describe(&event)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!("Event printer lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => open[topic] = false,
        }
    }
}
