// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod query;
pub mod types;
pub mod watch;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_for_cli, ConfigFile};
use crate::engine::SystemClock;
use crate::errors::WaitError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::{resolve_targets, WatchRegistry};

pub use crate::engine::{spawn_coordinator, Coordinator, CoordinatorOptions, Timestamp};
pub use crate::query::parse_baseline;
pub use crate::watch::{start_watching, ChangeStream, StalkerOptions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the path stalker
/// - the broadcast coordinator
/// - Ctrl-C handling
/// - a long-poll client that prints every released timestamp
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_for_cli(&args)?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let changes = start_watching(&cfg.files(), cfg.stalker_options())?;
    let (coordinator, task) =
        spawn_coordinator(changes, SystemClock, cfg.coordinator_options());

    // Ctrl-C → turn waiters away and stop the coordinator.
    {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            coordinator.shutdown().await;
        });
    }

    follow_changes(&coordinator).await?;

    drop(coordinator);
    task.await?;
    Ok(())
}

/// Behave like a browser tab: wait, print, repeat with the new baseline.
async fn follow_changes(coordinator: &Coordinator) -> Result<()> {
    let mut baseline = coordinator.now().await?;
    info!(baseline, "ready; waiting for changes");

    loop {
        match coordinator.wait(baseline).await {
            Ok(t) => {
                println!("{t}");
                baseline = t;
            }
            Err(WaitError::TurnedAway) => return Ok(()),
            Err(e @ WaitError::Overloaded) => return Err(e.into()),
        }
    }
}

/// Print what would be watched without touching the OS watcher.
fn print_dry_run(cfg: &ConfigFile) -> Result<()> {
    let fs = RealFileSystem;
    let targets = resolve_targets(&fs, &cfg.files())?;

    let mut registry = WatchRegistry::new();
    for target in &targets {
        registry.register_target(target);
    }

    println!("livefire dry-run");
    println!("  watch.debounce_ms = {}", cfg.watch().debounce_ms);
    println!("  watch.event_buffer = {}", cfg.watch().event_buffer);
    println!(
        "  coordinator.initial_clock = {:?}",
        cfg.coordinator().initial_clock
    );
    println!("  coordinator.wait_queue = {}", cfg.coordinator().wait_queue);
    println!("  coordinator.max_pending = {}", cfg.coordinator().max_pending);
    println!();

    let requested = registry.targets();
    println!("targets ({}):", requested.len());
    for path in requested {
        let note = if fs.exists(path) { "" } else { "  (missing)" };
        println!("  - {}{note}", path.display());
    }

    let ancestors = registry.ancestors();
    println!("ancestor subscriptions ({}):", ancestors.len());
    for path in ancestors {
        println!("  - {}", path.display());
    }

    debug!("dry-run complete (nothing watched)");
    Ok(())
}
