use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forge_core::{from_lean, step, to_lean, GameState, LeanSnapshot};
use forge_content::{default_content, load_content};
use forge_session::{unix_ms, CommandSource, GreedyPilot};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "forge_cli", about = "Starforge headless runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate autoplay for a fixed amount of game time.
    Run {
        /// Simulated seconds to play.
        #[arg(long)]
        seconds: u64,
        /// Simulated seconds per step.
        #[arg(long, default_value_t = 1.0)]
        step_seconds: f64,
        /// Load a lean snapshot JSON before playing.
        #[arg(long)]
        load: Option<PathBuf>,
        /// Write the final lean snapshot JSON here.
        #[arg(long)]
        save: Option<PathBuf>,
        /// Content override JSON (defaults to the shipped catalog).
        #[arg(long)]
        content: Option<PathBuf>,
        /// Print progress every N simulated seconds.
        #[arg(long, default_value_t = 600)]
        print_every: u64,
    },
}

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

fn run(
    seconds: u64,
    step_seconds: f64,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    content_path: Option<PathBuf>,
    print_every: u64,
) -> Result<()> {
    let content = match content_path {
        Some(path) => load_content(&path)?,
        None => default_content(),
    };
    let now = unix_ms();
    let mut state = match load {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            let snapshot: LeanSnapshot = serde_json::from_str(&text)
                .with_context(|| format!("parsing snapshot {}", path.display()))?;
            from_lean(&snapshot, &content, now)
        }
        None => GameState::new(&content, now),
    };

    let mut pilot = GreedyPilot;
    let mut simulated = 0.0_f64;
    let mut next_print = 0u64;
    while simulated < seconds as f64 {
        let commands = pilot.next_commands(&state, &content);
        step(&mut state, &content, step_seconds, &commands);
        simulated += step_seconds;

        if print_every > 0 && simulated >= next_print as f64 {
            println!(
                "t={simulated:>10.0}s energy={} ({}/s) stardust={} ascensions={} prestige={}",
                state.energy,
                forge_core::energy_per_second(&state, &content),
                state.stardust,
                state.statistics.total_ascensions,
                state.prestige.level,
            );
            next_print += print_every;
        }
    }

    println!(
        "final: energy={} stardust={} ascensions={} prestige level={} multiplier={}",
        state.energy,
        state.stardust,
        state.statistics.total_ascensions,
        state.prestige.level,
        state.prestige.multiplier,
    );

    if let Some(path) = save {
        forge_core::touch(&mut state, unix_ms());
        let body = serde_json::to_string_pretty(&to_lean(&state))
            .context("serializing final snapshot")?;
        std::fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        println!("snapshot written to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            seconds,
            step_seconds,
            load,
            save,
            content,
            print_every,
        } => run(seconds, step_seconds, load, save, content, print_every),
    }
}
