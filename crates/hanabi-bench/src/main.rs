use std::path::PathBuf;

use clap::Parser;

use hanabi_bench::config::{BenchmarkConfig, ResolvedOutputs};
use hanabi_bench::logging::init_logging;
use hanabi_bench::runner::SeriesRunner;

/// Batch runner for Bayesian Hanabi players.
#[derive(Debug, Parser)]
#[command(
    name = "hanabi-bench",
    author,
    version,
    about = "Deterministic Hanabi self-play harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the seed of the first deal.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Override the number of players per game.
    #[arg(long, value_name = "COUNT")]
    players: Option<usize>,

    /// Exit after validating the configuration.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = seed;
    }

    if let Some(players) = cli.players {
        config.games.players = players;
    }

    config.overlay_bot_env(|key| std::env::var(key).ok());
    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;
    let players = config.games.players;

    println!(
        "Loaded configuration '{run_id}': {games} game{} with {players} players, {} samples per move",
        if games == 1 { "" } else { "s" },
        config.bot.samples
    );

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SeriesRunner::new(config, outputs);
    let summary = runner.run()?;

    println!(
        "Run '{run_id}' complete: {} games, {} wins, {} crashes, average score {:.2} ({:.1} ms/game)",
        summary.games_played,
        summary.wins,
        summary.crashes,
        summary.average_score,
        summary.average_ms_per_game
    );
    println!("Game rows: {}", summary.jsonl_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
