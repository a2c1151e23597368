//! Plays a batch of seeded games with Bayesian players and records one
//! JSONL row per game.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hanabi_bot::{BayesianPlayer, BotParams};
use hanabi_core::game::{Game, GameError, GameSummary, Table};
use hanabi_core::model::deck::Deck;
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs};

pub struct SeriesRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
}

/// Tally returned after a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub games_played: usize,
    pub wins: usize,
    pub crashes: usize,
    pub total_score: u32,
    pub average_score: f64,
    pub average_ms_per_game: f64,
    pub jsonl_path: PathBuf,
}

#[derive(Serialize)]
struct GameLogRow<'a> {
    run_id: &'a str,
    game_index: usize,
    deal_seed: u64,
    players: usize,
    elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a GameSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SeriesRunner {
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Self {
        Self { config, outputs }
    }

    /// Seed of the deck for game `index`.
    pub fn deal_seed(&self, index: usize) -> u64 {
        self.config.games.seed.wrapping_add(index as u64)
    }

    /// Plays every configured game, streaming rows to disk. A game that
    /// fails is logged and counted as a crash; the batch carries on.
    pub fn run(&self) -> Result<SeriesSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);

        let games = &self.config.games;
        let mut wins = 0usize;
        let mut crashes = 0usize;
        let mut total_score = 0u32;
        let mut total_ms = 0f64;

        for game_index in 0..games.count {
            let deal_seed = self.deal_seed(game_index);
            let start = Instant::now();
            let result = self.play_game(game_index, deal_seed);
            let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;
            total_ms += elapsed_ms;

            let (summary, error) = match &result {
                Ok(summary) => {
                    total_score += summary.score;
                    if summary.outcome.is_some_and(|outcome| outcome.is_win()) {
                        wins += 1;
                    }
                    event!(
                        target: "hanabi_bench::run",
                        Level::INFO,
                        run_id = %self.config.run_id,
                        game_index,
                        deal_seed,
                        score = summary.score,
                        turns = summary.turns,
                        elapsed_ms,
                        "game finished"
                    );
                    (Some(summary), None)
                }
                Err(err) => {
                    crashes += 1;
                    event!(
                        target: "hanabi_bench::run",
                        Level::WARN,
                        run_id = %self.config.run_id,
                        game_index,
                        deal_seed,
                        error = %err,
                        "game crashed"
                    );
                    (None, Some(err.to_string()))
                }
            };

            let row = GameLogRow {
                run_id: &self.config.run_id,
                game_index,
                deal_seed,
                players: games.players,
                elapsed_ms,
                summary,
                error,
            };
            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;

        let finished = games.count - crashes;
        Ok(SeriesSummary {
            games_played: games.count,
            wins,
            crashes,
            total_score,
            average_score: if finished == 0 {
                0.0
            } else {
                f64::from(total_score) / finished as f64
            },
            average_ms_per_game: total_ms / games.count as f64,
            jsonl_path: self.outputs.jsonl.clone(),
        })
    }

    fn play_game(&self, game_index: usize, deal_seed: u64) -> Result<GameSummary, GameError> {
        let games = &self.config.games;
        let game = Game::with_lives(
            games.players,
            Deck::shuffled_with_seed(deal_seed),
            games.lives,
        )?;
        let mut table = Table::new(game);
        for seat in 0..games.players {
            let params = seat_params(&self.config.bot, deal_seed, seat);
            table.register(Box::new(BayesianPlayer::new(seat, params)))?;
        }

        if tracing::enabled!(Level::DEBUG) {
            event!(
                target: "hanabi_bench::run",
                Level::DEBUG,
                game_index,
                deal_seed,
                players = games.players,
                samples = self.config.bot.samples,
                "game started"
            );
        }

        table.run(games.max_turns, VecDeque::new())
    }
}

/// Each seat gets its own stream, derived from the configured seed and the deal.
fn seat_params(base: &BotParams, deal_seed: u64, seat: usize) -> BotParams {
    let seed = base
        .seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(deal_seed)
        .wrapping_add(seat as u64);
    base.with_seed(seed)
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
