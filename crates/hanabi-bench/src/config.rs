use hanabi_bot::BotParams;
use hanabi_core::game::state::{DEFAULT_LIVES, MAX_PLAYERS, MIN_PLAYERS};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    #[serde(default)]
    pub bot: BotParams,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        if self.bot.samples == 0 {
            return Err(ValidationError::InvalidField {
                field: "bot.samples".to_string(),
                message: "at least one sample per move is required".to_string(),
            });
        }
        for (label, value) in [
            ("bot.lives_weight", self.bot.lives_weight),
            ("bot.tokens_weight", self.bot.tokens_weight),
            ("bot.unwinnable_penalty", self.bot.unwinnable_penalty),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "weight must be a finite number".to_string(),
                });
            }
        }
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Lets `HANABI_BOT_*` variables from `read` override the `bot` block.
    pub fn overlay_bot_env<F>(&mut self, read: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        self.bot = self.bot.overlay(read);
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
        }
    }
}

/// How many games to play and how to set them up.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub count: usize,
    #[serde(default)]
    pub seed: u64,
    pub players: usize,
    #[serde(default = "default_lives")]
    pub lives: u8,
    /// Safety cap on turns per game; unset means play to the end.
    #[serde(default)]
    pub max_turns: Option<usize>,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }

        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ValidationError::InvalidField {
                field: "games.players".to_string(),
                message: format!(
                    "player count must be between {MIN_PLAYERS} and {MAX_PLAYERS}, got {}",
                    self.players
                ),
            });
        }

        if self.lives == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.lives".to_string(),
                message: "games need at least one life".to_string(),
            });
        }

        if self.max_turns == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "games.max_turns".to_string(),
                message: "turn cap must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn default_lives() -> u8 {
    DEFAULT_LIVES
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        if self.jsonl.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "path must not be empty".to_string(),
            });
        }

        let resolved = resolve_template(run_id, &self.jsonl);
        if resolved.components().count() == 0 {
            return Err(ValidationError::InvalidField {
                field: "outputs.jsonl".to_string(),
                message: "resolved path is invalid".to_string(),
            });
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.level.trim().is_empty() {
            self.level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
}

impl ResolvedOutputs {
    /// Directory holding the structured log, next to the game rows.
    pub fn telemetry_dir(&self) -> PathBuf {
        self.jsonl
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASIC_YAML: &str = r#"
run_id: "stage0_smoke"
games:
  count: 16
  seed: 123
  players: 3
bot:
  samples: 40
  tokens_weight: 0.5
outputs:
  jsonl: "bench/out/{run_id}/games.jsonl"
logging:
  enable_structured: true
  level: "debug"
"#;

    fn field_of(err: ValidationError) -> String {
        match err {
            ValidationError::InvalidField { field, .. } => field,
        }
    }

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.games.lives, DEFAULT_LIVES);
        assert_eq!(cfg.games.max_turns, None);
        assert_eq!(cfg.bot.samples, 40);
        assert_eq!(cfg.bot.seed, BotParams::default().seed);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/stage0_smoke/games.jsonl")
        );
        assert_eq!(
            outputs.telemetry_dir(),
            PathBuf::from("bench/out/stage0_smoke")
        );
    }

    #[test]
    fn missing_bot_and_logging_fall_back_to_defaults() {
        let yaml = r#"
run_id: "plain"
games:
  count: 1
  players: 2
outputs:
  jsonl: "games.jsonl"
"#;
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(yaml).expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(cfg.bot, BotParams::default());
        assert!(!cfg.logging.enable_structured);
        assert_eq!(cfg.games.seed, 0);
        assert_eq!(cfg.resolved_outputs().telemetry_dir(), PathBuf::from("."));
    }

    #[test]
    fn bot_env_overrides_yaml_values() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.overlay_bot_env(|key| match key {
            "HANABI_BOT_SAMPLES" => Some("12".to_string()),
            "HANABI_BOT_SEED" => Some("99".to_string()),
            _ => None,
        });
        cfg.validate().expect("validate");

        assert_eq!(cfg.bot.samples, 12);
        assert_eq!(cfg.bot.seed, 99);
        assert!((cfg.bot.tokens_weight - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_run_id() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.run_id = "bad id!".to_string();
        let err = cfg.validate().expect_err("run id rejected");
        assert_eq!(field_of(err), "run_id");
    }

    #[test]
    fn rejects_player_counts_outside_the_rules() {
        for players in [1, 6] {
            let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
            cfg.games.players = players;
            let err = cfg.validate().expect_err("player count rejected");
            assert_eq!(field_of(err), "games.players");
        }
    }

    #[test]
    fn rejects_zero_games_and_zero_samples() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.games.count = 0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "games.count");

        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.bot.samples = 0;
        assert_eq!(field_of(cfg.validate().unwrap_err()), "bot.samples");
    }

    #[test]
    fn empty_level_is_normalized() {
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.logging.level = "  ".to_string();
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn from_path_reports_the_offending_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"run_id: [unterminated").expect("write yaml");

        let err = BenchmarkConfig::from_path(file.path()).expect_err("parse fails");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.path(), file.path());
    }
}
