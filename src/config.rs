// Configuration loading and parsing (league.toml).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Round settings value objects
// ---------------------------------------------------------------------------

/// Per-position roster slot counts for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCounts {
    pub qb: u32,
    pub rb: u32,
    pub wr: u32,
    pub te: u32,
    pub flex: u32,
    pub superflex: u32,
}

impl SlotCounts {
    /// Total roster size under this configuration.
    pub fn total(&self) -> u32 {
        self.qb + self.rb + self.wr + self.te + self.flex + self.superflex
    }
}

/// Per-stat scoring weights for one round.
///
/// Turnover weights (`fum`, `int`) are typically negative. QB receptions
/// score at `wr_ppr`; there is no dedicated QB reception rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub wr_ppr: f64,
    pub te_ppr: f64,
    pub rb_ppr: f64,
    pub rec_yd: f64,
    pub rush_yd: f64,
    pub rush_td: f64,
    pub pass_td: f64,
    pub rec_td: f64,
    pub pass_yd: f64,
    pub fum: f64,
    pub int: f64,
}

/// The full per-round configuration: slot counts plus scoring weights.
///
/// Shared by reference from every pick scored under the round; never
/// mutated by the draft or scoring paths. An admin update changes future
/// eligibility and scoring but does not invalidate committed picks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSettings {
    pub slots: SlotCounts,
    pub scoring: ScoringWeights,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LeagueSection {
    name: String,
    pool_size: usize,
    db_path: String,
    slots: SlotCounts,
    scoring: ScoringWeights,
}

/// The assembled configuration: league identity plus the default round
/// settings used when an admin creates a new round.
#[derive(Debug, Clone)]
pub struct Config {
    pub league_name: String,
    /// Target number of teams per pool.
    pub pool_size: usize,
    pub db_path: String,
    pub settings: RoundSettings,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to
/// the given `base_dir`.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let league_text = read_file(&league_path)?;
    parse_config(&league_text, &league_path)
}

/// Convenience wrapper: loads config relative to the current working
/// directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_from(&cwd)
}

/// Parse and validate a league.toml document. `path` is only used for
/// error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let league_file: LeagueFile =
        toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    let league = league_file.league;

    let config = Config {
        league_name: league.name,
        pool_size: league.pool_size,
        db_path: league.db_path,
        settings: RoundSettings {
            slots: league.slots,
            scoring: league.scoring,
        },
    };

    validate(&config)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate round settings independently of a config file. Used both at
/// config load and before an admin upserts settings for a round.
pub fn validate_settings(settings: &RoundSettings) -> Result<(), ConfigError> {
    if settings.slots.total() == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.slots".into(),
            message: "at least one roster slot is required".into(),
        });
    }

    let w = &settings.scoring;
    let weight_fields: &[(&str, f64)] = &[
        ("scoring.wr_ppr", w.wr_ppr),
        ("scoring.te_ppr", w.te_ppr),
        ("scoring.rb_ppr", w.rb_ppr),
        ("scoring.rec_yd", w.rec_yd),
        ("scoring.rush_yd", w.rush_yd),
        ("scoring.rush_td", w.rush_td),
        ("scoring.pass_td", w.pass_td),
        ("scoring.rec_td", w.rec_td),
        ("scoring.pass_yd", w.pass_yd),
        ("scoring.fum", w.fum),
        ("scoring.int", w.int),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number, got {val}"),
            });
        }
    }

    Ok(())
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league_name.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.name".into(),
            message: "must not be empty".into(),
        });
    }

    if config.pool_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.pool_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.db_path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.db_path".into(),
            message: "must not be empty".into(),
        });
    }

    validate_settings(&config.settings)
}
