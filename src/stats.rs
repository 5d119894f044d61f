// Stat line ingestion and normalization.
//
// Reads weekly stat CSV files: one row per player with counting stats for
// a single round. Player identity is (name, NFL team), matched against the
// players table at import time.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A player's counting stats for one round.
///
/// Yardage fields are signed; a sacked-and-stripped runner can finish a
/// week negative. Everything else counts up from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatLine {
    pub rec: u32,
    pub rec_yds: i32,
    pub rush_yds: i32,
    pub rush_td: u32,
    pub pass_td: u32,
    pub rec_td: u32,
    pub pass_yds: i32,
    pub fum: u32,
    pub int: u32,
}

/// One imported CSV row: player identity plus the stat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatImportRow {
    pub player_name: String,
    pub nfl_team: String,
    pub line: StatLine,
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Stat provider CSV row. Counting stats arrive as f64 because some
/// providers export fractional values. Extra columns are silently ignored
/// via `#[serde(flatten)]`.
#[derive(Debug, Deserialize)]
#[allow(dead_code, non_snake_case)]
struct RawStatRow {
    Name: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    REC: f64,
    #[serde(default, alias = "RECYDS")]
    REC_YDS: f64,
    #[serde(default, alias = "RUSHYDS")]
    RUSH_YDS: f64,
    #[serde(default, alias = "RUSHTD")]
    RUSH_TD: f64,
    #[serde(default, alias = "PASSTD")]
    PASS_TD: f64,
    #[serde(default, alias = "RECTD")]
    REC_TD: f64,
    #[serde(default, alias = "PASSYDS")]
    PASS_YDS: f64,
    #[serde(default)]
    FUM: f64,
    #[serde(default)]
    INT: f64,
    /// Absorb any extra provider columns.
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loader (private, enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_stat_lines_from_reader<R: Read>(rdr: R) -> Result<Vec<StatImportRow>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut rows = Vec::new();
    for result in reader.deserialize::<RawStatRow>() {
        match result {
            Ok(raw) => {
                let counts = [
                    raw.REC, raw.REC_YDS, raw.RUSH_YDS, raw.RUSH_TD, raw.PASS_TD,
                    raw.REC_TD, raw.PASS_YDS, raw.FUM, raw.INT,
                ];
                if !all_finite(&counts) {
                    warn!("skipping stat row '{}': non-finite value", raw.Name.trim());
                    continue;
                }
                rows.push(StatImportRow {
                    player_name: raw.Name.trim().to_string(),
                    nfl_team: raw.Team.trim().to_string(),
                    line: StatLine {
                        rec: raw.REC.round().max(0.0) as u32,
                        rec_yds: raw.REC_YDS.round() as i32,
                        rush_yds: raw.RUSH_YDS.round() as i32,
                        rush_td: raw.RUSH_TD.round().max(0.0) as u32,
                        pass_td: raw.PASS_TD.round().max(0.0) as u32,
                        rec_td: raw.REC_TD.round().max(0.0) as u32,
                        pass_yds: raw.PASS_YDS.round() as i32,
                        fum: raw.FUM.round().max(0.0) as u32,
                        int: raw.INT.round().max(0.0) as u32,
                    },
                });
            }
            Err(e) => {
                warn!("skipping malformed stat row: {}", e);
            }
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load stat lines from a CSV file.
pub fn load_stat_lines_csv(path: &Path) -> Result<Vec<StatImportRow>, StatsError> {
    let file = std::fs::File::open(path).map_err(|e| StatsError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let rows = load_stat_lines_from_reader(file).map_err(|e| StatsError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    if rows.is_empty() {
        return Err(StatsError::Validation(
            "stat CSV produced zero valid rows".into(),
        ));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
