// Player positions and individual pick records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// NFL positions eligible for survivor-pool rosters.
///
/// The position is a single closed set; there is exactly one source of
/// truth for a player's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
}

impl Position {
    /// Parse a position abbreviation ("QB", "RB", "WR", "TE"), case
    /// insensitively.
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "QB" => Some(Position::Quarterback),
            "RB" => Some(Position::RunningBack),
            "WR" => Some(Position::WideReceiver),
            "TE" => Some(Position::TightEnd),
            _ => None,
        }
    }

    /// The display abbreviation for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
        }
    }

    /// Whether the position may occupy a flex slot. QBs overflow only into
    /// superflex, never flex.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// All positions, in cascade evaluation order.
    pub const ALL: [Position; 4] = [
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
    ];
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// An NFL athlete. Immutable reference data, refreshed externally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    /// NFL team abbreviation (e.g. "KC", "PHI").
    pub nfl_team: String,
    pub position: Position,
}

/// A committed draft pick: one player on one team's roster within a pool.
///
/// A player can be picked at most once per pool. `pick_number` is the
/// pool-wide draft sequence, used for turn bookkeeping and ADP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    pub id: i64,
    pub pool_id: i64,
    pub team_id: i64,
    pub player_id: i64,
    /// 1-indexed, monotonic within the pool.
    pub pick_number: u32,
    pub player_name: String,
    pub position: Position,
}
