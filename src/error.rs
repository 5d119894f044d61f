// Draft engine error taxonomy.

use thiserror::Error;

use crate::draft::pick::Position;

/// Everything that can go wrong while drafting or scoring.
///
/// The first three variants are user-correctable conditions surfaced
/// verbatim to the submitting client. `TurnAdvance` means a pick was
/// committed but the turn pointer did not move; callers recover with
/// `DraftService::retry_advance`, never by re-submitting the pick.
#[derive(Debug, Error)]
pub enum DraftError {
    /// The submitting team is not the pool's current team.
    #[error("Its not your turn to pick")]
    OutOfTurn { pool_id: i64, team_id: i64 },

    /// The candidate's position has no remaining primary, flex, or
    /// superflex capacity on the requesting roster.
    #[error("You don't have a spot for this player")]
    SlotUnavailable {
        team_id: i64,
        position: Position,
    },

    /// The player was already drafted in this pool (race or stale client).
    #[error("player {player_id} is already drafted in pool {pool_id}")]
    DuplicatePick { pool_id: i64, player_id: i64 },

    /// The pool is not in its drafting phase.
    #[error("pool {pool_id} is not drafting")]
    PoolClosed { pool_id: i64 },

    /// No round settings row exists for the round. Fatal for eligibility
    /// and scoring until an admin configures the round.
    #[error("no round settings configured for round {round_id}")]
    MissingSettings { round_id: i64 },

    /// The pick was committed but the conditional pointer update matched
    /// zero rows. The pick stands; only the advance is retried.
    #[error("pick {pick_number} committed in pool {pool_id} but the turn did not advance")]
    TurnAdvance { pool_id: i64, pick_number: u32 },

    /// Persistence-layer fault. Propagated as a hard failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DraftError {
    /// Whether the error is a user-driven, expected condition (as opposed
    /// to a configuration or storage fault).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DraftError::OutOfTurn { .. }
                | DraftError::SlotUnavailable { .. }
                | DraftError::DuplicatePick { .. }
        )
    }
}
