// The draft turn state machine: turn checks, pick commits, and pointer
// advancement, plus the scoring entry points that hang off the same
// service.

use rand::Rng;
use tracing::{info, warn};

use crate::db::Database;
use crate::draft::eligibility::is_pick_valid;
use crate::draft::pick::Pick;
use crate::draft::pool::{plan_pools, PoolStatus};
use crate::draft::roster::{bucket_roster, RosterBuckets};
use crate::error::DraftError;
use crate::scoring::{summarize, ScoreSummary};

/// Orchestrates drafting against the persistence layer.
///
/// Every pick runs the same gauntlet: pool open, turn check, eligibility,
/// commit, advance. The commit step's UNIQUE(pool_id, player_id)
/// constraint is the last line of defense against two clients racing for
/// one player; everything before it is best-effort screening on
/// possibly-stale reads.
pub struct DraftService {
    db: Database,
}

impl DraftService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    // ------------------------------------------------------------------
    // Pool assignment
    // ------------------------------------------------------------------

    /// Create `pool_count` pools for a round and randomly distribute the
    /// league's active members across them. Each pool gets a team per
    /// assigned member, a shuffled draft order, and opens for drafting.
    /// Returns the new pool ids.
    ///
    /// Members beyond the last full allocation loop are left out this
    /// round; the division is intentionally even.
    pub fn assign_pools<R: Rng>(
        &self,
        league_id: i64,
        round_id: i64,
        pool_count: usize,
        rng: &mut R,
    ) -> Result<Vec<i64>, DraftError> {
        let members = self.db.league_members(league_id)?;
        let active: Vec<i64> = members
            .iter()
            .filter(|m| m.status == crate::league::MemberStatus::Active)
            .map(|m| m.id)
            .collect();

        let plan = plan_pools(&active, pool_count, rng);
        let assigned: usize = plan.iter().map(Vec::len).sum();
        if assigned < active.len() {
            warn!(
                league_id,
                round_id,
                unassigned = active.len() - assigned,
                "active members left out of this round's pools"
            );
        }

        let mut pool_ids = Vec::with_capacity(plan.len());
        for pool_members in plan {
            let pool_id = self.db.create_pool(round_id)?;
            let mut order = Vec::with_capacity(pool_members.len());
            for member_id in pool_members {
                let name = members
                    .iter()
                    .find(|m| m.id == member_id)
                    .map(|m| m.name.as_str())
                    .unwrap_or("Member");
                let team_id =
                    self.db
                        .create_team(pool_id, member_id, &format!("{name}'s Team"))?;
                order.push(team_id);
            }
            self.db.set_draft_order(pool_id, &order)?;
            info!(pool_id, round_id, teams = order.len(), "pool opened for drafting");
            pool_ids.push(pool_id);
        }
        Ok(pool_ids)
    }

    // ------------------------------------------------------------------
    // Drafting
    // ------------------------------------------------------------------

    /// Submit a pick for `team_id` in `pool_id`.
    ///
    /// On success the pick is committed and the turn pointer has moved to
    /// the next team in the circular draft order. A `TurnAdvance` error
    /// means the pick IS committed but the pointer did not move (another
    /// writer touched it first); recover with [`retry_advance`], never by
    /// re-submitting the pick.
    ///
    /// [`retry_advance`]: DraftService::retry_advance
    pub fn draft_player(
        &self,
        pool_id: i64,
        team_id: i64,
        player_id: i64,
    ) -> Result<Pick, DraftError> {
        let pool = self.db.load_pool(pool_id)?;
        if pool.status != PoolStatus::Drafting {
            return Err(DraftError::PoolClosed { pool_id });
        }
        if pool.current != Some(team_id) {
            return Err(DraftError::OutOfTurn { pool_id, team_id });
        }

        let settings = self
            .db
            .load_round_settings(pool.round_id)?
            .ok_or(DraftError::MissingSettings {
                round_id: pool.round_id,
            })?;

        let player = self.db.load_player(player_id)?;
        let roster = self.db.team_picks(pool_id, team_id)?;
        if !is_pick_valid(player.position, &settings.slots, &roster) {
            return Err(DraftError::SlotUnavailable {
                team_id,
                position: player.position,
            });
        }

        let pick = self
            .db
            .insert_pick(pool_id, team_id, player_id)?
            .ok_or(DraftError::DuplicatePick { pool_id, player_id })?;

        info!(
            pool_id,
            team_id,
            player = %pick.player_name,
            pick_number = pick.pick_number,
            "pick committed"
        );

        let next = pool.next_team(team_id).ok_or(DraftError::TurnAdvance {
            pool_id,
            pick_number: pick.pick_number,
        })?;
        if !self.db.advance_turn(pool_id, team_id, next)? {
            warn!(pool_id, pick_number = pick.pick_number, "turn pointer did not advance");
            return Err(DraftError::TurnAdvance {
                pool_id,
                pick_number: pick.pick_number,
            });
        }

        Ok(pick)
    }

    /// Re-derive the expected turn pointer from the pool's last committed
    /// pick and advance it if it is still stuck there. Idempotent: returns
    /// `true` only when this call moved the pointer.
    pub fn retry_advance(&self, pool_id: i64) -> Result<bool, DraftError> {
        let pool = self.db.load_pool(pool_id)?;
        if pool.status != PoolStatus::Drafting {
            return Ok(false);
        }
        let Some(last) = self.db.last_pick(pool_id)? else {
            return Ok(false);
        };
        if pool.current != Some(last.team_id) {
            // Someone already advanced; nothing to repair.
            return Ok(false);
        }
        let Some(next) = pool.next_team(last.team_id) else {
            return Ok(false);
        };
        Ok(self.db.advance_turn(pool_id, last.team_id, next)?)
    }

    /// Close a pool's draft. Administrative.
    pub fn complete_pool(&self, pool_id: i64) -> Result<(), DraftError> {
        self.db.complete_pool(pool_id)?;
        info!(pool_id, "pool completed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Rosters and scoring
    // ------------------------------------------------------------------

    /// A team's picks bucketed into display slots under the pool's round
    /// settings.
    pub fn roster(&self, pool_id: i64, team_id: i64) -> Result<RosterBuckets, DraftError> {
        let pool = self.db.load_pool(pool_id)?;
        let settings = self
            .db
            .load_round_settings(pool.round_id)?
            .ok_or(DraftError::MissingSettings {
                round_id: pool.round_id,
            })?;
        let picks = self.db.team_picks(pool_id, team_id)?;
        Ok(bucket_roster(&picks, &settings.slots))
    }

    /// A team's total score for its pool's round.
    pub fn team_pool_score(&self, pool_id: i64, team_id: i64) -> Result<ScoreSummary, DraftError> {
        let pool = self.db.load_pool(pool_id)?;
        let settings = self
            .db
            .load_round_settings(pool.round_id)?
            .ok_or(DraftError::MissingSettings {
                round_id: pool.round_id,
            })?;
        let entries = self.db.pick_stat_lines(pool_id, team_id, pool.round_id)?;
        Ok(summarize(&entries, &settings.scoring))
    }

    /// A member's score summed over every team they fielded this season,
    /// each scored under its own round's settings.
    pub fn member_season_score(
        &self,
        league_id: i64,
        member_id: i64,
    ) -> Result<ScoreSummary, DraftError> {
        let mut season = ScoreSummary::default();
        for (team_id, pool_id, round_id) in self.db.member_team_rounds(league_id, member_id)? {
            let settings = self
                .db
                .load_round_settings(round_id)?
                .ok_or(DraftError::MissingSettings { round_id })?;
            let entries = self.db.pick_stat_lines(pool_id, team_id, round_id)?;
            season.merge(&summarize(&entries, &settings.scoring));
        }
        Ok(season)
    }
}
