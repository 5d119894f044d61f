// Pool partitioning and draft-order generation.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lifecycle of a pool's draft.
///
/// `NotStarted` becomes `Drafting` when teams are assigned and the draft
/// order is seeded. `Complete` is set by an explicit administrative action,
/// never auto-detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolStatus {
    NotStarted,
    Drafting,
    Complete,
}

impl PoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolStatus::NotStarted => "not_started",
            PoolStatus::Drafting => "drafting",
            PoolStatus::Complete => "complete",
        }
    }

    pub fn from_str_status(s: &str) -> Option<Self> {
        match s {
            "not_started" => Some(PoolStatus::NotStarted),
            "drafting" => Some(PoolStatus::Drafting),
            "complete" => Some(PoolStatus::Complete),
            _ => None,
        }
    }
}

impl fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pool's persisted draft state.
///
/// While `status` is `Drafting`, `current` is always an element of
/// `draft_order`; once the pool completes, `current` is meaningless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub id: i64,
    pub round_id: i64,
    pub status: PoolStatus,
    /// Team ids in draft order. Turn order cycles through this circularly.
    pub draft_order: Vec<i64>,
    /// The team whose turn it is, while drafting.
    pub current: Option<i64>,
}

impl PoolState {
    /// The team drafting after `team_id`, circularly. `None` when the team
    /// is not in the draft order.
    pub fn next_team(&self, team_id: i64) -> Option<i64> {
        let idx = self.draft_order.iter().position(|&t| t == team_id)?;
        let next = (idx + 1) % self.draft_order.len();
        Some(self.draft_order[next])
    }
}

/// Partition members across pools and produce each pool's draft order.
///
/// Runs `floor(members / pools)` loops; in each loop every pool draws one
/// member uniformly at random, without replacement. The result is one
/// ordered member list per pool: creation order is draft order. Members
/// beyond the last full loop stay unassigned.
pub fn plan_pools<R: Rng>(
    member_ids: &[i64],
    pool_count: usize,
    rng: &mut R,
) -> Vec<Vec<i64>> {
    let mut plan = vec![Vec::new(); pool_count];
    if pool_count == 0 {
        return plan;
    }

    let mut remaining: Vec<i64> = member_ids.to_vec();
    let loops = member_ids.len() / pool_count;

    for _ in 0..loops {
        for pool in plan.iter_mut() {
            if remaining.is_empty() {
                break;
            }
            let idx = rng.random_range(0..remaining.len());
            pool.push(remaining.swap_remove(idx));
        }
    }

    plan
}
