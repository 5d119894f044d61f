// Roster aggregation: bucketing a team's picks into named display slots.

use serde::Serialize;
use tracing::warn;

use crate::config::SlotCounts;
use crate::draft::pick::{Pick, Position};

/// A team's picks bucketed into named roster slots.
///
/// Buckets are filled in pick insertion order with the same priority as the
/// eligibility cascade: primary position first, then flex (RB/WR/TE only),
/// then superflex. Re-running with the same picks yields the same buckets.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RosterBuckets {
    pub qbs: Vec<Pick>,
    pub rbs: Vec<Pick>,
    pub wrs: Vec<Pick>,
    pub tes: Vec<Pick>,
    pub flexs: Vec<Pick>,
    pub sfs: Vec<Pick>,
    /// Picks that fit no slot. Eligibility enforcement at draft time means
    /// this should stay empty; anything here is a data-integrity signal,
    /// not a runtime error.
    pub overflow: Vec<Pick>,
}

impl RosterBuckets {
    /// Number of picks placed in a slot (excludes overflow).
    pub fn placed(&self) -> usize {
        self.qbs.len()
            + self.rbs.len()
            + self.wrs.len()
            + self.tes.len()
            + self.flexs.len()
            + self.sfs.len()
    }

    fn primary_mut(&mut self, position: Position) -> &mut Vec<Pick> {
        match position {
            Position::Quarterback => &mut self.qbs,
            Position::RunningBack => &mut self.rbs,
            Position::WideReceiver => &mut self.wrs,
            Position::TightEnd => &mut self.tes,
        }
    }

    fn primary_cap(slots: &SlotCounts, position: Position) -> usize {
        let cap = match position {
            Position::Quarterback => slots.qb,
            Position::RunningBack => slots.rb,
            Position::WideReceiver => slots.wr,
            Position::TightEnd => slots.te,
        };
        cap as usize
    }
}

/// Bucket a team's picks (already filtered to one pool) into named slots.
pub fn bucket_roster(picks: &[Pick], slots: &SlotCounts) -> RosterBuckets {
    let mut buckets = RosterBuckets::default();

    for pick in picks {
        let pos = pick.position;

        if buckets.primary_mut(pos).len() < RosterBuckets::primary_cap(slots, pos) {
            buckets.primary_mut(pos).push(pick.clone());
        } else if pos.is_flex_eligible() && buckets.flexs.len() < slots.flex as usize {
            buckets.flexs.push(pick.clone());
        } else if buckets.sfs.len() < slots.superflex as usize {
            buckets.sfs.push(pick.clone());
        } else {
            warn!(
                pool_id = pick.pool_id,
                team_id = pick.team_id,
                player = %pick.player_name,
                "roster has more picks than slots; pick left out of buckets"
            );
            buckets.overflow.push(pick.clone());
        }
    }

    buckets
}
