// Roster-slot eligibility: the primary -> flex -> superflex overflow cascade.
//
// This module is the single implementation of the cascade. The eligibility
// check below and the roster bucketing in `draft::roster` both derive from
// it, so the two views can never disagree on slot priority.

use crate::config::SlotCounts;
use crate::draft::pick::{Pick, Position};

/// Counts of rostered picks per primary position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionTally {
    pub qb: u32,
    pub rb: u32,
    pub wr: u32,
    pub te: u32,
}

impl PositionTally {
    pub fn from_picks(picks: &[Pick]) -> Self {
        let mut tally = PositionTally::default();
        for pick in picks {
            tally.add(pick.position);
        }
        tally
    }

    pub fn add(&mut self, position: Position) {
        match position {
            Position::Quarterback => self.qb += 1,
            Position::RunningBack => self.rb += 1,
            Position::WideReceiver => self.wr += 1,
            Position::TightEnd => self.te += 1,
        }
    }

    pub fn count(&self, position: Position) -> u32 {
        match position {
            Position::Quarterback => self.qb,
            Position::RunningBack => self.rb,
            Position::WideReceiver => self.wr,
            Position::TightEnd => self.te,
        }
    }
}

/// Remaining capacity per slot category after applying the overflow
/// cascade to a roster.
///
/// Values can be negative: a negative primary count is that position's
/// overflow, which has already been charged against the flex pool (RB/WR/TE)
/// or the superflex pool (QB). A negative flex count has likewise been
/// charged against superflex. The deficits are global, not per-pick: when
/// several primaries are simultaneously overfull, all of their deficits
/// stack against the same flex pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpotLedger {
    pub qb: i64,
    pub rb: i64,
    pub wr: i64,
    pub te: i64,
    pub flex: i64,
    pub superflex: i64,
}

impl SpotLedger {
    /// Run the cascade for a roster tally under the given slot counts.
    pub fn new(slots: &SlotCounts, tally: &PositionTally) -> Self {
        let qb = i64::from(slots.qb) - i64::from(tally.qb);
        let rb = i64::from(slots.rb) - i64::from(tally.rb);
        let wr = i64::from(slots.wr) - i64::from(tally.wr);
        let te = i64::from(slots.te) - i64::from(tally.te);

        // Overfilled RB/WR/TE primaries spill into and consume flex
        // capacity. QB overflow never reaches flex.
        let flex = i64::from(slots.flex) + rb.min(0) + wr.min(0) + te.min(0);

        // Superflex absorbs whatever flex could not, plus QB overflow.
        let superflex = i64::from(slots.superflex) + flex.min(0) + qb.min(0);

        SpotLedger {
            qb,
            rb,
            wr,
            te,
            flex,
            superflex,
        }
    }

    /// Remaining primary spots for a position.
    pub fn primary(&self, position: Position) -> i64 {
        match position {
            Position::Quarterback => self.qb,
            Position::RunningBack => self.rb,
            Position::WideReceiver => self.wr,
            Position::TightEnd => self.te,
        }
    }

    /// Whether a candidate at `position` may legally join the roster,
    /// evaluated in strict priority order: primary, then flex, then
    /// superflex.
    pub fn admits(&self, position: Position) -> bool {
        if self.primary(position) > 0 {
            return true;
        }
        if position.is_flex_eligible() && self.flex > 0 {
            return true;
        }
        self.superflex > 0
    }
}

/// Whether `candidate` may legally fill a roster slot given the roster's
/// current composition and the round's slot configuration.
pub fn is_pick_valid(candidate: Position, slots: &SlotCounts, roster: &[Pick]) -> bool {
    let tally = PositionTally::from_picks(roster);
    SpotLedger::new(slots, &tally).admits(candidate)
}
