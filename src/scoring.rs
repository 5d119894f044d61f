// Fantasy scoring: per-player arithmetic and roster aggregation.

use serde::Serialize;

use crate::config::ScoringWeights;
use crate::draft::pick::Position;
use crate::stats::StatLine;

/// Score one player's stat line under a round's scoring weights. Purely
/// arithmetic, no side effects.
///
/// Receptions are rated by position. QBs score receptions at the WR rate;
/// the original scheme never grew a dedicated QB reception rate because
/// QB receptions are vanishingly rare. Preserved as-is rather than
/// silently corrected.
pub fn score_player(position: Position, stats: &StatLine, weights: &ScoringWeights) -> f64 {
    let ppr = match position {
        Position::Quarterback | Position::WideReceiver => weights.wr_ppr,
        Position::TightEnd => weights.te_ppr,
        Position::RunningBack => weights.rb_ppr,
    };

    let mut score = ppr * f64::from(stats.rec);
    score += weights.rec_yd * f64::from(stats.rec_yds);
    score += weights.rush_yd * f64::from(stats.rush_yds);
    score += weights.rush_td * f64::from(stats.rush_td);
    score += weights.pass_td * f64::from(stats.pass_td);
    score += weights.rec_td * f64::from(stats.rec_td);
    score += weights.pass_yd * f64::from(stats.pass_yds);
    score += weights.fum * f64::from(stats.fum);
    score += weights.int * f64::from(stats.int);
    score
}

/// An aggregated score with enough detail to tell "not played yet" apart
/// from "scored zero".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub total: f64,
    /// Picks that had a stat line.
    pub scored: usize,
    /// Picks with no stat line yet; these contribute zero to `total`.
    pub unscored: usize,
}

impl ScoreSummary {
    pub fn merge(&mut self, other: &ScoreSummary) {
        self.total += other.total;
        self.scored += other.scored;
        self.unscored += other.unscored;
    }
}

/// Sum pick scores for a set of (position, optional stat line) entries.
/// Missing stat lines (game not yet played) count as zero but are tracked
/// separately in the summary.
pub fn summarize(entries: &[(Position, Option<StatLine>)], weights: &ScoringWeights) -> ScoreSummary {
    let mut summary = ScoreSummary::default();
    for (position, stats) in entries {
        match stats {
            Some(line) => {
                summary.total += score_player(*position, line, weights);
                summary.scored += 1;
            }
            None => summary.unscored += 1,
        }
    }
    summary
}
