// Library root: survivor-pool draft engine for fantasy football leagues.
//
// Pool allocation, turn-based drafting with roster eligibility, and
// stat-line scoring. Persistence is SQLite; the surrounding web/API layer
// is an external consumer of this crate.

pub mod config;
pub mod db;
pub mod draft;
pub mod error;
pub mod league;
pub mod scoring;
pub mod stats;
