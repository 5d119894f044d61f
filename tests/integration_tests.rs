// Integration tests for the survivor-pool draft engine.
//
// These tests exercise the full system end-to-end through the library
// crate's public API: pool assignment, the draft turn machine, slot
// eligibility under the overflow cascade, stat ingestion, and scoring.

use std::path::Path;
use std::sync::Once;

use gridpool::config::{parse_config, RoundSettings};
use gridpool::db::Database;
use gridpool::draft::pick::Position;
use gridpool::draft::pool::PoolStatus;
use gridpool::draft::turn::DraftService;
use gridpool::error::DraftError;
use gridpool::league::MemberRole;
use gridpool::stats::load_stat_lines_csv;

use rand::rngs::StdRng;
use rand::SeedableRng;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to project root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

static TRACING: Once = Once::new();

/// Route tracing output (the engine's data-integrity warnings included)
/// through the test harness. RUST_LOG controls verbosity.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const LEAGUE_TOML: &str = r#"
[league]
name = "Integration League"
pool_size = 4
db_path = ":memory:"

[league.slots]
qb = 1
rb = 2
wr = 2
te = 1
flex = 1
superflex = 1

[league.scoring]
wr_ppr = 1.0
te_ppr = 1.0
rb_ppr = 0.5
rec_yd = 0.1
rush_yd = 0.1
rush_td = 6.0
pass_td = 4.0
rec_td = 6.0
pass_yd = 0.04
fum = -2.0
int = -2.0
"#;

fn round_settings() -> RoundSettings {
    parse_config(LEAGUE_TOML, Path::new("league.toml"))
        .expect("inline config should parse")
        .settings
}

struct League {
    svc: DraftService,
    league_id: i64,
    round_id: i64,
    member_ids: Vec<i64>,
}

/// A league with `n` active members and one configured round, no pools yet.
fn league_of(n: usize) -> League {
    init_tracing();
    let svc = DraftService::new(Database::open(":memory:").expect("in-memory db"));
    let db = svc.db();
    let league_id = db.create_league("Integration League").unwrap();
    let member_ids: Vec<i64> = (0..n)
        .map(|i| {
            let id = db
                .add_member(
                    league_id,
                    &format!("Member {i}"),
                    &format!("member{i}@example.com"),
                    MemberRole::Member,
                )
                .unwrap();
            db.activate_member(id).unwrap();
            id
        })
        .collect();
    let round_id = db.create_round(league_id, 1).unwrap();
    db.save_round_settings(round_id, &round_settings()).unwrap();
    League {
        svc,
        league_id,
        round_id,
        member_ids,
    }
}

fn seed_players(db: &Database, position: Position, count: usize) -> Vec<i64> {
    (0..count)
        .map(|i| {
            db.upsert_player(
                &format!("{position} {i}"),
                &format!("T{i:02}"),
                position,
            )
            .unwrap()
        })
        .collect()
}

// ===========================================================================
// Pool assignment
// ===========================================================================

#[test]
fn twelve_members_partition_into_three_pools() {
    let lg = league_of(12);
    let mut rng = StdRng::seed_from_u64(3);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 3, &mut rng)
        .unwrap();
    assert_eq!(pools.len(), 3);

    let mut seen = Vec::new();
    for pool_id in &pools {
        let pool = lg.svc.db().load_pool(*pool_id).unwrap();
        assert_eq!(pool.status, PoolStatus::Drafting);
        assert_eq!(pool.draft_order.len(), 4);
        assert_eq!(pool.current, Some(pool.draft_order[0]));
        for team_id in &pool.draft_order {
            let team = lg.svc.db().load_team(*team_id).unwrap();
            seen.push(team.member_id);
        }
    }
    seen.sort_unstable();
    let mut expected = lg.member_ids.clone();
    expected.sort_unstable();
    assert_eq!(seen, expected, "every member assigned exactly once");
}

#[test]
fn remainder_members_sit_out_the_round() {
    let lg = league_of(11);
    let mut rng = StdRng::seed_from_u64(3);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 3, &mut rng)
        .unwrap();

    let assigned: usize = pools
        .iter()
        .map(|p| lg.svc.db().load_pool(*p).unwrap().draft_order.len())
        .sum();
    assert_eq!(assigned, 9);
}

// ===========================================================================
// The draft loop
// ===========================================================================

#[test]
fn a_full_draft_cycles_the_turn_and_fills_rosters() {
    let lg = league_of(3);
    let mut rng = StdRng::seed_from_u64(5);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 1, &mut rng)
        .unwrap();
    let pool_id = pools[0];
    let teams = lg.svc.db().load_pool(pool_id).unwrap().draft_order;

    // Eight slots per roster, three teams: 24 picks to a full pool.
    let db = lg.svc.db();
    let qbs = seed_players(db, Position::Quarterback, 6);
    let rbs = seed_players(db, Position::RunningBack, 9);
    let wrs = seed_players(db, Position::WideReceiver, 9);
    let tes = seed_players(db, Position::TightEnd, 6);

    // Each team drafts the same shape: 2 QB, 3 RB, 2 WR, 1 TE. That fills
    // qb + superflex with QBs and rb/wr/te/flex with the rest. Drive the
    // draft in turn order, each team following its shape.
    let shapes: Vec<Vec<i64>> = (0..3)
        .map(|i| {
            vec![
                qbs[i * 2],
                rbs[i * 3],
                wrs[i * 2],
                rbs[i * 3 + 1],
                wrs[i * 2 + 1],
                tes[i],
                rbs[i * 3 + 2],
                qbs[i * 2 + 1],
            ]
        })
        .collect();
    for round in 0..8 {
        for (i, team) in teams.iter().enumerate() {
            let pick = lg
                .svc
                .draft_player(pool_id, *team, shapes[i][round])
                .unwrap();
            assert_eq!(pick.pick_number as usize, round * 3 + i + 1);
        }
    }

    // Pointer is back on the first team after full cycles.
    let pool = lg.svc.db().load_pool(pool_id).unwrap();
    assert_eq!(pool.current, Some(teams[0]));

    // Every roster bucketed cleanly with nothing left over.
    for team in &teams {
        let buckets = lg.svc.roster(pool_id, *team).unwrap();
        assert_eq!(buckets.placed(), 8);
        assert!(buckets.overflow.is_empty());
        assert_eq!(buckets.qbs.len(), 1);
        assert_eq!(buckets.sfs.len(), 1);
        assert_eq!(buckets.flexs.len(), 1);
    }
}

#[test]
fn replaying_a_committed_pick_is_a_duplicate_not_a_double_draft() {
    let lg = league_of(2);
    let mut rng = StdRng::seed_from_u64(9);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 1, &mut rng)
        .unwrap();
    let pool_id = pools[0];
    let teams = lg.svc.db().load_pool(pool_id).unwrap().draft_order;
    let players = seed_players(lg.svc.db(), Position::WideReceiver, 1);

    lg.svc.draft_player(pool_id, teams[0], players[0]).unwrap();

    // A client replaying its request is now out of turn.
    let err = lg
        .svc
        .draft_player(pool_id, teams[0], players[0])
        .unwrap_err();
    assert!(matches!(err, DraftError::OutOfTurn { .. }));

    // And the next team trying the same player hits the uniqueness net.
    let err = lg
        .svc
        .draft_player(pool_id, teams[1], players[0])
        .unwrap_err();
    assert!(matches!(err, DraftError::DuplicatePick { .. }));

    assert_eq!(lg.svc.db().pool_picks(pool_id).unwrap().len(), 1);
}

#[test]
fn eligibility_cascade_end_to_end() {
    let lg = league_of(1);
    let db = lg.svc.db();
    let pool_id = db.create_pool(lg.round_id).unwrap();
    let team = db.create_team(pool_id, lg.member_ids[0], "Solo").unwrap();
    db.set_draft_order(pool_id, &[team]).unwrap();

    // Slots: rb 2, flex 1, superflex 1. Four RBs fit (primary, primary,
    // flex, superflex); the fifth has nowhere to go.
    let rbs = seed_players(db, Position::RunningBack, 6);
    for rb in &rbs[..4] {
        lg.svc.draft_player(pool_id, team, *rb).unwrap();
    }
    let err = lg.svc.draft_player(pool_id, team, rbs[4]).unwrap_err();
    assert!(matches!(err, DraftError::SlotUnavailable { .. }));

    // A QB still fits: its primary slot is untouched.
    let qb = seed_players(db, Position::Quarterback, 1);
    lg.svc.draft_player(pool_id, team, qb[0]).unwrap();

    let buckets = lg.svc.roster(pool_id, team).unwrap();
    assert_eq!(buckets.rbs.len(), 2);
    assert_eq!(buckets.flexs.len(), 1);
    assert_eq!(buckets.sfs.len(), 1);
    assert_eq!(buckets.qbs.len(), 1);
    assert!(buckets.overflow.is_empty());
}

// ===========================================================================
// Stat ingestion and scoring
// ===========================================================================

#[test]
fn csv_import_scores_a_roster() {
    let lg = league_of(1);
    let db = lg.svc.db();
    let pool_id = db.create_pool(lg.round_id).unwrap();
    let team = db.create_team(pool_id, lg.member_ids[0], "Solo").unwrap();
    db.set_draft_order(pool_id, &[team]).unwrap();

    let chase = db
        .upsert_player("Ja'Marr Chase", "CIN", Position::WideReceiver)
        .unwrap();
    let allen = db
        .upsert_player("Josh Allen", "BUF", Position::Quarterback)
        .unwrap();
    let bijan = db
        .upsert_player("Bijan Robinson", "ATL", Position::RunningBack)
        .unwrap();
    db.upsert_player("Sam LaPorta", "DET", Position::TightEnd)
        .unwrap();

    lg.svc.draft_player(pool_id, team, chase).unwrap();
    lg.svc.draft_player(pool_id, team, allen).unwrap();
    lg.svc.draft_player(pool_id, team, bijan).unwrap();

    let rows = load_stat_lines_csv(&Path::new(FIXTURES).join("stat_lines.csv")).unwrap();
    assert_eq!(rows.len(), 5);
    // "Retired Legend" matches no player and is skipped; LaPorta's line is
    // stored but he was never drafted here.
    let stored = db.import_stat_lines(lg.round_id, &rows).unwrap();
    assert_eq!(stored, 4);

    let summary = lg.svc.team_pool_score(pool_id, team).unwrap();
    // Chase (WR):  9*1.0 + 125*0.1 + 2*6.0              = 33.5
    // Allen (QB):  45*0.1 + 1*6.0 + 3*4.0 + 310*0.04
    //              - 1*2.0 - 1*2.0                      = 30.9
    // Bijan (RB):  4*0.5 + 32*0.1 + 105*0.1 + 1*6.0     = 21.7
    assert!((summary.total - 86.1).abs() < 1e-9);
    assert_eq!(summary.scored, 3);
    assert_eq!(summary.unscored, 0);
}

#[test]
fn unplayed_rounds_score_zero_but_are_visible() {
    let lg = league_of(1);
    let db = lg.svc.db();
    let pool_id = db.create_pool(lg.round_id).unwrap();
    let team = db.create_team(pool_id, lg.member_ids[0], "Solo").unwrap();
    db.set_draft_order(pool_id, &[team]).unwrap();

    let players = seed_players(db, Position::WideReceiver, 2);
    for p in &players {
        lg.svc.draft_player(pool_id, team, *p).unwrap();
    }

    let summary = lg.svc.team_pool_score(pool_id, team).unwrap();
    assert_eq!(summary.total, 0.0);
    assert_eq!(summary.scored, 0);
    assert_eq!(summary.unscored, 2);
}

#[test]
fn season_score_sums_each_round_under_its_own_settings() {
    let lg = league_of(1);
    let db = lg.svc.db();
    let member = lg.member_ids[0];

    let wr = db
        .upsert_player("Consistent WR", "CIN", Position::WideReceiver)
        .unwrap();

    // Round 1 at full PPR.
    let pool1 = db.create_pool(lg.round_id).unwrap();
    let team1 = db.create_team(pool1, member, "Round One").unwrap();
    db.set_draft_order(pool1, &[team1]).unwrap();
    lg.svc.draft_player(pool1, team1, wr).unwrap();

    // Round 2 at half PPR.
    let round2 = db.create_round(lg.league_id, 2).unwrap();
    let mut half = round_settings();
    half.scoring.wr_ppr = 0.5;
    db.save_round_settings(round2, &half).unwrap();
    let pool2 = db.create_pool(round2).unwrap();
    let team2 = db.create_team(pool2, member, "Round Two").unwrap();
    db.set_draft_order(pool2, &[team2]).unwrap();
    lg.svc.draft_player(pool2, team2, wr).unwrap();

    // Ten receptions in each round.
    for round in [lg.round_id, round2] {
        db.import_stat_lines(
            round,
            &[gridpool::stats::StatImportRow {
                player_name: "Consistent WR".into(),
                nfl_team: "CIN".into(),
                line: gridpool::stats::StatLine {
                    rec: 10,
                    ..Default::default()
                },
            }],
        )
        .unwrap();
    }

    let season = lg.svc.member_season_score(lg.league_id, member).unwrap();
    // 10 * 1.0 + 10 * 0.5
    assert!((season.total - 15.0).abs() < 1e-9);
    assert_eq!(season.scored, 2);
}

// ===========================================================================
// Failure recovery
// ===========================================================================

#[test]
fn stuck_turn_pointer_is_repaired_without_losing_the_pick() {
    let lg = league_of(2);
    let mut rng = StdRng::seed_from_u64(13);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 1, &mut rng)
        .unwrap();
    let pool_id = pools[0];
    let teams = lg.svc.db().load_pool(pool_id).unwrap().draft_order;
    let players = seed_players(lg.svc.db(), Position::RunningBack, 1);

    // A commit whose advance was lost: the pick exists, the pointer did
    // not move.
    lg.svc
        .db()
        .insert_pick(pool_id, teams[0], players[0])
        .unwrap()
        .unwrap();

    assert!(lg.svc.retry_advance(pool_id).unwrap());
    let pool = lg.svc.db().load_pool(pool_id).unwrap();
    assert_eq!(pool.current, Some(teams[1]));
    assert_eq!(lg.svc.db().pool_picks(pool_id).unwrap().len(), 1);

    // Retrying again changes nothing.
    assert!(!lg.svc.retry_advance(pool_id).unwrap());
}

#[test]
fn completed_pool_rejects_further_drafting() {
    let lg = league_of(2);
    let mut rng = StdRng::seed_from_u64(17);
    let pools = lg
        .svc
        .assign_pools(lg.league_id, lg.round_id, 1, &mut rng)
        .unwrap();
    let pool_id = pools[0];
    let teams = lg.svc.db().load_pool(pool_id).unwrap().draft_order;
    let players = seed_players(lg.svc.db(), Position::TightEnd, 1);

    lg.svc.complete_pool(pool_id).unwrap();
    let err = lg
        .svc
        .draft_player(pool_id, teams[0], players[0])
        .unwrap_err();
    assert!(matches!(err, DraftError::PoolClosed { .. }));

    // Scoring still works on a completed pool.
    let summary = lg.svc.team_pool_score(pool_id, teams[0]).unwrap();
    assert_eq!(summary.scored + summary.unscored, 0);
}
