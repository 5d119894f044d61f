// SQLite persistence layer for leagues, pools, and draft state.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::warn;

use crate::config::{validate_settings, RoundSettings};
use crate::draft::pick::{Pick, Player, Position};
use crate::draft::pool::{PoolState, PoolStatus};
use crate::league::{League, Member, MemberRole, MemberStatus, Team};
use crate::stats::{StatImportRow, StatLine};

/// SQLite-backed persistence for leagues, members, rounds, players, pools,
/// teams, picks, and stat lines.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS leagues (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL,
                admin_member_id INTEGER REFERENCES members(id),
                created_at      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS members (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                league_id  INTEGER NOT NULL REFERENCES leagues(id),
                name       TEXT NOT NULL,
                email      TEXT NOT NULL,
                status     TEXT NOT NULL,
                role       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(league_id, email)
            );

            CREATE TABLE IF NOT EXISTS rounds (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                league_id  INTEGER NOT NULL REFERENCES leagues(id),
                number     INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(league_id, number)
            );

            CREATE TABLE IF NOT EXISTS round_settings (
                round_id INTEGER PRIMARY KEY REFERENCES rounds(id),
                settings TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS players (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT NOT NULL,
                nfl_team TEXT NOT NULL,
                position TEXT NOT NULL,
                UNIQUE(name, nfl_team)
            );

            CREATE TABLE IF NOT EXISTS pools (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                round_id    INTEGER NOT NULL REFERENCES rounds(id),
                status      TEXT NOT NULL DEFAULT 'not_started',
                draft_order TEXT NOT NULL DEFAULT '[]',
                current     INTEGER,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS teams (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                pool_id   INTEGER NOT NULL REFERENCES pools(id),
                member_id INTEGER NOT NULL REFERENCES members(id),
                name      TEXT NOT NULL,
                UNIQUE(pool_id, member_id)
            );

            CREATE TABLE IF NOT EXISTS picks (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                pool_id     INTEGER NOT NULL REFERENCES pools(id),
                team_id     INTEGER NOT NULL REFERENCES teams(id),
                player_id   INTEGER NOT NULL REFERENCES players(id),
                pick_number INTEGER NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
                UNIQUE(pool_id, player_id),
                UNIQUE(pool_id, pick_number)
            );

            CREATE TABLE IF NOT EXISTS stat_lines (
                player_id INTEGER NOT NULL REFERENCES players(id),
                round_id  INTEGER NOT NULL REFERENCES rounds(id),
                rec       INTEGER NOT NULL,
                rec_yds   INTEGER NOT NULL,
                rush_yds  INTEGER NOT NULL,
                rush_td   INTEGER NOT NULL,
                pass_td   INTEGER NOT NULL,
                rec_td    INTEGER NOT NULL,
                pass_yds  INTEGER NOT NULL,
                fum       INTEGER NOT NULL,
                int       INTEGER NOT NULL,
                PRIMARY KEY (player_id, round_id)
            );
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    // ------------------------------------------------------------------
    // Leagues and members
    // ------------------------------------------------------------------

    /// Create a league and return its id. The admin is designated later,
    /// once the founding member row exists.
    pub fn create_league(&self, name: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO leagues (name, created_at) VALUES (?1, ?2)",
            params![name, Self::now()],
        )
        .context("failed to create league")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn load_league(&self, league_id: i64) -> Result<League> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, admin_member_id FROM leagues WHERE id = ?1",
            params![league_id],
            |row| {
                Ok(League {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    admin_member_id: row.get(2)?,
                })
            },
        )
        .with_context(|| format!("failed to load league {league_id}"))
    }

    /// Add a member in the `pending` state. Re-inviting the same email to
    /// the same league is rejected by the UNIQUE constraint.
    pub fn add_member(
        &self,
        league_id: i64,
        name: &str,
        email: &str,
        role: MemberRole,
    ) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO members (league_id, name, email, status, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                league_id,
                name,
                email,
                MemberStatus::Pending.as_str(),
                role.as_str(),
                Self::now(),
            ],
        )
        .context("failed to add member")?;
        Ok(conn.last_insert_rowid())
    }

    /// Flip a member from pending to active.
    pub fn activate_member(&self, member_id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "UPDATE members SET status = ?1 WHERE id = ?2",
            params![MemberStatus::Active.as_str(), member_id],
        )
        .context("failed to activate member")?;
        Ok(())
    }

    /// Record which member administers the league.
    pub fn set_league_admin(&self, league_id: i64, member_id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "UPDATE leagues SET admin_member_id = ?1 WHERE id = ?2",
            params![member_id, league_id],
        )
        .context("failed to set league admin")?;
        conn.execute(
            "UPDATE members SET role = ?1 WHERE id = ?2",
            params![MemberRole::Admin.as_str(), member_id],
        )
        .context("failed to set member role")?;
        Ok(())
    }

    /// All members of a league, in join order.
    pub fn league_members(&self, league_id: i64) -> Result<Vec<Member>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id, league_id, name, email, status, role
                 FROM members WHERE league_id = ?1 ORDER BY id",
            )
            .context("failed to prepare league_members query")?;

        let members = stmt
            .query_map(params![league_id], Self::member_from_row)
            .context("failed to query members")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map member rows")?;
        Ok(members)
    }

    /// Ids of active members, the population eligible for pool assignment.
    pub fn active_member_ids(&self, league_id: i64) -> Result<Vec<i64>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT id FROM members
                 WHERE league_id = ?1 AND status = 'active' ORDER BY id",
            )
            .context("failed to prepare active_member_ids query")?;
        let ids = stmt
            .query_map(params![league_id], |row| row.get(0))
            .context("failed to query active members")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map active member rows")?;
        Ok(ids)
    }

    fn member_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Member> {
        let status_str: String = row.get(4)?;
        let role_str: String = row.get(5)?;
        let status = MemberStatus::from_str_status(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown member status '{status_str}'").into(),
            )
        })?;
        let role = MemberRole::from_str_role(&role_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown member role '{role_str}'").into(),
            )
        })?;
        Ok(Member {
            id: row.get(0)?,
            league_id: row.get(1)?,
            name: row.get(2)?,
            email: row.get(3)?,
            status,
            role,
        })
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    /// Insert a player or update their position if a `(name, nfl_team)` row
    /// already exists. Returns the player's row id in a single atomic
    /// statement.
    pub fn upsert_player(&self, name: &str, nfl_team: &str, position: Position) -> Result<i64> {
        let conn = self.conn();
        let id: i64 = conn
            .query_row(
                "INSERT INTO players (name, nfl_team, position)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(name, nfl_team) DO UPDATE SET
                    position = excluded.position
                 RETURNING id",
                params![name, nfl_team, position.display_str()],
                |row| row.get(0),
            )
            .context("failed to upsert player")?;
        Ok(id)
    }

    pub fn load_player(&self, player_id: i64) -> Result<Player> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, nfl_team, position FROM players WHERE id = ?1",
            params![player_id],
            |row| {
                let pos_str: String = row.get(3)?;
                let position = Position::from_str_pos(&pos_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        format!("unknown position '{pos_str}'").into(),
                    )
                })?;
                Ok(Player {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    nfl_team: row.get(2)?,
                    position,
                })
            },
        )
        .with_context(|| format!("failed to load player {player_id}"))
    }

    /// Mean pick number across every pool the player was ever drafted in.
    /// `None` until the player has been drafted at least once.
    pub fn average_draft_position(&self, player_id: i64) -> Result<Option<f64>> {
        let conn = self.conn();
        let adp: Option<f64> = conn
            .query_row(
                "SELECT AVG(pick_number) FROM picks WHERE player_id = ?1",
                params![player_id],
                |row| row.get(0),
            )
            .context("failed to compute average draft position")?;
        Ok(adp)
    }

    // ------------------------------------------------------------------
    // Rounds and settings
    // ------------------------------------------------------------------

    pub fn create_round(&self, league_id: i64, number: u32) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO rounds (league_id, number, created_at) VALUES (?1, ?2, ?3)",
            params![league_id, number, Self::now()],
        )
        .context("failed to create round")?;
        Ok(conn.last_insert_rowid())
    }

    /// Upsert the slot counts and scoring weights for a round. Stored as
    /// one JSON document; an update replaces the whole thing. Settings are
    /// validated before the write: a non-finite weight would serialize as
    /// JSON null and make the round unreadable.
    pub fn save_round_settings(&self, round_id: i64, settings: &RoundSettings) -> Result<()> {
        validate_settings(settings)
            .with_context(|| format!("invalid settings for round {round_id}"))?;
        let conn = self.conn();
        let json = serde_json::to_string(settings)
            .context("failed to serialize round settings")?;
        conn.execute(
            "INSERT OR REPLACE INTO round_settings (round_id, settings) VALUES (?1, ?2)",
            params![round_id, json],
        )
        .context("failed to save round settings")?;
        Ok(())
    }

    /// Load a round's settings. `None` when the admin has not configured
    /// the round yet.
    pub fn load_round_settings(&self, round_id: i64) -> Result<Option<RoundSettings>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT settings FROM round_settings WHERE round_id = ?1")
            .context("failed to prepare round settings query")?;
        let mut rows = stmt
            .query_map(params![round_id], |row| row.get::<_, String>(0))
            .context("failed to query round settings")?;

        match rows.next() {
            Some(row) => {
                let json = row.context("failed to read round settings row")?;
                let settings: RoundSettings = serde_json::from_str(&json)
                    .context("failed to deserialize round settings")?;
                Ok(Some(settings))
            }
            None => Ok(None),
        }
    }

    // ------------------------------------------------------------------
    // Pools
    // ------------------------------------------------------------------

    /// Create an empty pool in the `not_started` state.
    pub fn create_pool(&self, round_id: i64) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO pools (round_id, created_at) VALUES (?1, ?2)",
            params![round_id, Self::now()],
        )
        .context("failed to create pool")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn load_pool(&self, pool_id: i64) -> Result<PoolState> {
        let conn = self.conn();
        let (round_id, status_str, order_json, current): (i64, String, String, Option<i64>) =
            conn.query_row(
                "SELECT round_id, status, draft_order, current FROM pools WHERE id = ?1",
                params![pool_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .with_context(|| format!("failed to load pool {pool_id}"))?;

        let status = PoolStatus::from_str_status(&status_str)
            .with_context(|| format!("unknown pool status '{status_str}'"))?;
        let draft_order: Vec<i64> = serde_json::from_str(&order_json)
            .context("failed to deserialize draft order")?;

        Ok(PoolState {
            id: pool_id,
            round_id,
            status,
            draft_order,
            current,
        })
    }

    /// Seed a pool's draft order and open it for drafting. The first team
    /// in the order becomes the current team.
    pub fn set_draft_order(&self, pool_id: i64, team_ids: &[i64]) -> Result<()> {
        let conn = self.conn();
        let order_json =
            serde_json::to_string(team_ids).context("failed to serialize draft order")?;
        conn.execute(
            "UPDATE pools SET draft_order = ?1, current = ?2, status = ?3 WHERE id = ?4",
            params![
                order_json,
                team_ids.first(),
                PoolStatus::Drafting.as_str(),
                pool_id,
            ],
        )
        .context("failed to set draft order")?;
        Ok(())
    }

    /// Conditionally move the turn pointer. The UPDATE matches only when
    /// the pointer still reads `from` and the pool is drafting, so a
    /// concurrent advance loses cleanly. Returns whether a row changed.
    pub fn advance_turn(&self, pool_id: i64, from: i64, to: i64) -> Result<bool> {
        let conn = self.conn();
        let changed = conn
            .execute(
                "UPDATE pools SET current = ?1
                 WHERE id = ?2 AND current = ?3 AND status = 'drafting'",
                params![to, pool_id, from],
            )
            .context("failed to advance turn")?;
        Ok(changed == 1)
    }

    /// Close a pool. Administrative; there is no automatic detection of a
    /// finished draft.
    pub fn complete_pool(&self, pool_id: i64) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "UPDATE pools SET status = ?1, current = NULL WHERE id = ?2",
            params![PoolStatus::Complete.as_str(), pool_id],
        )
        .context("failed to complete pool")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------

    /// Create a team for a member within a pool. One team per member per
    /// pool, enforced by the UNIQUE constraint.
    pub fn create_team(&self, pool_id: i64, member_id: i64, name: &str) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO teams (pool_id, member_id, name) VALUES (?1, ?2, ?3)",
            params![pool_id, member_id, name],
        )
        .context("failed to create team")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn rename_team(&self, team_id: i64, name: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            "UPDATE teams SET name = ?1 WHERE id = ?2",
            params![name, team_id],
        )
        .context("failed to rename team")?;
        Ok(())
    }

    pub fn load_team(&self, team_id: i64) -> Result<Team> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, pool_id, member_id, name FROM teams WHERE id = ?1",
            params![team_id],
            |row| {
                Ok(Team {
                    id: row.get(0)?,
                    pool_id: row.get(1)?,
                    member_id: row.get(2)?,
                    name: row.get(3)?,
                })
            },
        )
        .with_context(|| format!("failed to load team {team_id}"))
    }

    /// A member's teams across every pool of a league's season, with each
    /// team's pool and round. Used for season-wide scoring.
    pub fn member_team_rounds(
        &self,
        league_id: i64,
        member_id: i64,
    ) -> Result<Vec<(i64, i64, i64)>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.pool_id, po.round_id
                 FROM teams t
                 JOIN pools po ON po.id = t.pool_id
                 JOIN rounds r ON r.id = po.round_id
                 WHERE t.member_id = ?1 AND r.league_id = ?2
                 ORDER BY r.number",
            )
            .context("failed to prepare member_team_rounds query")?;
        let rows = stmt
            .query_map(params![member_id, league_id], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .context("failed to query member teams")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map member team rows")?;
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Picks
    // ------------------------------------------------------------------

    /// Commit a pick. The pick number is assigned inside the INSERT from
    /// the pool's current maximum, and INSERT OR IGNORE makes a duplicate
    /// player a no-op. Returns `None` when the player was already drafted
    /// in this pool.
    pub fn insert_pick(
        &self,
        pool_id: i64,
        team_id: i64,
        player_id: i64,
    ) -> Result<Option<Pick>> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin pick transaction")?;

        let inserted = tx
            .execute(
                "INSERT OR IGNORE INTO picks (pool_id, team_id, player_id, pick_number)
                 VALUES (?1, ?2, ?3,
                    (SELECT COALESCE(MAX(pick_number), 0) + 1 FROM picks WHERE pool_id = ?1))",
                params![pool_id, team_id, player_id],
            )
            .context("failed to insert pick")?;

        if inserted == 0 {
            return Ok(None);
        }

        let pick = tx
            .query_row(
                "SELECT p.id, p.pool_id, p.team_id, p.player_id, p.pick_number,
                        pl.name, pl.position
                 FROM picks p JOIN players pl ON pl.id = p.player_id
                 WHERE p.id = last_insert_rowid()",
                [],
                Self::pick_from_row,
            )
            .context("failed to read back committed pick")?;

        tx.commit().context("failed to commit pick")?;
        Ok(Some(pick))
    }

    /// A team's picks in pick order, with player name and position joined
    /// in.
    pub fn team_picks(&self, pool_id: i64, team_id: i64) -> Result<Vec<Pick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT p.id, p.pool_id, p.team_id, p.player_id, p.pick_number,
                        pl.name, pl.position
                 FROM picks p JOIN players pl ON pl.id = p.player_id
                 WHERE p.pool_id = ?1 AND p.team_id = ?2
                 ORDER BY p.pick_number",
            )
            .context("failed to prepare team_picks query")?;
        let picks = stmt
            .query_map(params![pool_id, team_id], Self::pick_from_row)
            .context("failed to query team picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map team pick rows")?;
        Ok(picks)
    }

    /// Every pick in a pool, in pick order.
    pub fn pool_picks(&self, pool_id: i64) -> Result<Vec<Pick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT p.id, p.pool_id, p.team_id, p.player_id, p.pick_number,
                        pl.name, pl.position
                 FROM picks p JOIN players pl ON pl.id = p.player_id
                 WHERE p.pool_id = ?1
                 ORDER BY p.pick_number",
            )
            .context("failed to prepare pool_picks query")?;
        let picks = stmt
            .query_map(params![pool_id], Self::pick_from_row)
            .context("failed to query pool picks")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map pool pick rows")?;
        Ok(picks)
    }

    /// The most recent pick in a pool, if any.
    pub fn last_pick(&self, pool_id: i64) -> Result<Option<Pick>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT p.id, p.pool_id, p.team_id, p.player_id, p.pick_number,
                        pl.name, pl.position
                 FROM picks p JOIN players pl ON pl.id = p.player_id
                 WHERE p.pool_id = ?1
                 ORDER BY p.pick_number DESC LIMIT 1",
            )
            .context("failed to prepare last_pick query")?;
        let mut rows = stmt
            .query_map(params![pool_id], Self::pick_from_row)
            .context("failed to query last pick")?;
        match rows.next() {
            Some(row) => Ok(Some(row.context("failed to read last pick row")?)),
            None => Ok(None),
        }
    }

    fn pick_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Pick> {
        let pos_str: String = row.get(6)?;
        let position = Position::from_str_pos(&pos_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown position '{pos_str}'").into(),
            )
        })?;
        Ok(Pick {
            id: row.get(0)?,
            pool_id: row.get(1)?,
            team_id: row.get(2)?,
            player_id: row.get(3)?,
            pick_number: row.get(4)?,
            player_name: row.get(5)?,
            position,
        })
    }

    // ------------------------------------------------------------------
    // Stat lines
    // ------------------------------------------------------------------

    /// Import stat lines for a round in a single transaction. Rows whose
    /// (name, NFL team) matches no known player are skipped with a warning.
    /// Re-importing replaces prior lines. Returns the number of rows
    /// stored.
    pub fn import_stat_lines(&self, round_id: i64, rows: &[StatImportRow]) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin stat import transaction")?;

        let mut stored = 0;
        for row in rows {
            let player_id: Option<i64> = tx
                .query_row(
                    "SELECT id FROM players WHERE name = ?1 AND nfl_team = ?2",
                    params![row.player_name, row.nfl_team],
                    |r| r.get(0),
                )
                .optional()
                .context("failed to look up player for stat row")?;

            let Some(player_id) = player_id else {
                warn!(
                    player = %row.player_name,
                    team = %row.nfl_team,
                    "skipping stat row for unknown player"
                );
                continue;
            };

            tx.execute(
                "INSERT OR REPLACE INTO stat_lines
                    (player_id, round_id, rec, rec_yds, rush_yds, rush_td,
                     pass_td, rec_td, pass_yds, fum, int)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    player_id,
                    round_id,
                    row.line.rec,
                    row.line.rec_yds,
                    row.line.rush_yds,
                    row.line.rush_td,
                    row.line.pass_td,
                    row.line.rec_td,
                    row.line.pass_yds,
                    row.line.fum,
                    row.line.int,
                ],
            )
            .context("failed to insert stat line")?;
            stored += 1;
        }

        tx.commit().context("failed to commit stat import")?;
        Ok(stored)
    }

    /// A team's picks paired with their stat lines for a round. Picks
    /// whose player has no stat line yet come back as `None` (LEFT JOIN).
    pub fn pick_stat_lines(
        &self,
        pool_id: i64,
        team_id: i64,
        round_id: i64,
    ) -> Result<Vec<(Position, Option<StatLine>)>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare(
                "SELECT pl.position, s.rec, s.rec_yds, s.rush_yds, s.rush_td,
                        s.pass_td, s.rec_td, s.pass_yds, s.fum, s.int
                 FROM picks p
                 JOIN players pl ON pl.id = p.player_id
                 LEFT JOIN stat_lines s
                    ON s.player_id = p.player_id AND s.round_id = ?3
                 WHERE p.pool_id = ?1 AND p.team_id = ?2
                 ORDER BY p.pick_number",
            )
            .context("failed to prepare pick_stat_lines query")?;

        let entries = stmt
            .query_map(params![pool_id, team_id, round_id], |row| {
                let pos_str: String = row.get(0)?;
                let position = Position::from_str_pos(&pos_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Text,
                        format!("unknown position '{pos_str}'").into(),
                    )
                })?;
                let rec: Option<u32> = row.get(1)?;
                let line = match rec {
                    Some(rec) => Some(StatLine {
                        rec,
                        rec_yds: row.get(2)?,
                        rush_yds: row.get(3)?,
                        rush_td: row.get(4)?,
                        pass_td: row.get(5)?,
                        rec_td: row.get(6)?,
                        pass_yds: row.get(7)?,
                        fum: row.get(8)?,
                        int: row.get(9)?,
                    }),
                    None => None,
                };
                Ok((position, line))
            })
            .context("failed to query pick stat lines")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map pick stat line rows")?;
        Ok(entries)
    }
}
