// src/db/agents.rs
//
// Agent roster and the load metrics fed into the candidate selector. The
// selector itself only compares `load_score`; what that score counts is
// decided here, per assignment mode.

use crate::db::connection::Database;
use crate::domain::assignment::{AssignmentMode, Candidate};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use rusqlite::params;

/// Statuses that still count towards an agent's active load.
const ACTIVE_LOAD_SQL: &str = "l.status NOT IN ('DISQUALIFIED', 'QUALIFIED', 'ARCHIVED')";

fn db_err(e: impl std::fmt::Display) -> ServerError {
    ServerError::DbError(e.to_string())
}

pub fn insert_agent(db: &Database, id: &str, name: &str) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO agents (id, name) VALUES (?1, ?2)",
            params![id, name],
        )
        .map_err(db_err)?;
        Ok(())
    })
}

/// Auto-assignment needs at least one agent on the roster; give a fresh
/// install a starter pair so the feature works before real user management
/// is hooked up.
pub fn seed_roster_if_empty(db: &Database) -> Result<(), ServerError> {
    let count: i64 = db.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM agents", [], |row| row.get(0))
            .map_err(db_err)
    })?;

    if count == 0 {
        insert_agent(db, "agent-1", "Agent 1")?;
        insert_agent(db, "agent-2", "Agent 2")?;
    }
    Ok(())
}

/// Builds the candidate pool for one assignment decision.
///
/// LoadBalanced counts an agent's currently active leads; RoundRobin counts
/// only today's assignments, so agents rotate through the day regardless of
/// their standing backlog. Agents are listed by name, which fixes the
/// tie-break order the selector inherits.
pub fn candidates(
    db: &Database,
    mode: AssignmentMode,
    now: DateTime<Utc>,
) -> Result<Vec<Candidate>, ServerError> {
    let load_filter = match mode {
        AssignmentMode::RoundRobin => "date(l.assigned_at) = date(?1)".to_string(),
        _ => ACTIVE_LOAD_SQL.to_string(),
    };

    let sql = format!(
        "SELECT a.id, COUNT(l.id), MAX(l.assigned_at) \
         FROM agents a \
         LEFT JOIN leads l ON l.assigned_to = a.id AND {load_filter} \
         GROUP BY a.id ORDER BY a.name ASC"
    );

    db.with_conn(|conn| {
        let mut stmt = conn.prepare(&sql).map_err(db_err)?;

        let map_row = |row: &rusqlite::Row| {
            Ok(Candidate {
                user_id: row.get::<_, String>(0)?,
                load_score: row.get::<_, i64>(1)? as f64,
                last_assigned_at: row.get::<_, Option<DateTime<Utc>>>(2)?,
            })
        };

        let rows = match mode {
            AssignmentMode::RoundRobin => stmt.query_map(params![now], map_row),
            _ => stmt.query_map([], map_row),
        }
        .map_err(db_err)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(db_err)?);
        }
        Ok(out)
    })
}

/// Records the selector's pick on the lead.
pub fn assign_lead(
    db: &Database,
    lead_id: &str,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<(), ServerError> {
    db.with_conn(|conn| {
        let updated = conn
            .execute(
                "UPDATE leads SET assigned_to = ?2, assigned_at = ?3, updated_at = ?3 \
                 WHERE id = ?1",
                params![lead_id, user_id, now],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(ServerError::NotFound);
        }
        Ok(())
    })
}
