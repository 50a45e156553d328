use crate::db::connection::Database;
use crate::domain::lead::{
    HistoryKind, Lead, LeadHistoryEntry, LeadStatus, SalesStage, Touchpoint,
};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Ids look like "lead_x7Kq2mVbR0wZ" so they can't collide with any
/// upstream ad-platform id.
pub fn new_lead_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("lead_{suffix}")
}

fn db_err(e: impl std::fmt::Display) -> ServerError {
    ServerError::DbError(e.to_string())
}

fn lead_from_row(row: &Row) -> Result<Lead, ServerError> {
    let status_raw: String = row.get("status").map_err(db_err)?;
    let stage_raw: String = row.get("sales_stage").map_err(db_err)?;
    let score: i64 = row.get("score").map_err(db_err)?;
    let attempts: i64 = row.get("call_attempts").map_err(db_err)?;

    Ok(Lead {
        id: row.get("id").map_err(db_err)?,
        first_name: row.get("first_name").map_err(db_err)?,
        last_name: row.get("last_name").map_err(db_err)?,
        email: row.get("email").map_err(db_err)?,
        phone: row.get("phone").map_err(db_err)?,
        status: LeadStatus::parse(&status_raw)
            .ok_or_else(|| ServerError::DbError(format!("Unknown lead status '{status_raw}'")))?,
        sales_stage: SalesStage::parse(&stage_raw)
            .ok_or_else(|| ServerError::DbError(format!("Unknown sales stage '{stage_raw}'")))?,
        score: score.clamp(0, 100) as u8,
        call_attempts: attempts.max(0) as u32,
        last_call_date: row.get("last_call_date").map_err(db_err)?,
        next_callback_at: row.get("next_callback_at").map_err(db_err)?,
        response_date: row.get("response_date").map_err(db_err)?,
        job_status: row.get("job_status").map_err(db_err)?,
        source: row.get("source").map_err(db_err)?,
        exam_id: row.get("exam_id").map_err(db_err)?,
        assigned_to: row.get("assigned_to").map_err(db_err)?,
        history: Vec::new(),
        touchpoints: Vec::new(),
        created_at: row.get("created_at").map_err(db_err)?,
        updated_at: row.get("updated_at").map_err(db_err)?,
    })
}

const LEAD_COLUMNS: &str = "id, first_name, last_name, email, phone, status, sales_stage, \
     score, call_attempts, last_call_date, next_callback_at, response_date, \
     job_status, source, exam_id, assigned_to, created_at, updated_at";

/// Inserts a new lead plus its initial touchpoints in one transaction.
pub fn insert_lead(db: &Database, lead: &Lead) -> Result<(), ServerError> {
    db.with_tx(|tx| {
        tx.execute(
            &format!(
                "INSERT INTO leads ({LEAD_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
            ),
            params![
                lead.id,
                lead.first_name,
                lead.last_name,
                lead.email,
                lead.phone,
                lead.status.as_str(),
                lead.sales_stage.as_str(),
                lead.score as i64,
                lead.call_attempts as i64,
                lead.last_call_date,
                lead.next_callback_at,
                lead.response_date,
                lead.job_status,
                lead.source,
                lead.exam_id,
                lead.assigned_to,
                lead.created_at,
                lead.updated_at,
            ],
        )
        .map_err(db_err)?;

        for tp in &lead.touchpoints {
            insert_touchpoint_row(tx, &lead.id, tp)?;
        }
        Ok(())
    })
}

fn insert_touchpoint_row(
    conn: &Connection,
    lead_id: &str,
    tp: &Touchpoint,
) -> Result<(), ServerError> {
    let metadata = tp
        .metadata
        .as_ref()
        .map(|m| serde_json::to_string(m))
        .transpose()
        .map_err(db_err)?;

    conn.execute(
        "INSERT INTO touchpoints (lead_id, kind, source, medium, campaign, content, term, metadata, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            lead_id,
            tp.kind,
            tp.source,
            tp.medium,
            tp.campaign,
            tp.content,
            tp.term,
            metadata,
            tp.created_at,
        ],
    )
    .map_err(db_err)?;
    Ok(())
}

fn insert_history_row(
    conn: &Connection,
    lead_id: &str,
    entry: &LeadHistoryEntry,
) -> Result<(), ServerError> {
    let details = serde_json::to_string(&entry.details).map_err(db_err)?;
    conn.execute(
        "INSERT INTO lead_history (lead_id, kind, timestamp, user_id, details) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            lead_id,
            entry.kind.as_str(),
            entry.timestamp,
            entry.user_id,
            details,
        ],
    )
    .map_err(db_err)?;
    Ok(())
}

fn load_history(conn: &Connection, lead_id: &str) -> Result<Vec<LeadHistoryEntry>, ServerError> {
    let mut stmt = conn
        .prepare(
            "SELECT kind, timestamp, user_id, details FROM lead_history \
             WHERE lead_id = ?1 ORDER BY id ASC",
        )
        .map_err(db_err)?;

    let rows = stmt
        .query_map(params![lead_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, DateTime<Utc>>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(db_err)?;

    let mut out = Vec::new();
    for r in rows {
        let (kind_raw, timestamp, user_id, details_raw) = r.map_err(db_err)?;
        out.push(LeadHistoryEntry {
            kind: HistoryKind::parse(&kind_raw).ok_or_else(|| {
                ServerError::DbError(format!("Unknown history kind '{kind_raw}'"))
            })?,
            timestamp,
            user_id,
            details: serde_json::from_str(&details_raw).map_err(db_err)?,
        });
    }
    Ok(out)
}

type TouchpointRow = (
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<DateTime<Utc>>,
);

fn touchpoint_row(row: &Row) -> rusqlite::Result<TouchpointRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
    ))
}

fn touchpoint_from_row(raw: TouchpointRow) -> Result<Touchpoint, ServerError> {
    let (kind, source, medium, campaign, content, term, metadata_raw, created_at) = raw;
    let metadata = metadata_raw
        .map(|m| serde_json::from_str(&m))
        .transpose()
        .map_err(db_err)?;
    Ok(Touchpoint {
        kind,
        source,
        medium,
        campaign,
        content,
        term,
        metadata,
        created_at,
    })
}

fn load_touchpoints(conn: &Connection, lead_id: &str) -> Result<Vec<Touchpoint>, ServerError> {
    let mut stmt = conn
        .prepare(
            "SELECT kind, source, medium, campaign, content, term, metadata, created_at \
             FROM touchpoints WHERE lead_id = ?1 ORDER BY created_at ASC, id ASC",
        )
        .map_err(db_err)?;

    let rows = stmt
        .query_map(params![lead_id], touchpoint_row)
        .map_err(db_err)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(touchpoint_from_row(r.map_err(db_err)?)?);
    }
    Ok(out)
}

/// One lead with its full history log and touchpoint trail.
pub fn get_lead(db: &Database, id: &str) -> Result<Option<Lead>, ServerError> {
    db.with_conn(|conn| {
        let lead = conn
            .query_row(
                &format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1"),
                params![id],
                |row| Ok(lead_from_row(row)),
            )
            .optional()
            .map_err(db_err)?;

        match lead {
            None => Ok(None),
            Some(lead) => {
                let mut lead = lead?;
                lead.history = load_history(conn, &lead.id)?;
                lead.touchpoints = load_touchpoints(conn, &lead.id)?;
                Ok(Some(lead))
            }
        }
    })
}

/// All leads, scalar columns only (no history / touchpoints). Enough for
/// queue classification, which never looks at either.
pub fn list_leads(db: &Database) -> Result<Vec<Lead>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC"
            ))
            .map_err(db_err)?;

        let rows = stmt
            .query_map([], |row| Ok(lead_from_row(row)))
            .map_err(db_err)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(db_err)??);
        }
        Ok(out)
    })
}

/// Every touchpoint in the store, for the marketing attribution report.
pub fn list_all_touchpoints(db: &Database) -> Result<Vec<Touchpoint>, ServerError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                "SELECT kind, source, medium, campaign, content, term, metadata, created_at \
                 FROM touchpoints ORDER BY created_at ASC, id ASC",
            )
            .map_err(db_err)?;

        let rows = stmt.query_map([], touchpoint_row).map_err(db_err)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(touchpoint_from_row(r.map_err(db_err)?)?);
        }
        Ok(out)
    })
}

/// Persists the result of `register_interaction`: rewrites the lead's
/// scalar columns and inserts the freshly appended history entries, in one
/// transaction. Existing history rows are never updated or deleted.
pub fn save_interaction(
    db: &Database,
    lead: &Lead,
    new_entries: &[LeadHistoryEntry],
) -> Result<(), ServerError> {
    db.with_tx(|tx| {
        let updated = tx
            .execute(
                "UPDATE leads SET status = ?2, sales_stage = ?3, score = ?4, \
                 call_attempts = ?5, last_call_date = ?6, next_callback_at = ?7, \
                 assigned_to = ?8, updated_at = ?9 WHERE id = ?1",
                params![
                    lead.id,
                    lead.status.as_str(),
                    lead.sales_stage.as_str(),
                    lead.score as i64,
                    lead.call_attempts as i64,
                    lead.last_call_date,
                    lead.next_callback_at,
                    lead.assigned_to,
                    lead.updated_at,
                ],
            )
            .map_err(db_err)?;

        if updated == 0 {
            return Err(ServerError::NotFound);
        }

        for entry in new_entries {
            insert_history_row(tx, &lead.id, entry)?;
        }
        Ok(())
    })
}
