// src/domain/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Operational status of a lead in the calling pipeline.
///
/// Disqualified, Qualified and Archived are terminal for queue purposes:
/// classification must never surface them in an active queue. Nothing in the
/// state machine itself forbids further interactions on them (manual
/// override is allowed by convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    Prospect,
    Prospection,
    Attempted,
    Contacted,
    /// "Ne répond pas": unreachable after repeated call attempts.
    Nrp,
    RdvFixe,
    Qualified,
    Disqualified,
    Archived,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Prospect => "PROSPECT",
            LeadStatus::Prospection => "PROSPECTION",
            LeadStatus::Attempted => "ATTEMPTED",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Nrp => "NRP",
            LeadStatus::RdvFixe => "RDV_FIXE",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Disqualified => "DISQUALIFIED",
            LeadStatus::Archived => "ARCHIVED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PROSPECT" => Some(LeadStatus::Prospect),
            "PROSPECTION" => Some(LeadStatus::Prospection),
            "ATTEMPTED" => Some(LeadStatus::Attempted),
            "CONTACTED" => Some(LeadStatus::Contacted),
            "NRP" => Some(LeadStatus::Nrp),
            "RDV_FIXE" => Some(LeadStatus::RdvFixe),
            "QUALIFIED" => Some(LeadStatus::Qualified),
            "DISQUALIFIED" => Some(LeadStatus::Disqualified),
            "ARCHIVED" => Some(LeadStatus::Archived),
            _ => None,
        }
    }
}

/// CRM pipeline stage, advanced by sales rather than by the dialer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SalesStage {
    Nouveau,
    Decouverte,
    RdvFixe,
    Signe,
}

impl SalesStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesStage::Nouveau => "NOUVEAU",
            SalesStage::Decouverte => "DECOUVERTE",
            SalesStage::RdvFixe => "RDV_FIXE",
            SalesStage::Signe => "SIGNE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "NOUVEAU" => Some(SalesStage::Nouveau),
            "DECOUVERTE" => Some(SalesStage::Decouverte),
            "RDV_FIXE" => Some(SalesStage::RdvFixe),
            "SIGNE" => Some(SalesStage::Signe),
            _ => None,
        }
    }
}

/// What happened on a call. The single trigger of the interaction
/// state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallOutcome {
    AppointmentSet,
    CallbackScheduled,
    Answered,
    NoAnswer,
    Busy,
    Voicemail,
    Refusal,
    WrongNumber,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::AppointmentSet => "APPOINTMENT_SET",
            CallOutcome::CallbackScheduled => "CALLBACK_SCHEDULED",
            CallOutcome::Answered => "ANSWERED",
            CallOutcome::NoAnswer => "NO_ANSWER",
            CallOutcome::Busy => "BUSY",
            CallOutcome::Voicemail => "VOICEMAIL",
            CallOutcome::Refusal => "REFUSAL",
            CallOutcome::WrongNumber => "WRONG_NUMBER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "APPOINTMENT_SET" => Some(CallOutcome::AppointmentSet),
            "CALLBACK_SCHEDULED" => Some(CallOutcome::CallbackScheduled),
            "ANSWERED" => Some(CallOutcome::Answered),
            "NO_ANSWER" => Some(CallOutcome::NoAnswer),
            "BUSY" => Some(CallOutcome::Busy),
            "VOICEMAIL" => Some(CallOutcome::Voicemail),
            "REFUSAL" => Some(CallOutcome::Refusal),
            "WRONG_NUMBER" => Some(CallOutcome::WrongNumber),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryKind {
    CallLog,
    StatusChange,
    Note,
}

impl HistoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::CallLog => "CALL_LOG",
            HistoryKind::StatusChange => "STATUS_CHANGE",
            HistoryKind::Note => "NOTE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CALL_LOG" => Some(HistoryKind::CallLog),
            "STATUS_CHANGE" => Some(HistoryKind::StatusChange),
            "NOTE" => Some(HistoryKind::Note),
            _ => None,
        }
    }
}

/// An immutable fact about a lead. Entries are appended by the interaction
/// state machine and never edited or removed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadHistoryEntry {
    pub kind: HistoryKind,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub details: Value,
}

/// A marketing-attribution fact, ordered by `created_at` for the
/// attribution math. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Touchpoint {
    pub kind: String,
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub content: Option<String>,
    pub term: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A prospective customer tracked through the sales pipeline.
///
/// Invariants: `score` stays in [0, 100]; `call_attempts` only ever
/// increments; `history` is append-only. Leads are never deleted by this
/// logic (archival is a status, not a delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub sales_stage: SalesStage,
    pub score: u8,
    pub call_attempts: u32,
    pub last_call_date: Option<DateTime<Utc>>,
    pub next_callback_at: Option<DateTime<Utc>>,
    /// When the lead responded to the ad / campaign. Drives queue ordering.
    pub response_date: Option<DateTime<Utc>>,
    pub job_status: Option<String>,
    pub source: Option<String>,
    pub exam_id: Option<String>,
    pub assigned_to: Option<String>,
    pub history: Vec<LeadHistoryEntry>,
    pub touchpoints: Vec<Touchpoint>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
