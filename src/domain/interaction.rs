// src/domain/interaction.rs
//
// The call-outcome state machine. Takes a lead by value and returns the
// updated lead; persistence of the result is the caller's job.

use crate::domain::lead::{
    CallOutcome, HistoryKind, Lead, LeadHistoryEntry, LeadStatus, SalesStage,
};
use chrono::{DateTime, Utc};
use serde_json::json;

/// Calls in the unreachable family escalate the lead to NRP once the
/// post-increment attempt count reaches this.
const NRP_ATTEMPT_THRESHOLD: u32 = 6;

/// Optional payload accompanying a call outcome.
#[derive(Debug, Clone, Default)]
pub struct InteractionData {
    pub note: Option<String>,
    pub callback_at: Option<DateTime<Utc>>,
}

/// Applies one call outcome to a lead.
///
/// Always increments `call_attempts`, stamps `last_call_date` and appends a
/// CallLog entry. Appends a StatusChange entry only when the status actually
/// moved, and a Note entry only when `data.note` is given. Prior history is
/// never touched.
///
/// There is deliberately no guard against outcomes on terminal leads
/// (Disqualified / Archived / RdvFixe): agents may override manually, and
/// the queue classifier already keeps those leads out of the calling views.
pub fn register_interaction(
    lead: Lead,
    user_id: &str,
    outcome: CallOutcome,
    data: &InteractionData,
) -> Lead {
    register_interaction_at(lead, user_id, outcome, data, Utc::now())
}

/// Same as [`register_interaction`] with an explicit clock.
pub fn register_interaction_at(
    mut lead: Lead,
    user_id: &str,
    outcome: CallOutcome,
    data: &InteractionData,
    now: DateTime<Utc>,
) -> Lead {
    let previous_status = lead.status;

    lead.call_attempts += 1;
    lead.last_call_date = Some(now);

    match outcome {
        CallOutcome::AppointmentSet => {
            lead.status = LeadStatus::RdvFixe;
            lead.sales_stage = SalesStage::RdvFixe;
            if let Some(at) = data.callback_at {
                lead.next_callback_at = Some(at);
            }
        }
        CallOutcome::CallbackScheduled => {
            lead.status = LeadStatus::Prospection;
            if let Some(at) = data.callback_at {
                lead.next_callback_at = Some(at);
            }
        }
        CallOutcome::Answered => {
            lead.status = LeadStatus::Contacted;
        }
        CallOutcome::NoAnswer | CallOutcome::Busy | CallOutcome::Voicemail => {
            lead.status = if lead.call_attempts >= NRP_ATTEMPT_THRESHOLD {
                LeadStatus::Nrp
            } else {
                LeadStatus::Attempted
            };
        }
        CallOutcome::Refusal => {
            lead.status = LeadStatus::Disqualified;
        }
        CallOutcome::WrongNumber => {
            lead.status = LeadStatus::Archived;
        }
    }

    lead.history.push(LeadHistoryEntry {
        kind: HistoryKind::CallLog,
        timestamp: now,
        user_id: user_id.to_string(),
        details: json!({
            "outcome": outcome.as_str(),
            "attempt": lead.call_attempts,
        }),
    });

    if lead.status != previous_status {
        lead.history.push(LeadHistoryEntry {
            kind: HistoryKind::StatusChange,
            timestamp: now,
            user_id: user_id.to_string(),
            details: json!({
                "from": previous_status.as_str(),
                "to": lead.status.as_str(),
            }),
        });
    }

    if let Some(note) = data.note.as_deref().filter(|n| !n.trim().is_empty()) {
        lead.history.push(LeadHistoryEntry {
            kind: HistoryKind::Note,
            timestamp: now,
            user_id: user_id.to_string(),
            details: json!({ "text": note }),
        });
    }

    lead.updated_at = now;
    lead
}
