// src/domain/queues.rs
//
// Smart queue classification. The three collection filters and the
// single-lead classifier share the same predicates, so a lead's queue label
// and its queue membership can never drift apart.

use crate::domain::lead::{Lead, LeadStatus, SalesStage};
use chrono::{DateTime, Duration, Utc};

/// The operational views surfaced to agents, plus `Other` for leads that
/// belong to none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartQueue {
    Provisioned,
    Priority,
    Callback,
    Other,
}

impl SmartQueue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SmartQueue::Provisioned => "provisioned",
            SmartQueue::Priority => "priority",
            SmartQueue::Callback => "callback",
            SmartQueue::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "provisioned" => Some(SmartQueue::Provisioned),
            "priority" => Some(SmartQueue::Priority),
            "callback" => Some(SmartQueue::Callback),
            _ => None,
        }
    }
}

/// Statuses the callback queue must never surface, whatever the scheduled
/// time says.
const CALLBACK_EXCLUDED: &[LeadStatus] = &[
    LeadStatus::Disqualified,
    LeadStatus::Qualified,
    LeadStatus::RdvFixe,
    LeadStatus::Archived,
];

/// Statuses still eligible for the priority ("hot") queue.
const PRIORITY_STATUSES: &[LeadStatus] = &[
    LeadStatus::Prospect,
    LeadStatus::Prospection,
    LeadStatus::Attempted,
];

const PRIORITY_SCORE_THRESHOLD: u8 = 75;

/// Callbacks surface this far ahead of their scheduled time.
fn callback_window() -> Duration {
    Duration::hours(2)
}

fn is_callback(lead: &Lead, now: DateTime<Utc>) -> bool {
    match lead.next_callback_at {
        // Overdue callbacks (in the past) stay in the window.
        Some(at) => at <= now + callback_window() && !CALLBACK_EXCLUDED.contains(&lead.status),
        None => false,
    }
}

fn is_priority(lead: &Lead) -> bool {
    lead.score > PRIORITY_SCORE_THRESHOLD
        && PRIORITY_STATUSES.contains(&lead.status)
        && lead.sales_stage != SalesStage::Nouveau
}

fn is_provisioned(lead: &Lead) -> bool {
    let into_the_pipe = (lead.status == LeadStatus::Prospect
        && lead.sales_stage != SalesStage::Nouveau)
        || (lead.status == LeadStatus::Prospection && lead.call_attempts == 0);
    into_the_pipe && lead.next_callback_at.is_none()
}

/// Classifies one lead for UI labeling. Precedence is Callback > Priority >
/// Provisioned > Other: a lead with an overdue callback and a hot score must
/// surface as a callback, not a priority lead.
pub fn smart_queue_type(lead: &Lead, now: DateTime<Utc>) -> SmartQueue {
    if is_callback(lead, now) {
        SmartQueue::Callback
    } else if is_priority(lead) {
        SmartQueue::Priority
    } else if is_provisioned(lead) {
        SmartQueue::Provisioned
    } else {
        SmartQueue::Other
    }
}

/// Missing response dates sort as "very old" rather than floating to the top.
fn response_date_or_epoch(lead: &Lead) -> DateTime<Utc> {
    lead.response_date.unwrap_or(DateTime::UNIX_EPOCH)
}

/// Leads freshly provisioned "into the pipe", newest response first.
pub fn provisioned_queue(leads: &[Lead], now: DateTime<Utc>) -> Vec<Lead> {
    let mut out: Vec<Lead> = leads
        .iter()
        .filter(|l| !is_callback(l, now) && is_provisioned(l))
        .cloned()
        .collect();
    out.sort_by_key(|l| std::cmp::Reverse(response_date_or_epoch(l)));
    out
}

/// Hot leads worth interrupting the dialing order for, newest response first.
pub fn priority_queue(leads: &[Lead], now: DateTime<Utc>) -> Vec<Lead> {
    let mut out: Vec<Lead> = leads
        .iter()
        .filter(|l| !is_callback(l, now) && is_priority(l))
        .cloned()
        .collect();
    out.sort_by_key(|l| std::cmp::Reverse(response_date_or_epoch(l)));
    out
}

/// Scheduled callbacks due within the window, most urgent first.
pub fn callback_queue(leads: &[Lead], now: DateTime<Utc>) -> Vec<Lead> {
    let mut out: Vec<Lead> = leads
        .iter()
        .filter(|l| is_callback(l, now))
        .cloned()
        .collect();
    out.sort_by_key(|l| l.next_callback_at.unwrap_or(DateTime::UNIX_EPOCH));
    out
}
