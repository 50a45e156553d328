// src/domain/scoring.rs

use crate::domain::lead::Lead;
use chrono::{DateTime, Duration, Utc};

/// Job statuses that make a lead eligible for French training financing
/// (CPF / Pôle emploi). Compared case-insensitively.
pub const FINANCEABLE_JOB_STATUSES: &[&str] =
    &["salarie", "cdi", "cdd", "independant", "chomage"];

/// Acquisition channels that historically convert well enough to earn a
/// scoring bonus. Compared case-insensitively.
pub const STRONG_SOURCES: &[&str] = &[
    "facebook_ads",
    "google_ads",
    "landing_page",
    "recommandation",
    "meta",
];

const BASE_SCORE: u32 = 30;
const MAX_SCORE: u32 = 100;

/// Scores a lead between 0 and 100 with an additive point model.
///
/// The score is a snapshot taken against the wall clock at call time, not
/// something recomputed on read; callers that need time-sensitive accuracy
/// must rescore. Total function: missing fields simply contribute nothing,
/// so any input scores at least the base 30.
pub fn calculate_score(lead: &Lead) -> u8 {
    calculate_score_at(lead, Utc::now())
}

/// Same as [`calculate_score`] with an explicit clock, so the freshness
/// windows can be tested deterministically.
pub fn calculate_score_at(lead: &Lead, now: DateTime<Utc>) -> u8 {
    let mut score = BASE_SCORE;

    // Freshness: a lead called back within minutes converts far better.
    let age = now.signed_duration_since(lead.created_at);
    if age <= Duration::minutes(15) {
        score += 30;
    } else if age <= Duration::hours(2) {
        score += 10;
    }

    // Contact completeness.
    if has_text(&lead.email) && has_text(&lead.phone) {
        score += 20;
    }

    // Financing eligibility.
    if matches_allow_list(&lead.job_status, FINANCEABLE_JOB_STATUSES) {
        score += 20;
    }

    // Channel quality.
    if matches_allow_list(&lead.source, STRONG_SOURCES) {
        score += 10;
    }

    // A chosen exam means a defined training project.
    if has_text(&lead.exam_id) {
        score += 10;
    }

    score.min(MAX_SCORE) as u8
}

fn has_text(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn matches_allow_list(field: &Option<String>, allowed: &[&str]) -> bool {
    field
        .as_deref()
        .map(|v| {
            let v = v.trim().to_lowercase();
            allowed.iter().any(|a| *a == v)
        })
        .unwrap_or(false)
}
