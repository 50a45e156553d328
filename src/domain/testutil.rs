// src/domain/testutil.rs

use crate::domain::lead::{Lead, LeadStatus, SalesStage};
use chrono::{Duration, Utc};

/// A plausible mid-pipeline lead for unit tests. Tests override the fields
/// they care about.
pub fn sample_lead(id: &str) -> Lead {
    let now = Utc::now();
    Lead {
        id: id.to_string(),
        first_name: "Jean".into(),
        last_name: "Dupont".into(),
        email: Some("jean.dupont@example.com".into()),
        phone: Some("+33612345678".into()),
        status: LeadStatus::Prospect,
        sales_stage: SalesStage::Nouveau,
        score: 50,
        call_attempts: 0,
        last_call_date: None,
        next_callback_at: None,
        response_date: None,
        job_status: Some("salarie".into()),
        source: Some("facebook_ads".into()),
        exam_id: Some("exam-1".into()),
        assigned_to: None,
        history: Vec::new(),
        touchpoints: Vec::new(),
        created_at: now - Duration::days(1),
        updated_at: now - Duration::days(1),
    }
}
