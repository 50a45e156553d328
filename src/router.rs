use crate::db::{agents, leads, Database};
use crate::domain::assignment::{best_candidate, AssignmentMode};
use crate::domain::attribution::{calculate_attribution, AttributionModel};
use crate::domain::interaction::{register_interaction, InteractionData};
use crate::domain::lead::{CallOutcome, Lead, LeadStatus, SalesStage, Touchpoint};
use crate::domain::queues::{
    callback_queue, priority_queue, provisioned_queue, smart_queue_type, SmartQueue,
};
use crate::domain::scoring::calculate_score;
use crate::errors::ServerError;
use crate::responses::{html_response, redirect_response, ResultResp};
use crate::spreadsheets::export_queue_xlsx;
use crate::templates::pages::{
    attribution_page, lead_card_page, new_lead_page, queue_board_page, LeadCardVm, QueueBoardVm,
};
use astra::Request;
use chrono::{NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::io::Read;

pub fn handle(mut req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => queue_board(db),
        ("GET", ["leads", "new"]) => html_response(new_lead_page()),
        ("POST", ["leads"]) => create_lead(&mut req, db),
        ("GET", ["leads", id]) => lead_card(db, id),
        ("POST", ["leads", id, "interactions"]) => {
            let id = id.to_string();
            log_interaction(&mut req, db, &id)
        }
        ("POST", ["leads", id, "assign"]) => {
            let id = id.to_string();
            assign_lead(&mut req, db, &id)
        }
        ("GET", ["attribution"]) => attribution_report(&req, db),
        ("GET", ["export"]) => export_queue(&req, db),
        _ => Err(ServerError::NotFound),
    }
}

fn queue_board(db: &Database) -> ResultResp {
    let all = leads::list_leads(db)?;
    let now = Utc::now();

    let vm = QueueBoardVm {
        callback: callback_queue(&all, now),
        priority: priority_queue(&all, now),
        provisioned: provisioned_queue(&all, now),
    };
    html_response(queue_board_page(&vm))
}

fn lead_card(db: &Database, id: &str) -> ResultResp {
    let lead = leads::get_lead(db, id)?.ok_or(ServerError::NotFound)?;
    let queue = smart_queue_type(&lead, Utc::now());
    html_response(lead_card_page(&LeadCardVm { lead, queue }))
}

fn create_lead(req: &mut Request, db: &Database) -> ResultResp {
    let form = parse_form(req)?;
    let first_name = required(&form, "first_name")?;
    let last_name = required(&form, "last_name")?;

    let now = Utc::now();
    let source = optional(&form, "source");
    let mut lead = Lead {
        id: leads::new_lead_id(),
        first_name,
        last_name,
        email: optional(&form, "email"),
        phone: optional(&form, "phone"),
        status: LeadStatus::Prospect,
        sales_stage: SalesStage::Nouveau,
        score: 0,
        call_attempts: 0,
        last_call_date: None,
        next_callback_at: None,
        response_date: Some(now),
        job_status: optional(&form, "job_status"),
        source: source.clone(),
        exam_id: optional(&form, "exam_id"),
        assigned_to: None,
        history: Vec::new(),
        touchpoints: vec![Touchpoint {
            kind: "lead_created".to_string(),
            source,
            medium: optional(&form, "medium"),
            campaign: optional(&form, "campaign"),
            content: None,
            term: None,
            metadata: None,
            created_at: Some(now),
        }],
        created_at: now,
        updated_at: now,
    };
    lead.score = calculate_score(&lead);

    leads::insert_lead(db, &lead)?;
    redirect_response(&format!("/leads/{}", lead.id))
}

fn log_interaction(req: &mut Request, db: &Database, id: &str) -> ResultResp {
    let form = parse_form(req)?;
    let outcome_raw = required(&form, "outcome")?;
    let outcome = CallOutcome::parse(&outcome_raw)
        .ok_or_else(|| ServerError::BadRequest(format!("Unknown outcome '{outcome_raw}'")))?;

    let data = InteractionData {
        note: optional(&form, "note"),
        callback_at: optional(&form, "callback_at")
            .map(|raw| parse_local_datetime(&raw))
            .transpose()?,
    };

    let lead = leads::get_lead(db, id)?.ok_or(ServerError::NotFound)?;
    let prior_entries = lead.history.len();

    // TODO: wire the signed-in agent through here once sessions land.
    let updated = register_interaction(lead, "agent", outcome, &data);

    leads::save_interaction(db, &updated, &updated.history[prior_entries..])?;
    redirect_response(&format!("/leads/{}", updated.id))
}

fn assign_lead(req: &mut Request, db: &Database, id: &str) -> ResultResp {
    let form = parse_form(req)?;
    let mode = match optional(&form, "mode") {
        Some(raw) => AssignmentMode::parse(&raw)
            .ok_or_else(|| ServerError::BadRequest(format!("Unknown mode '{raw}'")))?,
        None => AssignmentMode::LoadBalanced,
    };

    // The lead must exist even when the roster turns out to be empty.
    leads::get_lead(db, id)?.ok_or(ServerError::NotFound)?;

    let now = Utc::now();
    let pool = agents::candidates(db, mode, now)?;

    // None means an empty roster: leave the lead unassigned, not an error.
    if let Some(user_id) = best_candidate(&pool, mode) {
        agents::assign_lead(db, id, &user_id, now)?;
    }

    redirect_response(&format!("/leads/{id}"))
}

fn attribution_report(req: &Request, db: &Database) -> ResultResp {
    let params = parse_query(req);
    let model = match params.get("model") {
        Some(raw) => AttributionModel::parse(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("Unknown model '{raw}'")))?,
        None => AttributionModel::Linear,
    };

    let touchpoints = leads::list_all_touchpoints(db)?;
    let weights = calculate_attribution(&touchpoints, model);
    html_response(attribution_page(model, &weights))
}

fn export_queue(req: &Request, db: &Database) -> ResultResp {
    let params = parse_query(req);
    let queue = params
        .get("queue")
        .and_then(|q| SmartQueue::parse(q))
        .ok_or_else(|| ServerError::BadRequest("Unknown or missing queue".to_string()))?;

    let all = leads::list_leads(db)?;
    let now = Utc::now();
    let selected = match queue {
        SmartQueue::Callback => callback_queue(&all, now),
        SmartQueue::Priority => priority_queue(&all, now),
        SmartQueue::Provisioned => provisioned_queue(&all, now),
        SmartQueue::Other => Vec::new(),
    };

    export_queue_xlsx(&selected, queue)
}

/// "2026-08-30T14:30" from a datetime-local input, interpreted as UTC.
fn parse_local_datetime(raw: &str) -> Result<chrono::DateTime<Utc>, ServerError> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| ServerError::BadRequest(format!("Bad datetime '{raw}'")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn required(form: &HashMap<String, String>, key: &str) -> Result<String, ServerError> {
    optional(form, key).ok_or_else(|| ServerError::BadRequest(format!("Missing field '{key}'")))
}

fn optional(form: &HashMap<String, String>, key: &str) -> Option<String> {
    form.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(parse_urlencoded)
        .unwrap_or_default()
}

fn parse_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let mut body = Vec::new();
    req.body_mut()
        .reader()
        .read_to_end(&mut body)
        .map_err(|_| ServerError::BadRequest("Unreadable request body".to_string()))?;
    let body = String::from_utf8(body)
        .map_err(|_| ServerError::BadRequest("Request body is not UTF-8".to_string()))?;
    Ok(parse_urlencoded(&body))
}

fn parse_urlencoded(raw: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for pair in raw.split('&') {
        let mut parts = pair.splitn(2, '=');
        if let (Some(k), Some(v)) = (parts.next(), parts.next()) {
            map.insert(percent_decode(k), percent_decode(v));
        }
    }
    map
}

/// Minimal percent decoding for form values ('+' means space).
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or("");
                match u8::from_str_radix(hex, 16) {
                    Ok(b) => {
                        out.push(b);
                        i += 3;
                    }
                    Err(_) => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
