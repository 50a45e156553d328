// src/tests/router_tests/interaction_tests.rs

use crate::db::leads;
use crate::domain::lead::{HistoryKind, LeadStatus, SalesStage};
use crate::domain::testutil::sample_lead;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{init_test_db, request};

#[test]
fn no_answer_interaction_persists_status_and_history() {
    let db = init_test_db("no_answer");

    let mut lead = sample_lead("lead_int1");
    lead.status = LeadStatus::Prospection;
    lead.call_attempts = 5;
    leads::insert_lead(&db, &lead).unwrap();

    let resp = handle(
        request("POST", "/leads/lead_int1/interactions", Some("outcome=NO_ANSWER")),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let stored = leads::get_lead(&db, "lead_int1").unwrap().unwrap();
    // Sixth attempt escalates to NRP.
    assert_eq!(stored.call_attempts, 6);
    assert_eq!(stored.status, LeadStatus::Nrp);

    let kinds: Vec<HistoryKind> = stored.history.iter().map(|h| h.kind).collect();
    assert_eq!(kinds, [HistoryKind::CallLog, HistoryKind::StatusChange]);
}

#[test]
fn appointment_with_callback_and_note_round_trips() {
    let db = init_test_db("appointment");

    let lead = sample_lead("lead_int2");
    leads::insert_lead(&db, &lead).unwrap();

    let form = "outcome=APPOINTMENT_SET&callback_at=2026-09-01T10%3A30&note=Confirmed+for+Tuesday";
    let resp = handle(
        request("POST", "/leads/lead_int2/interactions", Some(form)),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let stored = leads::get_lead(&db, "lead_int2").unwrap().unwrap();
    assert_eq!(stored.status, LeadStatus::RdvFixe);
    assert_eq!(stored.sales_stage, SalesStage::RdvFixe);
    assert!(stored.next_callback_at.is_some());

    let note = stored
        .history
        .iter()
        .find(|h| h.kind == HistoryKind::Note)
        .expect("note entry missing");
    assert_eq!(note.details["text"], "Confirmed for Tuesday");
}

#[test]
fn repeated_interactions_never_rewrite_old_history() {
    let db = init_test_db("append_only");

    let lead = sample_lead("lead_int3");
    leads::insert_lead(&db, &lead).unwrap();

    handle(
        request("POST", "/leads/lead_int3/interactions", Some("outcome=NO_ANSWER")),
        &db,
    )
    .unwrap();
    let first = leads::get_lead(&db, "lead_int3").unwrap().unwrap();

    handle(
        request("POST", "/leads/lead_int3/interactions", Some("outcome=ANSWERED")),
        &db,
    )
    .unwrap();
    let second = leads::get_lead(&db, "lead_int3").unwrap().unwrap();

    assert!(second.history.len() > first.history.len());
    assert_eq!(&second.history[..first.history.len()], &first.history[..]);
    assert_eq!(second.status, LeadStatus::Contacted);
    assert_eq!(second.call_attempts, 2);
}

#[test]
fn unknown_outcome_is_a_bad_request() {
    let db = init_test_db("bad_outcome");

    let lead = sample_lead("lead_int4");
    leads::insert_lead(&db, &lead).unwrap();

    let result = handle(
        request("POST", "/leads/lead_int4/interactions", Some("outcome=SHOUTED")),
        &db,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn interaction_on_a_missing_lead_is_not_found() {
    let db = init_test_db("missing_lead");
    let result = handle(
        request("POST", "/leads/lead_ghost/interactions", Some("outcome=ANSWERED")),
        &db,
    );
    assert!(matches!(result, Err(ServerError::NotFound)));
}
