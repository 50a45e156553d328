// src/tests/router_tests/queue_tests.rs

use crate::db::leads;
use crate::domain::lead::{LeadStatus, SalesStage, Touchpoint};
use crate::domain::testutil::sample_lead;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, init_test_db, request};
use chrono::Utc;

#[test]
fn create_lead_scores_and_redirects_to_the_card() {
    let db = init_test_db("create_lead");

    let form = "first_name=Marie&last_name=Curie&email=marie%40example.com\
                &phone=%2B33612345678&job_status=CDI&source=facebook_ads&exam_id=exam-1";
    let resp = handle(request("POST", "/leads", Some(form)), &db).unwrap();

    assert_eq!(resp.status(), 303);
    let location = resp
        .headers()
        .get("Location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("/leads/lead_"));

    let mut card = handle(request("GET", &location, None), &db).unwrap();
    let body = body_string(&mut card);
    assert!(body.contains("Marie Curie"));
    // Fresh + complete + financeable + strong source + exam clamps to 100.
    assert!(body.contains("100"));

    // The submission also recorded an attribution touchpoint.
    let id = location.rsplit('/').next().unwrap();
    let lead = leads::get_lead(&db, id).unwrap().unwrap();
    assert_eq!(lead.touchpoints.len(), 1);
    assert_eq!(lead.touchpoints[0].source.as_deref(), Some("facebook_ads"));
    assert_eq!(lead.status, LeadStatus::Prospect);
    assert_eq!(lead.sales_stage, SalesStage::Nouveau);
}

#[test]
fn queue_board_surfaces_a_provisioned_lead() {
    let db = init_test_db("queue_board");

    let mut lead = sample_lead("lead_board1");
    lead.status = LeadStatus::Prospection;
    lead.sales_stage = SalesStage::Nouveau;
    lead.call_attempts = 0;
    lead.next_callback_at = None;
    leads::insert_lead(&db, &lead).unwrap();

    let mut resp = handle(request("GET", "/", None), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("Jean Dupont"));
    assert!(body.contains("Provisioned"));
}

#[test]
fn export_returns_a_spreadsheet() {
    let db = init_test_db("export");

    let mut lead = sample_lead("lead_export1");
    lead.status = LeadStatus::Prospection;
    lead.call_attempts = 0;
    leads::insert_lead(&db, &lead).unwrap();

    let resp = handle(request("GET", "/export?queue=provisioned", None), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("Content-Type").unwrap().to_str().unwrap();
    assert!(content_type.contains("spreadsheetml"));
}

#[test]
fn export_rejects_an_unknown_queue() {
    let db = init_test_db("export_bad");
    let result = handle(request("GET", "/export?queue=nonsense", None), &db);
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn attribution_report_renders_source_shares() {
    let db = init_test_db("attribution");

    let mut lead = sample_lead("lead_attr1");
    lead.touchpoints = vec![
        Touchpoint {
            kind: "ad_click".into(),
            source: Some("google_ads".into()),
            medium: None,
            campaign: None,
            content: None,
            term: None,
            metadata: None,
            created_at: Some(Utc::now() - chrono::Duration::hours(2)),
        },
        Touchpoint {
            kind: "form_submit".into(),
            source: Some("landing_page".into()),
            medium: None,
            campaign: None,
            content: None,
            term: None,
            metadata: None,
            created_at: Some(Utc::now()),
        },
    ];
    leads::insert_lead(&db, &lead).unwrap();

    let mut resp = handle(request("GET", "/attribution?model=u_shaped", None), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("google_ads"));
    assert!(body.contains("landing_page"));
    assert!(body.contains("50.0%"));
}

#[test]
fn unknown_route_is_not_found() {
    let db = init_test_db("not_found");
    let result = handle(request("GET", "/nope", None), &db);
    assert!(matches!(result, Err(ServerError::NotFound)));
}
