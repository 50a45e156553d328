// src/tests/router_tests/assignment_tests.rs

use crate::db::{agents, leads};
use crate::domain::assignment::AssignmentMode;
use crate::domain::testutil::sample_lead;
use crate::router::handle;
use crate::tests::utils::{init_test_db, request};
use chrono::Utc;

#[test]
fn auto_assign_picks_the_least_loaded_agent() {
    let db = init_test_db("assign_load");

    agents::insert_agent(&db, "alice", "Alice").unwrap();
    agents::insert_agent(&db, "bob", "Bob").unwrap();

    // Alice already carries two active leads.
    for i in 0..2 {
        let mut busy = sample_lead(&format!("lead_busy{i}"));
        busy.assigned_to = Some("alice".into());
        leads::insert_lead(&db, &busy).unwrap();
    }

    let lead = sample_lead("lead_pending");
    leads::insert_lead(&db, &lead).unwrap();

    let resp = handle(
        request(
            "POST",
            "/leads/lead_pending/assign",
            Some("mode=load_balanced"),
        ),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 303);

    let stored = leads::get_lead(&db, "lead_pending").unwrap().unwrap();
    assert_eq!(stored.assigned_to.as_deref(), Some("bob"));
}

#[test]
fn empty_roster_leaves_the_lead_unassigned() {
    let db = init_test_db("assign_empty");

    let lead = sample_lead("lead_alone");
    leads::insert_lead(&db, &lead).unwrap();

    // No agents at all: the post still succeeds and nothing is assigned.
    let resp = handle(request("POST", "/leads/lead_alone/assign", None), &db).unwrap();
    assert_eq!(resp.status(), 303);

    let stored = leads::get_lead(&db, "lead_alone").unwrap().unwrap();
    assert_eq!(stored.assigned_to, None);
}

#[test]
fn round_robin_counts_only_todays_assignments() {
    let db = init_test_db("assign_rr");

    agents::insert_agent(&db, "alice", "Alice").unwrap();
    agents::insert_agent(&db, "bob", "Bob").unwrap();

    // Alice took the last lead today; Bob's backlog is older.
    let mut taken = sample_lead("lead_taken");
    taken.assigned_to = Some("alice".into());
    leads::insert_lead(&db, &taken).unwrap();
    agents::assign_lead(&db, "lead_taken", "alice", Utc::now()).unwrap();

    let lead = sample_lead("lead_next");
    leads::insert_lead(&db, &lead).unwrap();

    let pool = agents::candidates(&db, AssignmentMode::RoundRobin, Utc::now()).unwrap();
    let alice = pool.iter().find(|c| c.user_id == "alice").unwrap();
    assert_eq!(alice.load_score, 1.0);
    assert!(alice.last_assigned_at.is_some());

    handle(
        request("POST", "/leads/lead_next/assign", Some("mode=round_robin")),
        &db,
    )
    .unwrap();

    let stored = leads::get_lead(&db, "lead_next").unwrap().unwrap();
    assert_eq!(stored.assigned_to.as_deref(), Some("bob"));
}
