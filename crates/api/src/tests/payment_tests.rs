// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment application tests: idempotent replay, ambiguity, routing.

use super::helpers::{
    create_test_actor, create_test_cause, failure_payload, new_persistence, success_payload,
    test_pricing,
};
use crate::{
    ApiError, TicketOrderRequest, VoteIntentRequest, apply_gateway_payload, get_contestant_votes,
    get_payment_status, get_ticket_order, order_tickets, record_vote_intent,
};
use ovation_domain::{GatewayDialect, RawGatewayPayload};
use ovation_persistence::Persistence;
use serde_json::json;

fn vote_intent(persistence: &mut Persistence, contestant_id: i64, votes: i64, reference: &str) {
    record_vote_intent(
        persistence,
        &test_pricing(),
        VoteIntentRequest {
            contestant_id,
            number_of_votes: votes,
            amount_paid: votes * 100,
            reference: reference.to_string(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("vote intent failed");
}

#[test]
fn test_duplicate_vote_webhook_credits_exactly_once() {
    // Scenario: the same success outcome for V1 (10 votes, 1000 minor
    // units) is delivered twice; the tally moves by exactly 10.
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("The Harmonics")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 10, "V1");

    let payload: RawGatewayPayload = serde_json::from_value(json!({
        "reference": "V1",
        "status": 0,
        "transAmount": 1000,
        "metadata": [
            {"insightTag": "type", "insightTagValue": "vote_payment"},
            {"insightTag": "contestantId", "insightTagValue": contestant_id.to_string()},
            {"insightTag": "votesPurchased", "insightTagValue": "10"},
        ],
    }))
    .expect("payload should deserialize");

    let first = apply_gateway_payload(
        &mut persistence,
        &payload,
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("first application failed");
    assert!(first.applied);
    assert_eq!(first.status, "successful");

    let second = apply_gateway_payload(
        &mut persistence,
        &payload,
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("replay should not error");
    assert!(!second.applied);
    assert_eq!(second.status, "successful");

    let tally = get_contestant_votes(&mut persistence, contestant_id).expect("tally failed");
    assert_eq!(tally.total_votes, 10);
    assert_eq!(tally.total_vote_amount, 1000);
    assert_eq!(tally.records.len(), 1);
    assert_eq!(tally.records[0].payment_status, "completed");
}

#[test]
fn test_webhook_and_client_verification_share_idempotency() {
    // The two trigger paths apply the same reference; whichever lands
    // second is a no-op.
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("Race Conditions")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 5, "V-RACE");

    let webhook = apply_gateway_payload(
        &mut persistence,
        &success_payload("V-RACE", 500),
        GatewayDialect::Lenient,
        ovation_audit::Actor::gateway(),
        ovation_audit::Cause::new(
            String::from("V-RACE"),
            String::from("Gateway webhook delivery"),
        ),
    )
    .expect("webhook application failed");
    let verify = apply_gateway_payload(
        &mut persistence,
        &success_payload("V-RACE", 500),
        GatewayDialect::Lenient,
        create_test_actor(),
        ovation_audit::Cause::new(
            String::from("V-RACE"),
            String::from("Client verification call"),
        ),
    )
    .expect("verification application failed");

    assert!(webhook.applied);
    assert!(!verify.applied);

    let tally = get_contestant_votes(&mut persistence, contestant_id).expect("tally failed");
    assert_eq!(tally.total_votes, 5);
}

#[test]
fn test_unknown_reference_is_rejected() {
    let mut persistence: Persistence = new_persistence();

    let err = apply_gateway_payload(
        &mut persistence,
        &success_payload("GHOST-1", 1000),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("unknown reference should fail");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

#[test]
fn test_ambiguous_status_is_held_not_applied() {
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("Held Back")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 10, "V-AMB");

    let payload: RawGatewayPayload = serde_json::from_value(json!({
        "reference": "V-AMB",
        "status": "in_flight",
    }))
    .expect("payload should deserialize");

    let err = apply_gateway_payload(
        &mut persistence,
        &payload,
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("ambiguous status should fail");
    assert!(matches!(err, ApiError::AmbiguousUpstream { .. }));

    // The record stays pending so the gateway will retry.
    let status = get_payment_status(&mut persistence, "V-AMB").expect("status failed");
    assert_eq!(status.status, "pending");

    let tally = get_contestant_votes(&mut persistence, contestant_id).expect("tally failed");
    assert_eq!(tally.total_votes, 0);

    // A later unambiguous delivery still applies.
    let applied = apply_gateway_payload(
        &mut persistence,
        &success_payload("V-AMB", 1000),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("later application failed");
    assert!(applied.applied);
}

#[test]
fn test_failed_outcome_marks_vote_failed_without_credit() {
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("Declined")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 20, "V-FAIL");

    let response = apply_gateway_payload(
        &mut persistence,
        &failure_payload("V-FAIL"),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("application failed");
    assert!(response.applied);
    assert_eq!(response.status, "failed");

    let tally = get_contestant_votes(&mut persistence, contestant_id).expect("tally failed");
    assert_eq!(tally.total_votes, 0);
    assert_eq!(tally.records[0].payment_status, "failed");
}

#[test]
fn test_ticket_order_settles_and_mints_numbers() {
    let mut persistence: Persistence = new_persistence();

    let order = order_tickets(
        &mut persistence,
        &test_pricing(),
        TicketOrderRequest {
            email: String::from("buyer@example.com"),
            quantity: 2,
            reference: String::from("TIX-9"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("order failed");
    assert_eq!(order.status, "pending");
    assert!(order.ticket_numbers.is_empty());

    apply_gateway_payload(
        &mut persistence,
        &success_payload("TIX-9", order.amount),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("application failed");

    let settled = get_ticket_order(&mut persistence, "TIX-9").expect("get failed");
    assert_eq!(settled.status, "completed");
    assert_eq!(settled.ticket_numbers, vec!["TIX-9-T1", "TIX-9-T2"]);
}

#[test]
fn test_each_applied_payment_audits_once() {
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("Audited")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 10, "V-AUDIT");

    for _ in 0..3 {
        apply_gateway_payload(
            &mut persistence,
            &success_payload("V-AUDIT", 1000),
            GatewayDialect::Lenient,
            ovation_audit::Actor::gateway(),
            ovation_audit::Cause::new(
                String::from("V-AUDIT"),
                String::from("Gateway webhook delivery"),
            ),
        )
        .expect("application failed");
    }

    // Three deliveries, exactly one ApplyPayment event.
    let events = persistence
        .get_audit_events_by_cause("V-AUDIT")
        .expect("audit query failed");
    let applied_events: usize = events
        .iter()
        .filter(|event| event.action.name == "ApplyPayment")
        .count();
    assert_eq!(applied_events, 1);
}

#[test]
fn test_numeric_dialect_payload_applies() {
    let mut persistence: Persistence = new_persistence();
    let contestant_id: i64 = persistence
        .create_contestant("Numeric")
        .expect("Failed to create contestant");
    vote_intent(&mut persistence, contestant_id, 3, "V-NUM");

    let payload: RawGatewayPayload = serde_json::from_value(json!({
        "transRef": "V-NUM",
        "transaction_status": 0,
        "transAmount": 300,
    }))
    .expect("payload should deserialize");

    let response = apply_gateway_payload(
        &mut persistence,
        &payload,
        GatewayDialect::NumericOnly,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("application failed");
    assert!(response.applied);
}
