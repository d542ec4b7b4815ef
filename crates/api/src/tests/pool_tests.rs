// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot pool orchestration tests.

use super::helpers::{
    create_test_actor, create_test_cause, new_persistence, start_test_registration,
    success_payload, test_pricing,
};
use crate::{
    AddParticipantRequest, ApiError, CreatePoolRequest, LoggingEmailDispatcher, add_participant,
    apply_gateway_payload, create_pool,
};
use ovation_domain::GatewayDialect;
use ovation_persistence::Persistence;

fn create_paid_pool(persistence: &mut Persistence, total_slots: u32, reference: &str) -> i64 {
    let owner = start_test_registration(persistence, "sponsor");
    let response = create_pool(
        persistence,
        &test_pricing(),
        CreatePoolRequest {
            owner_identity_id: owner.identity_id,
            total_slots,
            reference: reference.to_string(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("create_pool failed");

    apply_gateway_payload(
        persistence,
        &success_payload(reference, response.total_amount),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("activation failed");

    response.pool_id
}

fn participant_request(n: u32) -> AddParticipantRequest {
    AddParticipantRequest {
        email: format!("participant{n}@example.com"),
        first_name: String::from("Participant"),
        last_name: format!("Number{n}"),
    }
}

#[test]
fn test_pool_of_three_fills_then_rejects_exhausted() {
    // Scenario: 3 slots; 3 adds succeed; the 4th fails exhausted; the
    // pool completes on the 3rd add.
    let mut persistence: Persistence = new_persistence();
    let pool_id: i64 = create_paid_pool(&mut persistence, 3, "BULK-B");

    let mut last_status: String = String::new();
    for n in 0..3 {
        let response = add_participant(
            &mut persistence,
            &LoggingEmailDispatcher,
            pool_id,
            participant_request(n),
            create_test_actor(),
            create_test_cause(),
        )
        .expect("add within capacity should succeed");
        last_status = response.pool_status;
    }
    assert_eq!(last_status, "completed");

    let err = add_participant(
        &mut persistence,
        &LoggingEmailDispatcher,
        pool_id,
        participant_request(3),
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("fourth add should fail");
    match err {
        ApiError::Conflict { rule, .. } => assert_eq!(rule, "pool_exhausted"),
        other => panic!("Expected pool_exhausted, got: {other:?}"),
    }
}

#[test]
fn test_add_before_activation_is_pool_not_active() {
    let mut persistence: Persistence = new_persistence();
    let owner = start_test_registration(&mut persistence, "pending-sponsor");
    let response = create_pool(
        &mut persistence,
        &test_pricing(),
        CreatePoolRequest {
            owner_identity_id: owner.identity_id,
            total_slots: 5,
            reference: String::from("BULK-PEND"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("create_pool failed");

    let err = add_participant(
        &mut persistence,
        &LoggingEmailDispatcher,
        response.pool_id,
        participant_request(0),
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("add before activation should fail");
    match err {
        ApiError::Conflict { rule, .. } => assert_eq!(rule, "pool_not_active"),
        other => panic!("Expected pool_not_active, got: {other:?}"),
    }
}

#[test]
fn test_slot_count_bounds_enforced_at_creation() {
    let mut persistence: Persistence = new_persistence();
    let owner = start_test_registration(&mut persistence, "bounds-sponsor");

    for bad in [0_u32, 1, 51] {
        let err = create_pool(
            &mut persistence,
            &test_pricing(),
            CreatePoolRequest {
                owner_identity_id: owner.identity_id,
                total_slots: bad,
                reference: format!("BULK-BAD-{bad}"),
            },
            create_test_actor(),
            create_test_cause(),
        )
        .expect_err("out-of-range slot count should fail");
        assert!(matches!(err, ApiError::InvalidInput { .. }));
    }
}

#[test]
fn test_pool_total_amount_uses_frozen_slot_price() {
    let mut persistence: Persistence = new_persistence();
    let owner = start_test_registration(&mut persistence, "priced-sponsor");
    let pricing = test_pricing();

    let response = create_pool(
        &mut persistence,
        &pricing,
        CreatePoolRequest {
            owner_identity_id: owner.identity_id,
            total_slots: 4,
            reference: String::from("BULK-PRICE"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("create_pool failed");

    assert_eq!(response.total_amount, pricing.price_per_slot * 4);

    let pool = persistence
        .get_pool(response.pool_id)
        .expect("get failed")
        .expect("pool should exist");
    assert_eq!(pool.price_per_slot, pricing.price_per_slot);
}

#[test]
fn test_invited_participant_registers_against_the_pool() {
    let mut persistence: Persistence = new_persistence();
    let pool_id: i64 = create_paid_pool(&mut persistence, 3, "BULK-INVITE");

    add_participant(
        &mut persistence,
        &LoggingEmailDispatcher,
        pool_id,
        AddParticipantRequest {
            email: String::from("invitee@example.com"),
            first_name: String::from("Invited"),
            last_name: String::from("Kid"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("add failed");

    let started = crate::start_registration(
        &mut persistence,
        &LoggingEmailDispatcher,
        &test_pricing(),
        crate::StartRegistrationRequest {
            email: String::from("invitee@example.com"),
            first_name: String::from("Invited"),
            last_name: String::from("Kid"),
            kind: String::from("bulk"),
            bulk_registration_id: Some(pool_id),
        },
        create_test_cause(),
    )
    .expect("bulk registration failed");

    // The slot prepaid the fee: step 8 is already complete.
    let registration = persistence
        .get_registration(started.registration_id)
        .expect("get failed")
        .expect("registration should exist");
    assert_eq!(
        registration.fee.status,
        ovation_domain::FeeStatus::Completed
    );
    assert!(registration.completed_steps.contains(&8));

    // The invitation now points at the identity and registration.
    let pool = persistence
        .get_pool(pool_id)
        .expect("get failed")
        .expect("pool should exist");
    let participant = pool
        .participants
        .iter()
        .find(|p| p.email.value() == "invitee@example.com")
        .expect("participant should exist");
    assert_eq!(participant.participant_identity_id, Some(started.identity_id));
    assert_eq!(participant.registration_id, Some(started.registration_id));
    assert_eq!(
        participant.invitation_status,
        ovation_domain::InvitationStatus::Registered
    );
}

#[test]
fn test_uninvited_bulk_registration_is_rejected() {
    let mut persistence: Persistence = new_persistence();
    let pool_id: i64 = create_paid_pool(&mut persistence, 3, "BULK-UNINVITED");

    let err = crate::start_registration(
        &mut persistence,
        &LoggingEmailDispatcher,
        &test_pricing(),
        crate::StartRegistrationRequest {
            email: String::from("gatecrasher@example.com"),
            first_name: String::from("Gate"),
            last_name: String::from("Crasher"),
            kind: String::from("bulk"),
            bulk_registration_id: Some(pool_id),
        },
        create_test_cause(),
    )
    .expect_err("uninvited registration should fail");
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_unknown_owner_is_not_found() {
    let mut persistence: Persistence = new_persistence();

    let err = create_pool(
        &mut persistence,
        &test_pricing(),
        CreatePoolRequest {
            owner_identity_id: 424_242,
            total_slots: 5,
            reference: String::from("BULK-GHOST"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("unknown owner should fail");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}
