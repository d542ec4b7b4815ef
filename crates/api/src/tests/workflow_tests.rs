// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow orchestration tests, including the full wizard walk.

use super::helpers::{
    create_test_actor, create_test_cause, new_persistence, start_test_registration,
    success_payload, test_pricing,
};
use crate::{
    ApiError, InMemoryMediaStore, InitiateFeeRequest, UpdateStepRequest, apply_gateway_payload,
    initiate_fee_payment, review_registration, submit_registration, update_step,
    upload_step_media,
};
use ovation_domain::{GatewayDialect, RegistrationStatus};
use ovation_persistence::Persistence;
use serde_json::json;

fn fill_step(persistence: &mut Persistence, registration_id: i64, step: u8, payload: serde_json::Value) {
    update_step(
        persistence,
        registration_id,
        UpdateStepRequest {
            step,
            payload,
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect("step update failed");
}

/// Fills every individual step except the guardian (4) and fee (8).
fn fill_individual_steps_except_guardian(persistence: &mut Persistence, registration_id: i64) {
    fill_step(persistence, registration_id, 1, json!({"date_of_birth": "2008-03-01"}));
    fill_step(persistence, registration_id, 2, json!({"category": "Singing"}));
    fill_step(
        persistence,
        registration_id,
        5,
        json!({"media_urls": ["https://cdn.example.com/audition.mp4"]}),
    );
    fill_step(persistence, registration_id, 6, json!({"preferred_city": "Lagos"}));
    fill_step(persistence, registration_id, 7, json!({"accepted": true}));
}

fn settle_fee(persistence: &mut Persistence, registration_id: i64, reference: &str) {
    initiate_fee_payment(
        persistence,
        &test_pricing(),
        registration_id,
        InitiateFeeRequest {
            reference: reference.to_string(),
        },
    )
    .expect("initiate failed");
    apply_gateway_payload(
        persistence,
        &success_payload(reference, test_pricing().individual_fee),
        GatewayDialect::Lenient,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("apply failed");
}

#[test]
fn test_submit_names_missing_guardian_then_succeeds() {
    // Scenario: an individual registration missing step 4 is rejected
    // naming it; after step 4 and a settled fee, submission succeeds.
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "wizard");
    let registration_id: i64 = started.registration_id;

    fill_individual_steps_except_guardian(&mut persistence, registration_id);
    settle_fee(&mut persistence, registration_id, "FEE-wizard");

    let err = submit_registration(
        &mut persistence,
        registration_id,
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("submission should fail");
    match err {
        ApiError::Conflict { rule, message } => {
            assert_eq!(rule, "workflow_incomplete");
            assert!(message.contains('4'), "message should name step 4: {message}");
        }
        other => panic!("Expected Conflict, got: {other:?}"),
    }

    fill_step(
        &mut persistence,
        registration_id,
        4,
        json!({"guardian_name": "Pat Registrant", "guardian_phone": "+2348000000000"}),
    );

    let response = submit_registration(
        &mut persistence,
        registration_id,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("submission should succeed");
    assert_eq!(response.status, "submitted");

    // The transition is one-way; further edits are rejected.
    let locked = update_step(
        &mut persistence,
        registration_id,
        UpdateStepRequest {
            step: 1,
            payload: json!({"date_of_birth": "2009-01-01"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("submitted workflow should reject edits");
    assert!(matches!(locked, ApiError::Conflict { .. }));
}

#[test]
fn test_submit_blocked_by_outstanding_fee() {
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "unpaid");
    let registration_id: i64 = started.registration_id;

    fill_individual_steps_except_guardian(&mut persistence, registration_id);
    fill_step(
        &mut persistence,
        registration_id,
        4,
        json!({"guardian_name": "Pat Registrant"}),
    );

    let err = submit_registration(
        &mut persistence,
        registration_id,
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("unpaid submission should fail");
    match err {
        ApiError::Conflict { message, .. } => {
            assert!(message.contains("fee"), "message should mention the fee: {message}");
        }
        other => panic!("Expected Conflict, got: {other:?}"),
    }
}

#[test]
fn test_media_upload_merges_url_into_step_five() {
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "media");

    let response = upload_step_media(
        &mut persistence,
        &InMemoryMediaStore,
        started.registration_id,
        b"fake-video-bytes",
        create_test_actor(),
        create_test_cause(),
    )
    .expect("upload failed");
    assert!(response.completed_steps.contains(&5));

    let registration = persistence
        .get_registration(started.registration_id)
        .expect("get failed")
        .expect("registration should exist");
    let urls = registration
        .payloads
        .slot(5)
        .and_then(|p| p.get("media_urls"))
        .and_then(serde_json::Value::as_array)
        .expect("media_urls should be stored");
    assert_eq!(urls.len(), 1);
}

#[test]
fn test_media_store_failure_aborts_only_that_update() {
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "badmedia");

    // The in-memory store refuses empty blobs.
    let err = upload_step_media(
        &mut persistence,
        &InMemoryMediaStore,
        started.registration_id,
        b"",
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("empty blob should fail");
    assert!(matches!(err, ApiError::Internal { .. }));

    let registration = persistence
        .get_registration(started.registration_id)
        .expect("get failed")
        .expect("registration should exist");
    assert!(registration.payloads.slot(5).is_none());
    assert!(!registration.completed_steps.contains(&5));
}

#[test]
fn test_review_path_after_submission() {
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "review");
    let registration_id: i64 = started.registration_id;

    fill_individual_steps_except_guardian(&mut persistence, registration_id);
    fill_step(
        &mut persistence,
        registration_id,
        4,
        json!({"guardian_name": "Pat Registrant"}),
    );
    settle_fee(&mut persistence, registration_id, "FEE-review");
    submit_registration(
        &mut persistence,
        registration_id,
        create_test_actor(),
        create_test_cause(),
    )
    .expect("submission failed");

    for (target, expected) in [
        ("under_review", RegistrationStatus::UnderReview),
        ("approved", RegistrationStatus::Approved),
        ("qualified", RegistrationStatus::Qualified),
    ] {
        let response = review_registration(
            &mut persistence,
            registration_id,
            target,
            create_test_actor(),
            create_test_cause(),
        )
        .expect("review transition failed");
        assert_eq!(response.status, expected.as_str());
    }

    // Qualified is the end of the line.
    assert!(
        review_registration(
            &mut persistence,
            registration_id,
            "rejected",
            create_test_actor(),
            create_test_cause(),
        )
        .is_err()
    );
}

#[test]
fn test_fee_cannot_be_initiated_twice_after_settlement() {
    let mut persistence: Persistence = new_persistence();
    let started = start_test_registration(&mut persistence, "doublefee");

    settle_fee(&mut persistence, started.registration_id, "FEE-double");

    let err = initiate_fee_payment(
        &mut persistence,
        &test_pricing(),
        started.registration_id,
        InitiateFeeRequest {
            reference: String::from("FEE-double-2"),
        },
    )
    .expect_err("settled fee should not re-initiate");
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_missing_registration_is_not_found() {
    let mut persistence: Persistence = new_persistence();

    let err = update_step(
        &mut persistence,
        9999,
        UpdateStepRequest {
            step: 1,
            payload: json!({"date_of_birth": "2008-03-01"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .expect_err("missing registration should fail");
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}
