// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_payment_record, create_test_actor, create_test_cause};
use crate::{CoreError, FanOutEffect, ReconcileDecision, decide_reconciliation};
use ovation_domain::{GatewayOutcome, PaymentStatus, SubjectType};
use serde_json::json;

fn success_outcome(reference: &str) -> GatewayOutcome {
    GatewayOutcome::Success {
        reference: reference.to_string(),
        amount: Some(50_000),
    }
}

#[test]
fn test_pending_record_with_success_applies_successful() {
    let record = create_payment_record("R1", PaymentStatus::Pending, SubjectType::Registration, 7);

    let decision = decide_reconciliation(
        &record,
        &success_outcome("R1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    match decision {
        ReconcileDecision::Apply {
            new_status,
            amount_observed,
            effect,
            audit_event,
        } => {
            assert_eq!(new_status, PaymentStatus::Successful);
            assert_eq!(amount_observed, Some(50_000));
            assert_eq!(
                effect,
                FanOutEffect::SettleRegistrationFee {
                    registration_id: 7,
                    success: true,
                }
            );
            assert_eq!(audit_event.action.name, "ApplyPayment");
        }
        other => panic!("Expected Apply, got: {other:?}"),
    }
}

#[test]
fn test_failure_outcome_applies_failed_status() {
    let record = create_payment_record("R1", PaymentStatus::Pending, SubjectType::Registration, 7);

    let decision = decide_reconciliation(
        &record,
        &GatewayOutcome::Failure {
            reference: String::from("R1"),
            reason: String::from("\"declined\""),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    match decision {
        ReconcileDecision::Apply {
            new_status, effect, ..
        } => {
            assert_eq!(new_status, PaymentStatus::Failed);
            assert_eq!(
                effect,
                FanOutEffect::SettleRegistrationFee {
                    registration_id: 7,
                    success: false,
                }
            );
        }
        other => panic!("Expected Apply, got: {other:?}"),
    }
}

#[test]
fn test_terminal_record_short_circuits_without_effects() {
    for status in [
        PaymentStatus::Successful,
        PaymentStatus::Failed,
        PaymentStatus::Refunded,
    ] {
        let mut record = create_payment_record("R1", status, SubjectType::Vote, 42);
        record.processed_at = Some(String::from("2026-02-01T12:00:00Z"));

        let decision = decide_reconciliation(
            &record,
            &success_outcome("R1"),
            create_test_actor(),
            create_test_cause(),
        )
        .unwrap();

        assert_eq!(
            decision,
            ReconcileDecision::AlreadyTerminal {
                status,
                processed_at: Some(String::from("2026-02-01T12:00:00Z")),
            }
        );
    }
}

#[test]
fn test_decision_is_deterministic_across_replays() {
    let record = create_payment_record("R1", PaymentStatus::Pending, SubjectType::Bulk, 3);

    let first = decide_reconciliation(
        &record,
        &success_outcome("R1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let second = decide_reconciliation(
        &record,
        &success_outcome("R1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_ambiguous_outcome_holds_the_record() {
    let record = create_payment_record("R1", PaymentStatus::Pending, SubjectType::Registration, 7);
    let raw = json!({"reference": "R1", "status": "in_flight"});

    let decision = decide_reconciliation(
        &record,
        &GatewayOutcome::Ambiguous { raw: raw.clone() },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(decision, ReconcileDecision::Hold { raw });
}

#[test]
fn test_vote_effect_is_keyed_by_reference() {
    let record = create_payment_record("V1", PaymentStatus::Pending, SubjectType::Vote, 42);

    let decision = decide_reconciliation(
        &record,
        &success_outcome("V1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    match decision {
        ReconcileDecision::Apply { effect, .. } => {
            assert_eq!(
                effect,
                FanOutEffect::CreditVotes {
                    reference: String::from("V1"),
                    success: true,
                }
            );
        }
        other => panic!("Expected Apply, got: {other:?}"),
    }
}

#[test]
fn test_ticket_effect_is_keyed_by_reference() {
    let record = create_payment_record("T1", PaymentStatus::Pending, SubjectType::Ticket, 9);

    let decision = decide_reconciliation(
        &record,
        &success_outcome("T1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    match decision {
        ReconcileDecision::Apply { effect, .. } => {
            assert_eq!(
                effect,
                FanOutEffect::CompleteTicketOrder {
                    reference: String::from("T1"),
                    success: true,
                }
            );
        }
        other => panic!("Expected Apply, got: {other:?}"),
    }
}

#[test]
fn test_mismatched_reference_is_internal_error() {
    let record = create_payment_record("R1", PaymentStatus::Pending, SubjectType::Registration, 7);

    let err = decide_reconciliation(
        &record,
        &success_outcome("R2"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(err, CoreError::Internal(_)));
}

#[test]
fn test_initiated_record_is_also_appliable() {
    let record = create_payment_record("R1", PaymentStatus::Initiated, SubjectType::Ticket, 9);

    let decision = decide_reconciliation(
        &record,
        &success_outcome("R1"),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert!(matches!(decision, ReconcileDecision::Apply { .. }));
}
