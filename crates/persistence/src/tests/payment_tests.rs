// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Idempotent-replay tests for the reconciliation transition.

use super::helpers::{create_test_identity, new_persistence, test_email};
use crate::{Persistence, PersistenceError};
use ovation::FanOutEffect;
use ovation_domain::{
    FeeStatus, PaymentRecord, PaymentStatus, Registration, RegistrationKind, SubjectType,
    TicketOrder, TicketStatus,
};

#[test]
fn test_registration_fee_applies_exactly_once() {
    let mut persistence: Persistence = new_persistence();
    let owner: i64 = create_test_identity(&mut persistence, "payer");
    let registration_id: i64 = persistence
        .create_registration(owner, RegistrationKind::Individual, 50_000, None)
        .expect("Failed to create registration");

    persistence
        .set_fee_reference(registration_id, "REG-1")
        .expect("Failed to set reference");
    persistence
        .create_payment_record("REG-1", 50_000, "NGN", SubjectType::Registration, registration_id)
        .expect("Failed to create payment record");

    let effect = FanOutEffect::SettleRegistrationFee {
        registration_id,
        success: true,
    };

    let first: bool = persistence
        .execute_reconciliation("REG-1", PaymentStatus::Successful, &effect)
        .expect("First application failed");
    let second: bool = persistence
        .execute_reconciliation("REG-1", PaymentStatus::Successful, &effect)
        .expect("Replay should not error");

    assert!(first);
    assert!(!second);

    let record: PaymentRecord = persistence
        .get_payment_record("REG-1")
        .expect("get failed")
        .expect("record should exist");
    assert_eq!(record.status, PaymentStatus::Successful);
    assert!(record.processed_at.is_some());

    let registration: Registration = persistence
        .get_registration(registration_id)
        .expect("get failed")
        .expect("registration should exist");
    assert_eq!(registration.fee.status, FeeStatus::Completed);
    assert!(registration.completed_steps.contains(&8));
}

#[test]
fn test_failed_outcome_marks_fee_failed_without_step() {
    let mut persistence: Persistence = new_persistence();
    let owner: i64 = create_test_identity(&mut persistence, "declined");
    let registration_id: i64 = persistence
        .create_registration(owner, RegistrationKind::Individual, 50_000, None)
        .expect("Failed to create registration");

    persistence
        .create_payment_record("REG-2", 50_000, "NGN", SubjectType::Registration, registration_id)
        .expect("Failed to create payment record");

    let won: bool = persistence
        .execute_reconciliation(
            "REG-2",
            PaymentStatus::Failed,
            &FanOutEffect::SettleRegistrationFee {
                registration_id,
                success: false,
            },
        )
        .expect("Application failed");
    assert!(won);

    let registration: Registration = persistence
        .get_registration(registration_id)
        .expect("get failed")
        .expect("registration should exist");
    assert_eq!(registration.fee.status, FeeStatus::Failed);
    assert!(!registration.completed_steps.contains(&8));
}

#[test]
fn test_terminal_record_blocks_conflicting_late_outcome() {
    // A late failure delivery for an already-successful reference must
    // not flip the record back.
    let mut persistence: Persistence = new_persistence();
    let owner: i64 = create_test_identity(&mut persistence, "late");
    let registration_id: i64 = persistence
        .create_registration(owner, RegistrationKind::Individual, 50_000, None)
        .expect("Failed to create registration");

    persistence
        .create_payment_record("REG-3", 50_000, "NGN", SubjectType::Registration, registration_id)
        .expect("Failed to create payment record");

    persistence
        .execute_reconciliation(
            "REG-3",
            PaymentStatus::Successful,
            &FanOutEffect::SettleRegistrationFee {
                registration_id,
                success: true,
            },
        )
        .expect("Application failed");

    let late: bool = persistence
        .execute_reconciliation(
            "REG-3",
            PaymentStatus::Failed,
            &FanOutEffect::SettleRegistrationFee {
                registration_id,
                success: false,
            },
        )
        .expect("Late delivery should not error");
    assert!(!late);

    let record: PaymentRecord = persistence
        .get_payment_record("REG-3")
        .expect("get failed")
        .expect("record should exist");
    assert_eq!(record.status, PaymentStatus::Successful);
}

#[test]
fn test_duplicate_reference_rejected_at_intent_time() {
    let mut persistence: Persistence = new_persistence();
    persistence
        .create_payment_record("DUP-1", 1000, "NGN", SubjectType::Ticket, 1)
        .expect("First intent should succeed");

    let err = persistence
        .create_payment_record("DUP-1", 1000, "NGN", SubjectType::Ticket, 2)
        .expect_err("Duplicate reference should be rejected");
    assert!(matches!(err, PersistenceError::DuplicateKey(_)));
}

#[test]
fn test_ticket_order_completion_mints_numbers_once() {
    let mut persistence: Persistence = new_persistence();
    persistence
        .create_ticket_order(&test_email("buyer"), 3, 15_000, "TIX-1")
        .expect("Failed to create order");
    persistence
        .create_payment_record("TIX-1", 15_000, "NGN", SubjectType::Ticket, 1)
        .expect("Failed to create payment record");

    let effect = FanOutEffect::CompleteTicketOrder {
        reference: String::from("TIX-1"),
        success: true,
    };

    assert!(
        persistence
            .execute_reconciliation("TIX-1", PaymentStatus::Successful, &effect)
            .expect("Application failed")
    );
    assert!(
        !persistence
            .execute_reconciliation("TIX-1", PaymentStatus::Successful, &effect)
            .expect("Replay should not error")
    );

    let order: TicketOrder = persistence
        .get_ticket_order("TIX-1")
        .expect("get failed")
        .expect("order should exist");
    assert_eq!(order.status, TicketStatus::Completed);
    assert_eq!(
        order.ticket_numbers,
        vec!["TIX-1-T1", "TIX-1-T2", "TIX-1-T3"]
    );
}

#[test]
fn test_missing_subject_is_surfaced_not_swallowed() {
    // The payment record points at a registration that never existed:
    // the winning applier must surface the inconsistency.
    let mut persistence: Persistence = new_persistence();
    persistence
        .create_payment_record("ORPHAN-1", 1000, "NGN", SubjectType::Registration, 424_242)
        .expect("Failed to create payment record");

    let err = persistence
        .execute_reconciliation(
            "ORPHAN-1",
            PaymentStatus::Successful,
            &FanOutEffect::SettleRegistrationFee {
                registration_id: 424_242,
                success: true,
            },
        )
        .expect_err("Missing subject should error");
    assert!(matches!(err, PersistenceError::NotFound(_)));
}

#[test]
fn test_pending_payment_listing_excludes_terminal_records() {
    let mut persistence: Persistence = new_persistence();
    persistence
        .create_payment_record("P-1", 1000, "NGN", SubjectType::Ticket, 1)
        .expect("intent failed");
    persistence
        .create_ticket_order(&test_email("lister"), 1, 1000, "P-2")
        .expect("order failed");
    persistence
        .create_payment_record("P-2", 1000, "NGN", SubjectType::Ticket, 1)
        .expect("intent failed");

    persistence
        .execute_reconciliation(
            "P-2",
            PaymentStatus::Successful,
            &FanOutEffect::CompleteTicketOrder {
                reference: String::from("P-2"),
                success: true,
            },
        )
        .expect("Application failed");

    let pending: Vec<PaymentRecord> = persistence
        .list_pending_payments()
        .expect("listing failed");
    let references: Vec<&str> = pending.iter().map(|r| r.reference.as_str()).collect();

    assert!(references.contains(&"P-1"));
    assert!(!references.contains(&"P-2"));
}
