// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Email, FeeStatus, Identity, InvitationStatus, PaymentStatus, PoolParticipant, PoolStatus,
    RegistrationKind, RegistrationStatus, Role, SlotPool, SubjectType,
};
use std::str::FromStr;

#[test]
fn test_email_normalized_to_lowercase() {
    let email: Email = Email::new("  Jane.Doe@Example.COM ");
    assert_eq!(email.value(), "jane.doe@example.com");
}

#[test]
fn test_email_case_insensitive_equality() {
    assert_eq!(Email::new("a@x.com"), Email::new("A@X.COM"));
}

#[test]
fn test_identity_starts_unverified() {
    let identity: Identity = Identity::new(
        String::from("Jane"),
        String::from("Doe"),
        Email::new("jane@example.com"),
        Role::Contestant,
    );

    assert!(!identity.email_verified);
    assert!(!identity.credential_set);
    assert!(identity.active);
    assert_eq!(identity.identity_id, None);
}

#[test]
fn test_payment_status_terminality() {
    assert!(PaymentStatus::Successful.is_terminal());
    assert!(PaymentStatus::Failed.is_terminal());
    assert!(PaymentStatus::Refunded.is_terminal());
    assert!(!PaymentStatus::Initiated.is_terminal());
    assert!(!PaymentStatus::Pending.is_terminal());
    assert!(!PaymentStatus::Cancelled.is_terminal());
}

#[test]
fn test_payment_status_round_trips_through_strings() {
    for status in [
        PaymentStatus::Initiated,
        PaymentStatus::Pending,
        PaymentStatus::Successful,
        PaymentStatus::Failed,
        PaymentStatus::Cancelled,
        PaymentStatus::Refunded,
    ] {
        assert_eq!(PaymentStatus::from_str(status.as_str()), Ok(status));
    }
}

#[test]
fn test_unknown_payment_status_rejected() {
    assert!(PaymentStatus::from_str("settled").is_err());
}

#[test]
fn test_registration_status_locks_after_submission() {
    assert!(!RegistrationStatus::Draft.is_locked());
    assert!(RegistrationStatus::Submitted.is_locked());
    assert!(RegistrationStatus::Approved.is_locked());
}

#[test]
fn test_registration_status_transitions() {
    assert!(RegistrationStatus::Draft.can_transition_to(RegistrationStatus::Submitted));
    assert!(RegistrationStatus::Submitted.can_transition_to(RegistrationStatus::UnderReview));
    assert!(RegistrationStatus::UnderReview.can_transition_to(RegistrationStatus::Approved));
    assert!(RegistrationStatus::UnderReview.can_transition_to(RegistrationStatus::Rejected));
    assert!(RegistrationStatus::Approved.can_transition_to(RegistrationStatus::Qualified));
    assert!(RegistrationStatus::Approved.can_transition_to(RegistrationStatus::Disqualified));

    // Submission is one-way.
    assert!(!RegistrationStatus::Submitted.can_transition_to(RegistrationStatus::Draft));
    // Rejected registrations never qualify.
    assert!(!RegistrationStatus::Rejected.can_transition_to(RegistrationStatus::Qualified));
}

#[test]
fn test_pool_status_gating() {
    assert!(PoolStatus::Active.accepts_participants());
    assert!(!PoolStatus::Draft.accepts_participants());
    assert!(!PoolStatus::Completed.accepts_participants());

    assert!(PoolStatus::Draft.is_activatable());
    assert!(PoolStatus::PaymentPending.is_activatable());
    assert!(!PoolStatus::Active.is_activatable());
}

#[test]
fn test_slot_pool_amounts_and_remaining() {
    let pool: SlotPool = SlotPool {
        pool_id: 1,
        owner_identity_id: 7,
        total_slots: 5,
        used_slots: 2,
        price_per_slot: 25_000,
        status: PoolStatus::Active,
        payment_status: FeeStatus::Completed,
        payment_reference: Some(String::from("BULK-1")),
        participants: Vec::new(),
    };

    assert_eq!(pool.total_amount(), 125_000);
    assert_eq!(pool.remaining_slots(), 3);
}

#[test]
fn test_pool_participant_starts_pending() {
    let participant: PoolParticipant = PoolParticipant::new(
        Email::new("kid@example.com"),
        String::from("Kid"),
        String::from("Example"),
    );

    assert_eq!(participant.invitation_status, InvitationStatus::Pending);
    assert_eq!(participant.participant_identity_id, None);
    assert_eq!(participant.registration_id, None);
}

#[test]
fn test_subject_type_round_trips_through_strings() {
    for subject in [
        SubjectType::Registration,
        SubjectType::Bulk,
        SubjectType::Vote,
        SubjectType::Ticket,
    ] {
        assert_eq!(SubjectType::from_str(subject.as_str()), Ok(subject));
    }
}

#[test]
fn test_registration_kind_parsing() {
    assert_eq!(
        RegistrationKind::from_str("individual"),
        Ok(RegistrationKind::Individual)
    );
    assert_eq!(RegistrationKind::from_str("group"), Ok(RegistrationKind::Group));
    assert_eq!(RegistrationKind::from_str("bulk"), Ok(RegistrationKind::Bulk));
    assert!(RegistrationKind::from_str("solo").is_err());
}
