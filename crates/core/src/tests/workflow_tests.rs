// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_draft_registration, create_test_actor, create_test_cause};
use crate::{CoreError, WorkflowCommand, WorkflowTransition, apply_workflow};
use ovation_domain::{DomainError, FeeStatus, RegistrationKind, RegistrationStatus};
use serde_json::json;

#[test]
fn test_update_step_merges_and_marks_complete() {
    let registration = create_draft_registration(RegistrationKind::Individual);

    let result: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: 1,
            payload: json!({"date_of_birth": "2008-03-01"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.new_registration.completed_steps, vec![1]);
    assert!(result.new_registration.payloads.slot(1).is_some());
    assert_eq!(result.audit_event.action.name, "UpdateStep");
}

#[test]
fn test_current_step_advances_to_lowest_incomplete_required() {
    let mut registration = create_draft_registration(RegistrationKind::Individual);
    registration.completed_steps = vec![1];

    let result: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: 2,
            payload: json!({"category": "Singing"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    // Individuals skip step 3; the next required step is the guardian.
    assert_eq!(result.new_registration.current_step, 4);
}

#[test]
fn test_caller_supplied_next_step_wins() {
    let registration = create_draft_registration(RegistrationKind::Individual);

    let result: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: 1,
            payload: json!({"date_of_birth": "2008-03-01"}),
            next_step: Some(6),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(result.new_registration.current_step, 6);
}

#[test]
fn test_update_step_rejected_after_submission() {
    let mut registration = create_draft_registration(RegistrationKind::Individual);
    registration.status = RegistrationStatus::Submitted;

    let err = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: 1,
            payload: json!({"date_of_birth": "2008-03-01"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::WorkflowTerminal { registration_id: 1 })
    );
}

#[test]
fn test_conditional_field_violation_blocks_completion() {
    let registration = create_draft_registration(RegistrationKind::Individual);

    let err = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: 2,
            payload: json!({"category": "Other"}),
            next_step: None,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::StepValidationError {
            step: 2,
            field: String::from("other_category"),
        })
    );
}

#[test]
fn test_submit_fails_naming_missing_guardian_step() {
    let mut registration = create_draft_registration(RegistrationKind::Individual);
    registration.completed_steps = vec![1, 2, 5, 6, 7, 8];
    registration.fee.status = FeeStatus::Completed;

    let err = apply_workflow(
        &registration,
        WorkflowCommand::Submit {
            submitted_at: String::from("2026-02-01T12:00:00Z"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    match err {
        CoreError::DomainViolation(DomainError::WorkflowIncomplete {
            missing_steps,
            payment_missing,
        }) => {
            assert_eq!(missing_steps, vec![4]);
            assert!(!payment_missing);
        }
        other => panic!("Expected WorkflowIncomplete, got: {other:?}"),
    }
}

#[test]
fn test_submit_fails_on_outstanding_fee() {
    let mut registration = create_draft_registration(RegistrationKind::Group);
    registration.completed_steps = vec![1, 2, 3, 5, 6, 7];

    let err = apply_workflow(
        &registration,
        WorkflowCommand::Submit {
            submitted_at: String::from("2026-02-01T12:00:00Z"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    match err {
        CoreError::DomainViolation(DomainError::WorkflowIncomplete {
            payment_missing, ..
        }) => assert!(payment_missing),
        other => panic!("Expected WorkflowIncomplete, got: {other:?}"),
    }
}

#[test]
fn test_submit_succeeds_and_is_one_way() {
    let mut registration = create_draft_registration(RegistrationKind::Individual);
    registration.completed_steps = vec![1, 2, 4, 5, 6, 7, 8];
    registration.fee.status = FeeStatus::Completed;

    let result: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::Submit {
            submitted_at: String::from("2026-02-01T12:00:00Z"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    assert_eq!(
        result.new_registration.status,
        RegistrationStatus::Submitted
    );
    assert_eq!(
        result.new_registration.submitted_at.as_deref(),
        Some("2026-02-01T12:00:00Z")
    );

    // A second submission is rejected.
    let err = apply_workflow(
        &result.new_registration,
        WorkflowCommand::Submit {
            submitted_at: String::from("2026-02-01T13:00:00Z"),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::WorkflowTerminal { registration_id: 1 })
    );
}

#[test]
fn test_review_follows_lifecycle_table() {
    let mut registration = create_draft_registration(RegistrationKind::Individual);
    registration.status = RegistrationStatus::Submitted;

    let result: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::Review {
            target: RegistrationStatus::UnderReview,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(
        result.new_registration.status,
        RegistrationStatus::UnderReview
    );

    // Draft registrations cannot enter review.
    let draft = create_draft_registration(RegistrationKind::Individual);
    assert!(
        apply_workflow(
            &draft,
            WorkflowCommand::Review {
                target: RegistrationStatus::UnderReview,
            },
            create_test_actor(),
            create_test_cause(),
        )
        .is_err()
    );
}

#[test]
fn test_review_cannot_shortcut_submission() {
    let registration = create_draft_registration(RegistrationKind::Individual);

    let err = apply_workflow(
        &registration,
        WorkflowCommand::Review {
            target: RegistrationStatus::Submitted,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::InvalidStatusTransition { .. })
    ));
}
