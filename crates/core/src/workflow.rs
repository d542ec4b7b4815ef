// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::WorkflowCommand;
use crate::error::CoreError;
use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{
    DomainError, Registration, RegistrationStatus, next_required_step, step_name,
    validate_step_number, validate_step_payload,
};

/// The result of a successful workflow transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTransition {
    /// The registration after the transition.
    pub new_registration: Registration,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Converts a registration to a snapshot for audit purposes.
#[must_use]
pub fn registration_snapshot(registration: &Registration) -> StateSnapshot {
    StateSnapshot::new(format!(
        "registration={},status={},current_step={},completed={:?},fee={}",
        registration.registration_id,
        registration.status,
        registration.current_step,
        registration.completed_steps,
        registration.fee.status.as_str(),
    ))
}

/// Applies a workflow command to a registration, producing the new
/// registration and an audit event.
///
/// Step updates are rejected once the registration leaves `Draft`;
/// submission checks the full completion invariant; review transitions
/// follow the explicit lifecycle table.
///
/// # Arguments
///
/// * `registration` - The current registration (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The registration is already submitted (`WorkflowTerminal`)
/// - The step payload violates a conditional field rule
/// - The submission invariant is unmet (`WorkflowIncomplete`)
/// - A review transition is not permitted by the lifecycle rules
pub fn apply_workflow(
    registration: &Registration,
    command: WorkflowCommand,
    actor: Actor,
    cause: Cause,
) -> Result<WorkflowTransition, CoreError> {
    match command {
        WorkflowCommand::UpdateStep {
            step,
            payload,
            next_step,
        } => {
            if registration.status.is_locked() {
                return Err(CoreError::DomainViolation(DomainError::WorkflowTerminal {
                    registration_id: registration.registration_id,
                }));
            }

            validate_step_number(step)?;
            if let Some(next) = next_step {
                validate_step_number(next)?;
            }
            validate_step_payload(step, &payload)?;

            let before: StateSnapshot = registration_snapshot(registration);

            let mut new_registration: Registration = registration.clone();
            new_registration.payloads.merge(step, payload);
            new_registration.record_step_completion(step);
            new_registration.current_step = next_step
                .or_else(|| {
                    next_required_step(new_registration.kind, &new_registration.completed_steps)
                })
                .unwrap_or(step);

            let after: StateSnapshot = registration_snapshot(&new_registration);

            let action: Action = Action::new(
                String::from("UpdateStep"),
                Some(format!(
                    "Updated step {step} ({}) of registration {}",
                    step_name(step),
                    registration.registration_id
                )),
            );

            Ok(WorkflowTransition {
                new_registration,
                audit_event: AuditEvent::new(actor, cause, action, before, after),
            })
        }
        WorkflowCommand::Submit { submitted_at } => {
            if registration.status.is_locked() {
                return Err(CoreError::DomainViolation(DomainError::WorkflowTerminal {
                    registration_id: registration.registration_id,
                }));
            }

            registration.evaluate_submission()?;

            let before: StateSnapshot = registration_snapshot(registration);

            let mut new_registration: Registration = registration.clone();
            new_registration.status = RegistrationStatus::Submitted;
            new_registration.submitted_at = Some(submitted_at);

            let after: StateSnapshot = registration_snapshot(&new_registration);

            let action: Action = Action::new(
                String::from("SubmitRegistration"),
                Some(format!(
                    "Submitted registration {}",
                    registration.registration_id
                )),
            );

            Ok(WorkflowTransition {
                new_registration,
                audit_event: AuditEvent::new(actor, cause, action, before, after),
            })
        }
        WorkflowCommand::Review { target } => {
            // Submission carries its own invariant and must go through Submit.
            if target == RegistrationStatus::Submitted {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition {
                        from: registration.status.as_str().to_string(),
                        to: target.as_str().to_string(),
                        reason: String::from("submission is not a review transition"),
                    },
                ));
            }
            if !registration.status.can_transition_to(target) {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition {
                        from: registration.status.as_str().to_string(),
                        to: target.as_str().to_string(),
                        reason: String::from(
                            "transition not permitted by registration lifecycle rules",
                        ),
                    },
                ));
            }

            let before: StateSnapshot = registration_snapshot(registration);

            let mut new_registration: Registration = registration.clone();
            new_registration.status = target;

            let after: StateSnapshot = registration_snapshot(&new_registration);

            let action: Action = Action::new(
                String::from("ReviewRegistration"),
                Some(format!(
                    "Moved registration {} to {}",
                    registration.registration_id, target
                )),
            );

            Ok(WorkflowTransition {
                new_registration,
                audit_event: AuditEvent::new(actor, cause, action, before, after),
            })
        }
    }
}
