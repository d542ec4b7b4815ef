// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration workflow orchestration.
//!
//! Handlers load the registration, apply the pure core transition, and
//! persist the outcome plus its audit event. The submission flip is a
//! conditional update, so a concurrent submission cannot double-apply.

use std::str::FromStr;

use ovation::{WorkflowCommand, WorkflowTransition, apply_workflow};
use ovation_audit::{Actor, Cause};
use ovation_domain::{Registration, RegistrationStatus};
use ovation_persistence::{Persistence, now_iso8601};

use crate::collaborators::MediaStore;
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::request_response::{
    InitiateFeeRequest, PaymentIntentResponse, SubmitRegistrationResponse, UpdateStepRequest,
    UpdateStepResponse,
};

/// Loads a registration or reports it missing.
fn load_registration(
    persistence: &mut Persistence,
    registration_id: i64,
) -> Result<Registration, ApiError> {
    persistence
        .get_registration(registration_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Registration"),
            message: format!("Registration {registration_id} does not exist"),
        })
}

/// Merges a payload into one wizard step.
///
/// # Errors
///
/// Returns an error if the registration is missing or submitted, the
/// step is out of range, or a conditional field rule is violated.
pub fn update_step(
    persistence: &mut Persistence,
    registration_id: i64,
    request: UpdateStepRequest,
    actor: Actor,
    cause: Cause,
) -> Result<UpdateStepResponse, ApiError> {
    let registration: Registration = load_registration(persistence, registration_id)?;

    let transition: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::UpdateStep {
            step: request.step,
            payload: request.payload,
            next_step: request.next_step,
        },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_step_update(&transition.new_registration, request.step)
        .map_err(translate_persistence_error)?;
    persistence
        .persist_audit_event(&transition.audit_event)
        .map_err(translate_persistence_error)?;

    Ok(UpdateStepResponse {
        registration_id,
        current_step: transition.new_registration.current_step,
        completed_steps: transition.new_registration.completed_steps,
    })
}

/// Stores a media blob and merges its URL into the media step.
///
/// A storage failure aborts this step update only; nothing else about
/// the registration changes.
///
/// # Errors
///
/// Returns an error if storage fails or the step update is rejected.
pub fn upload_step_media(
    persistence: &mut Persistence,
    media_store: &dyn MediaStore,
    registration_id: i64,
    bytes: &[u8],
    actor: Actor,
    cause: Cause,
) -> Result<UpdateStepResponse, ApiError> {
    let url: String = media_store.store(bytes).map_err(|reason| ApiError::Internal {
        message: format!("Media storage failed: {reason}"),
    })?;

    update_step(
        persistence,
        registration_id,
        UpdateStepRequest {
            step: 5,
            payload: serde_json::json!({ "media_urls": [url] }),
            next_step: None,
        },
        actor,
        cause,
    )
}

/// Submits a registration, locking it against further step edits.
///
/// # Errors
///
/// Returns `workflow_incomplete` naming the missing steps or the
/// outstanding fee when the invariant is unmet.
pub fn submit_registration(
    persistence: &mut Persistence,
    registration_id: i64,
    actor: Actor,
    cause: Cause,
) -> Result<SubmitRegistrationResponse, ApiError> {
    let registration: Registration = load_registration(persistence, registration_id)?;

    let submitted_at: String = now_iso8601().map_err(translate_persistence_error)?;
    let transition: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::Submit {
            submitted_at: submitted_at.clone(),
        },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    let flipped: bool = persistence
        .mark_submitted(registration_id, &submitted_at)
        .map_err(translate_persistence_error)?;
    if !flipped {
        // A concurrent submission won; the registration is terminal now.
        return Err(ApiError::Conflict {
            rule: String::from("workflow_terminal"),
            message: format!(
                "Registration {registration_id} has been submitted and cannot be edited"
            ),
        });
    }

    persistence
        .persist_audit_event(&transition.audit_event)
        .map_err(translate_persistence_error)?;

    Ok(SubmitRegistrationResponse {
        registration_id,
        status: transition.new_registration.status.as_str().to_string(),
        submitted_at,
    })
}

/// Moves a submitted registration through the review lifecycle.
///
/// # Errors
///
/// Returns an error if the transition is not permitted or the
/// registration has already moved on.
pub fn review_registration(
    persistence: &mut Persistence,
    registration_id: i64,
    target: &str,
    actor: Actor,
    cause: Cause,
) -> Result<SubmitRegistrationResponse, ApiError> {
    let registration: Registration = load_registration(persistence, registration_id)?;
    let target: RegistrationStatus = RegistrationStatus::from_str(target)
        .map_err(crate::error::translate_domain_error)?;

    let transition: WorkflowTransition = apply_workflow(
        &registration,
        WorkflowCommand::Review { target },
        actor,
        cause,
    )
    .map_err(translate_core_error)?;

    let applied: bool = persistence
        .set_review_status(registration_id, registration.status, target)
        .map_err(translate_persistence_error)?;
    if !applied {
        return Err(ApiError::Conflict {
            rule: String::from("status_transition"),
            message: format!(
                "Registration {registration_id} changed status concurrently; reload and retry"
            ),
        });
    }

    persistence
        .persist_audit_event(&transition.audit_event)
        .map_err(translate_persistence_error)?;

    Ok(SubmitRegistrationResponse {
        registration_id,
        status: target.as_str().to_string(),
        submitted_at: registration.submitted_at.unwrap_or_default(),
    })
}

/// Creates the payment intent for a registration fee.
///
/// The caller supplies the unique reference obtained from the gateway
/// handshake; the intent must exist before any outcome for that
/// reference can be applied.
///
/// # Errors
///
/// Returns an error if the registration is missing, already settled,
/// or the reference is already in use.
pub fn initiate_fee_payment(
    persistence: &mut Persistence,
    pricing: &crate::pricing::Pricing,
    registration_id: i64,
    request: InitiateFeeRequest,
) -> Result<PaymentIntentResponse, ApiError> {
    let registration: Registration = load_registration(persistence, registration_id)?;

    if registration.fee.status == ovation_domain::FeeStatus::Completed {
        return Err(ApiError::Conflict {
            rule: String::from("fee_settled"),
            message: format!("Registration {registration_id} has already paid its fee"),
        });
    }

    persistence
        .create_payment_record(
            &request.reference,
            registration.fee.amount,
            &pricing.currency,
            ovation_domain::SubjectType::Registration,
            registration_id,
        )
        .map_err(translate_persistence_error)?;
    persistence
        .set_fee_reference(registration_id, &request.reference)
        .map_err(translate_persistence_error)?;

    Ok(PaymentIntentResponse {
        reference: request.reference,
        amount: registration.fee.amount,
        currency: pricing.currency.clone(),
    })
}
