// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment application: the reconciler's orchestration layer.
//!
//! Both trigger paths — the gateway webhook and the client-initiated
//! verification call — land on [`apply_gateway_payload`]. The payload
//! is normalized first (fail-closed), the pure core decision runs
//! against the loaded record, and the persistence layer executes the
//! conditional transition plus fan-out. Replays and lost races return
//! the stored result with `applied = false`.

use ovation::{ReconcileDecision, decide_reconciliation};
use ovation_audit::{Actor, Cause};
use ovation_domain::{
    GatewayDialect, GatewayOutcome, PaymentRecord, RawGatewayPayload, normalize,
};
use ovation_persistence::{Persistence, PersistenceError};
use tracing::{info, warn};

use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::request_response::PaymentApplicationResponse;

/// Applies a raw gateway payload to its payment reference.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `payload` - The raw webhook/verification payload
/// * `dialect` - The status conventions this integration accepts
/// * `actor` - Who triggered the application (gateway or identity)
/// * `cause` - Why (webhook delivery vs. client verification)
///
/// # Errors
///
/// - `AmbiguousUpstream` when the status is unrecognized: the record
///   stays pending and the delivery is not acked, so the gateway
///   retries.
/// - `ResourceNotFound` when no intent exists for the reference.
/// - `FatalInconsistency` when the record's subject no longer exists.
pub fn apply_gateway_payload(
    persistence: &mut Persistence,
    payload: &RawGatewayPayload,
    dialect: GatewayDialect,
    actor: Actor,
    cause: Cause,
) -> Result<PaymentApplicationResponse, ApiError> {
    let outcome: GatewayOutcome = normalize(payload, dialect);

    if let GatewayOutcome::Ambiguous { raw } = &outcome {
        warn!(
            reference = payload.reference.as_str(),
            %raw,
            "Ambiguous gateway status; holding record for manual review"
        );
        return Err(ApiError::AmbiguousUpstream {
            reference: Some(payload.reference.clone()),
        });
    }

    apply_outcome(persistence, &payload.reference, &outcome, actor, cause)
}

/// Applies a normalized outcome to its payment reference.
///
/// Split from the payload entry point so operator tooling can replay a
/// manually-reviewed outcome without re-normalizing.
///
/// # Errors
///
/// See [`apply_gateway_payload`].
pub fn apply_outcome(
    persistence: &mut Persistence,
    reference: &str,
    outcome: &GatewayOutcome,
    actor: Actor,
    cause: Cause,
) -> Result<PaymentApplicationResponse, ApiError> {
    let record: PaymentRecord = persistence
        .get_payment_record(reference)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Payment record"),
            message: format!(
                "No payment intent exists for reference '{reference}'; intents must be created before outcomes arrive"
            ),
        })?;

    if let GatewayOutcome::Success {
        amount: Some(observed),
        ..
    } = outcome
        && *observed != record.amount
    {
        // Amount drift does not gate application, but it must be visible.
        warn!(
            reference,
            expected = record.amount,
            observed,
            "Gateway-observed amount differs from the recorded intent"
        );
    }

    let decision: ReconcileDecision =
        decide_reconciliation(&record, outcome, actor, cause).map_err(translate_core_error)?;

    match decision {
        ReconcileDecision::AlreadyTerminal { status, .. } => Ok(PaymentApplicationResponse {
            reference: reference.to_string(),
            status: status.as_str().to_string(),
            applied: false,
            message: String::from("Reference already reconciled; stored result returned"),
        }),
        ReconcileDecision::Hold { .. } => Err(ApiError::AmbiguousUpstream {
            reference: Some(reference.to_string()),
        }),
        ReconcileDecision::Apply {
            new_status,
            effect,
            audit_event,
            ..
        } => {
            let won: bool = persistence
                .execute_reconciliation(reference, new_status, &effect)
                .map_err(|e| match e {
                    PersistenceError::NotFound(message) => ApiError::FatalInconsistency {
                        message: format!(
                            "Payment '{reference}' references a missing subject: {message}"
                        ),
                    },
                    other => translate_persistence_error(other),
                })?;

            if won {
                persistence
                    .persist_audit_event(&audit_event)
                    .map_err(translate_persistence_error)?;
                info!(reference, status = %new_status, "Payment applied");

                return Ok(PaymentApplicationResponse {
                    reference: reference.to_string(),
                    status: new_status.as_str().to_string(),
                    applied: true,
                    message: format!("Payment reconciled as {new_status}"),
                });
            }

            // A concurrent applier won between our read and our write;
            // report the now-stored result exactly like a replay.
            let stored: PaymentRecord = persistence
                .get_payment_record(reference)
                .map_err(translate_persistence_error)?
                .ok_or_else(|| ApiError::FatalInconsistency {
                    message: format!("Payment record '{reference}' vanished mid-application"),
                })?;

            Ok(PaymentApplicationResponse {
                reference: reference.to_string(),
                status: stored.status.as_str().to_string(),
                applied: false,
                message: String::from("Reference already reconciled; stored result returned"),
            })
        }
    }
}

/// Reads a payment record's current state without applying anything.
///
/// Backs the client-polled status endpoint.
///
/// # Errors
///
/// Returns `ResourceNotFound` when no intent exists for the reference.
pub fn get_payment_status(
    persistence: &mut Persistence,
    reference: &str,
) -> Result<PaymentApplicationResponse, ApiError> {
    let record: PaymentRecord = persistence
        .get_payment_record(reference)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Payment record"),
            message: format!("No payment intent exists for reference '{reference}'"),
        })?;

    Ok(PaymentApplicationResponse {
        reference: reference.to_string(),
        status: record.status.as_str().to_string(),
        applied: false,
        message: String::from("Current stored state; no outcome applied"),
    })
}
