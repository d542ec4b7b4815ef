// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reconciliation decisions for gateway outcomes.
//!
//! This module is the pure half of the payment reconciler: given the
//! current payment record and a normalized gateway outcome, it decides
//! what (if anything) must happen. Executing the decision — the
//! conditional status transition and the fan-out effect — belongs to
//! the persistence layer, which arbitrates concurrent appliers.
//!
//! The decision is deterministic and side-effect free, so duplicate
//! deliveries produce identical decisions; the conditional transition
//! ensures only one of them applies.

use crate::error::CoreError;
use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{GatewayOutcome, PaymentRecord, PaymentStatus, SubjectType};
use serde_json::Value;

/// The single domain mutation triggered by a winning application.
///
/// Exactly one effect is performed per successfully reconciled
/// reference; which one depends on the record's subject type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FanOutEffect {
    /// Mark a registration fee settled (or failed) and record step 8.
    SettleRegistrationFee {
        /// The registration whose fee this payment settles.
        registration_id: i64,
        /// Whether the fee settled successfully.
        success: bool,
    },
    /// Activate a slot pool (or mark its purchase failed).
    ActivateSlotPool {
        /// The pool this payment purchases.
        pool_id: i64,
        /// Whether the purchase settled successfully.
        success: bool,
    },
    /// Credit a vote purchase to its contestant (or mark it failed).
    CreditVotes {
        /// The vote record keyed by this payment's reference.
        reference: String,
        /// Whether the purchase settled successfully.
        success: bool,
    },
    /// Complete a ticket order and mint ticket numbers (or mark it failed).
    CompleteTicketOrder {
        /// The ticket order keyed by this payment's reference.
        reference: String,
        /// Whether the order settled successfully.
        success: bool,
    },
}

/// The outcome of deciding how to reconcile a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// The record is already terminal. Return the stored result; perform
    /// no side effects. This is the idempotency guarantee.
    AlreadyTerminal {
        /// The stored terminal status.
        status: PaymentStatus,
        /// When the terminal status was applied.
        processed_at: Option<String>,
    },
    /// Transition the record to a terminal status and perform the
    /// fan-out effect — both conditioned on the record still being
    /// non-terminal at write time.
    Apply {
        /// The terminal status implied by the outcome.
        new_status: PaymentStatus,
        /// The amount the gateway observed, when it reported one.
        amount_observed: Option<i64>,
        /// The single fan-out effect to perform.
        effect: FanOutEffect,
        /// The audit event to persist if this applier wins.
        audit_event: AuditEvent,
    },
    /// The outcome was ambiguous. Leave the record untouched so the
    /// gateway retries; surface the raw payload for manual review.
    Hold {
        /// The raw payload that failed to normalize.
        raw: Value,
    },
}

/// Builds the fan-out effect for a record and settlement result.
const fn fan_out_effect(record: &PaymentRecord, success: bool) -> FanOutEffect {
    match record.subject_type {
        SubjectType::Registration => FanOutEffect::SettleRegistrationFee {
            registration_id: record.subject_id,
            success,
        },
        SubjectType::Bulk => FanOutEffect::ActivateSlotPool {
            pool_id: record.subject_id,
            success,
        },
        SubjectType::Vote => FanOutEffect::CreditVotes {
            reference: String::new(),
            success,
        },
        SubjectType::Ticket => FanOutEffect::CompleteTicketOrder {
            reference: String::new(),
            success,
        },
    }
}

/// Decides how to reconcile a payment record against a gateway outcome.
///
/// The decision never mutates anything. Callers execute `Apply`
/// decisions through the persistence layer's conditional transition and
/// skip the fan-out when they lose the race.
///
/// # Arguments
///
/// * `record` - The payment record loaded by reference
/// * `outcome` - The normalized gateway outcome
/// * `actor` - The actor performing this application
/// * `cause` - The cause or reason (webhook delivery, client verify)
///
/// # Errors
///
/// Returns an error if the outcome carries a reference that does not
/// match the record — callers are expected to load the record by the
/// outcome's own reference, so a mismatch is an internal logic error.
pub fn decide_reconciliation(
    record: &PaymentRecord,
    outcome: &GatewayOutcome,
    actor: Actor,
    cause: Cause,
) -> Result<ReconcileDecision, CoreError> {
    if let Some(reference) = outcome.reference()
        && reference != record.reference
    {
        return Err(CoreError::Internal(format!(
            "outcome reference '{reference}' does not match record '{}'",
            record.reference
        )));
    }

    if record.status.is_terminal() {
        return Ok(ReconcileDecision::AlreadyTerminal {
            status: record.status,
            processed_at: record.processed_at.clone(),
        });
    }

    let (success, amount_observed): (bool, Option<i64>) = match outcome {
        GatewayOutcome::Success { amount, .. } => (true, *amount),
        GatewayOutcome::Failure { .. } => (false, None),
        GatewayOutcome::Ambiguous { raw } => {
            return Ok(ReconcileDecision::Hold { raw: raw.clone() });
        }
    };

    let new_status: PaymentStatus = if success {
        PaymentStatus::Successful
    } else {
        PaymentStatus::Failed
    };

    let mut effect: FanOutEffect = fan_out_effect(record, success);
    // Vote and ticket effects are keyed by the reference itself.
    match &mut effect {
        FanOutEffect::CreditVotes { reference, .. }
        | FanOutEffect::CompleteTicketOrder { reference, .. } => {
            reference.clone_from(&record.reference);
        }
        FanOutEffect::SettleRegistrationFee { .. } | FanOutEffect::ActivateSlotPool { .. } => {}
    }

    let before: StateSnapshot = StateSnapshot::new(format!(
        "reference={},status={},subject={}:{}",
        record.reference, record.status, record.subject_type, record.subject_id
    ));
    let after: StateSnapshot = StateSnapshot::new(format!(
        "reference={},status={new_status},subject={}:{}",
        record.reference, record.subject_type, record.subject_id
    ));
    let action: Action = Action::new(
        String::from("ApplyPayment"),
        Some(format!(
            "Applied reference {} as {new_status} (subject {}:{})",
            record.reference, record.subject_type, record.subject_id
        )),
    );

    Ok(ReconcileDecision::Apply {
        new_status,
        amount_observed,
        effect,
        audit_event: AuditEvent::new(actor, cause, action, before, after),
    })
}
