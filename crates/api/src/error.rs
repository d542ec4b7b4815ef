// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! The taxonomy here is the contract the HTTP layer maps onto status
//! codes. Reconciliation failures are caught at this boundary; an
//! ambiguous or failed application never acks as success, which is
//! what makes the upstream gateway retry delivery.

use ovation::CoreError;
use ovation_domain::DomainError;
use ovation_persistence::PersistenceError;

use crate::credential_policy::CredentialPolicyError;

/// The single user-facing message for every invalid-code outcome.
///
/// Not found, expired, and already used all collapse to this message
/// so callers cannot enumerate which codes exist.
pub const GENERIC_CODE_MESSAGE: &str = "The provided code is invalid or has expired";

/// The single response for every forgot-credential request, whether or
/// not the email exists.
pub const GENERIC_RESET_MESSAGE: &str =
    "If an account exists for that email, a reset code has been sent";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided. Recoverable by retrying with
    /// corrected input.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A terminal-state rule was violated: editing a submitted
    /// workflow, exceeding slot capacity, reusing a reference. Not
    /// retryable without different input.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The gateway sent a status this deployment does not recognize.
    /// The payment record is left pending for manual reconciliation;
    /// the delivery is never acked as success.
    AmbiguousUpstream {
        /// The payment reference, when the payload carried one.
        reference: Option<String>,
    },
    /// A payment record references a subject that no longer exists.
    /// Surfaced to an operator; never auto-healed.
    FatalInconsistency {
        /// A description of the inconsistency.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::AmbiguousUpstream { reference } => match reference {
                Some(reference) => write!(
                    f,
                    "Unrecognized gateway status for reference '{reference}'; held for manual review"
                ),
                None => write!(f, "Unrecognized gateway status; held for manual review"),
            },
            Self::FatalInconsistency { message } => {
                write!(f, "Fatal inconsistency: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CredentialPolicyError> for ApiError {
    fn from(err: CredentialPolicyError) -> Self {
        Self::InvalidInput {
            field: String::from("credential"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmail(msg) => ApiError::InvalidInput {
            field: String::from("email"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("name"),
            message: msg,
        },
        DomainError::InvalidCodeFormat(msg) => ApiError::InvalidInput {
            field: String::from("code"),
            message: msg,
        },
        DomainError::InvalidCodePurpose(msg) => ApiError::InvalidInput {
            field: String::from("purpose"),
            message: format!("Unknown code purpose: {msg}"),
        },
        DomainError::InvalidRegistrationKind(msg) => ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("Unknown registration kind: {msg}"),
        },
        DomainError::InvalidRegistrationStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown registration status: {msg}"),
        },
        DomainError::InvalidFeeStatus(msg) => ApiError::Internal {
            message: format!("Unknown fee status: {msg}"),
        },
        DomainError::InvalidPaymentStatus(msg) => ApiError::Internal {
            message: format!("Unknown payment status: {msg}"),
        },
        DomainError::InvalidSubjectType(msg) => ApiError::Internal {
            message: format!("Unknown payment subject type: {msg}"),
        },
        DomainError::InvalidPoolStatus(msg) => ApiError::Internal {
            message: format!("Unknown slot pool status: {msg}"),
        },
        DomainError::InvalidInvitationStatus(msg) => ApiError::Internal {
            message: format!("Unknown invitation status: {msg}"),
        },
        DomainError::InvalidTicketStatus(msg) => ApiError::Internal {
            message: format!("Unknown ticket status: {msg}"),
        },
        DomainError::InvalidRole(msg) => ApiError::InvalidInput {
            field: String::from("role"),
            message: format!("Unknown role: {msg}"),
        },
        DomainError::InvalidStep { step } => ApiError::InvalidInput {
            field: String::from("step"),
            message: format!("Invalid step number: {step}. Must be between 1 and 8"),
        },
        DomainError::StepValidationError { step, field } => ApiError::InvalidInput {
            field: field.clone(),
            message: format!("Step {step} is missing required field '{field}'"),
        },
        DomainError::WorkflowTerminal { registration_id } => ApiError::Conflict {
            rule: String::from("workflow_terminal"),
            message: format!(
                "Registration {registration_id} has been submitted and cannot be edited"
            ),
        },
        DomainError::WorkflowIncomplete {
            missing_steps,
            payment_missing,
        } => ApiError::Conflict {
            rule: String::from("workflow_incomplete"),
            message: DomainError::WorkflowIncomplete {
                missing_steps,
                payment_missing,
            }
            .to_string(),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::Conflict {
            rule: String::from("status_transition"),
            message: format!("Cannot transition from '{from}' to '{to}': {reason}"),
        },
        DomainError::InvalidSlotCount { count } => ApiError::InvalidInput {
            field: String::from("total_slots"),
            message: format!("Invalid slot count: {count}. Must be between 2 and 50"),
        },
        DomainError::PoolNotActive { status } => ApiError::Conflict {
            rule: String::from("pool_not_active"),
            message: format!(
                "Participants may only be added to an active pool (current status: {status})"
            ),
        },
        DomainError::PoolExhausted { total_slots } => ApiError::Conflict {
            rule: String::from("pool_exhausted"),
            message: format!("All {total_slots} purchased slots have been used"),
        },
        DomainError::InvalidVotePurchase(msg) => ApiError::InvalidInput {
            field: String::from("votes"),
            message: msg,
        },
        DomainError::InvalidTicketQuantity { quantity } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("Invalid ticket quantity: {quantity}. Must be at least 1"),
        },
        DomainError::InvalidAmount(msg) => ApiError::InvalidInput {
            field: String::from("amount"),
            message: msg,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// `SlotClaimRejected` is deliberately absent: the pool handlers map it
/// themselves because the same rejection means different things
/// (not active vs. exhausted) depending on the pool's state.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message: msg,
        },
        PersistenceError::DuplicateKey(msg) => ApiError::Conflict {
            rule: String::from("unique_key"),
            message: msg,
        },
        other => ApiError::Internal {
            message: format!("Persistence error: {other}"),
        },
    }
}
