// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// A name field is empty or invalid.
    InvalidName(String),
    /// Verification code does not match the required format.
    InvalidCodeFormat(String),
    /// Code purpose string is not recognized.
    InvalidCodePurpose(String),
    /// Registration kind string is not recognized.
    InvalidRegistrationKind(String),
    /// Registration status string is not recognized.
    InvalidRegistrationStatus(String),
    /// Fee status string is not recognized.
    InvalidFeeStatus(String),
    /// Payment status string is not recognized.
    InvalidPaymentStatus(String),
    /// Payment subject type string is not recognized.
    InvalidSubjectType(String),
    /// Slot pool status string is not recognized.
    InvalidPoolStatus(String),
    /// Invitation status string is not recognized.
    InvalidInvitationStatus(String),
    /// Ticket order status string is not recognized.
    InvalidTicketStatus(String),
    /// Identity role string is not recognized.
    InvalidRole(String),
    /// Step number is outside the workflow range.
    InvalidStep {
        /// The rejected step number.
        step: u8,
    },
    /// A step payload is missing a conditionally required field.
    StepValidationError {
        /// The step being updated.
        step: u8,
        /// The missing conditional field.
        field: String,
    },
    /// The workflow has been submitted and no longer accepts step edits.
    WorkflowTerminal {
        /// The registration identifier.
        registration_id: i64,
    },
    /// The workflow cannot be submitted because requirements are unmet.
    WorkflowIncomplete {
        /// Required steps not yet completed.
        missing_steps: Vec<u8>,
        /// Whether the registration fee is still outstanding.
        payment_missing: bool,
    },
    /// A status transition is not permitted by the lifecycle rules.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// Slot count is outside the purchasable range.
    InvalidSlotCount {
        /// The rejected slot count.
        count: u32,
    },
    /// Participants may not be added to a pool in this status.
    PoolNotActive {
        /// The pool's current status.
        status: String,
    },
    /// Every purchased slot has been consumed.
    PoolExhausted {
        /// The pool capacity.
        total_slots: u32,
    },
    /// A vote purchase request is malformed.
    InvalidVotePurchase(String),
    /// A ticket order quantity is out of range.
    InvalidTicketQuantity {
        /// The rejected quantity.
        quantity: u32,
    },
    /// A monetary amount could not be interpreted.
    InvalidAmount(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidCodeFormat(msg) => write!(f, "Invalid verification code: {msg}"),
            Self::InvalidCodePurpose(s) => write!(f, "Unknown code purpose: {s}"),
            Self::InvalidRegistrationKind(s) => write!(f, "Unknown registration kind: {s}"),
            Self::InvalidRegistrationStatus(s) => write!(f, "Unknown registration status: {s}"),
            Self::InvalidFeeStatus(s) => write!(f, "Unknown fee status: {s}"),
            Self::InvalidPaymentStatus(s) => write!(f, "Unknown payment status: {s}"),
            Self::InvalidSubjectType(s) => write!(f, "Unknown payment subject type: {s}"),
            Self::InvalidPoolStatus(s) => write!(f, "Unknown slot pool status: {s}"),
            Self::InvalidInvitationStatus(s) => write!(f, "Unknown invitation status: {s}"),
            Self::InvalidTicketStatus(s) => write!(f, "Unknown ticket status: {s}"),
            Self::InvalidRole(s) => write!(f, "Unknown role: {s}"),
            Self::InvalidStep { step } => {
                write!(f, "Invalid step number: {step}. Must be between 1 and 8")
            }
            Self::StepValidationError { step, field } => {
                write!(f, "Step {step} is missing required field '{field}'")
            }
            Self::WorkflowTerminal { registration_id } => {
                write!(
                    f,
                    "Registration {registration_id} has been submitted and cannot be edited"
                )
            }
            Self::WorkflowIncomplete {
                missing_steps,
                payment_missing,
            } => {
                write!(f, "Registration cannot be submitted:")?;
                if !missing_steps.is_empty() {
                    let steps: Vec<String> =
                        missing_steps.iter().map(ToString::to_string).collect();
                    write!(f, " missing steps [{}]", steps.join(", "))?;
                }
                if *payment_missing {
                    write!(f, " registration fee not completed")?;
                }
                Ok(())
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidSlotCount { count } => {
                write!(f, "Invalid slot count: {count}. Must be between 2 and 50")
            }
            Self::PoolNotActive { status } => {
                write!(
                    f,
                    "Participants may only be added to an active pool (current status: {status})"
                )
            }
            Self::PoolExhausted { total_slots } => {
                write!(f, "All {total_slots} purchased slots have been used")
            }
            Self::InvalidVotePurchase(msg) => write!(f, "Invalid vote purchase: {msg}"),
            Self::InvalidTicketQuantity { quantity } => {
                write!(f, "Invalid ticket quantity: {quantity}. Must be at least 1")
            }
            Self::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
