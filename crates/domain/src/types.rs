// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The purpose a one-time verification code was issued for.
///
/// Codes are bound to an (email, purpose) pair; a code issued for one
/// purpose can never be consumed for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePurpose {
    /// Proving ownership of an email address during onboarding.
    EmailVerification,
    /// Resetting a previously set credential.
    PasswordReset,
}

impl CodePurpose {
    /// Returns the string representation of this purpose.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl FromStr for CodePurpose {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(Self::EmailVerification),
            "password_reset" => Ok(Self::PasswordReset),
            _ => Err(DomainError::InvalidCodePurpose(s.to_string())),
        }
    }
}

impl std::fmt::Display for CodePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Roles an identity may hold.
///
/// Roles classify identities; they do not gate the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A competing participant.
    Contestant,
    /// A sponsor purchasing bulk slots for participants.
    Sponsor,
    /// A platform administrator.
    Admin,
}

impl Role {
    /// Returns the string representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contestant => "contestant",
            Self::Sponsor => "sponsor",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contestant" => Ok(Self::Contestant),
            "sponsor" => Ok(Self::Sponsor),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

/// The shape of a registration workflow.
///
/// The required step set differs by kind; bulk registrations are created
/// from a slot pool invitation and reuse the individual step set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationKind {
    /// A single contestant registering for themselves.
    Individual,
    /// A named group registering together.
    Group,
    /// A contestant registering against a sponsor's slot pool.
    Bulk,
}

impl RegistrationKind {
    /// Returns the string representation of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Group => "group",
            Self::Bulk => "bulk",
        }
    }
}

impl FromStr for RegistrationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "group" => Ok(Self::Group),
            "bulk" => Ok(Self::Bulk),
            _ => Err(DomainError::InvalidRegistrationKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for RegistrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a registration workflow.
///
/// `Draft` is the only state that accepts step edits. `Submitted` and
/// everything after it is review territory; the transition into
/// `Submitted` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Initial state. Step edits allowed.
    #[default]
    Draft,
    /// All required steps complete and fee settled. Step edits rejected.
    Submitted,
    /// An administrator is reviewing the submission.
    UnderReview,
    /// The submission was approved.
    Approved,
    /// The submission was rejected.
    Rejected,
    /// The contestant qualified for the competition.
    Qualified,
    /// The contestant was disqualified.
    Disqualified,
}

impl RegistrationStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Qualified => "qualified",
            Self::Disqualified => "disqualified",
        }
    }

    /// Returns whether step edits are locked in this state.
    ///
    /// Only `Draft` registrations accept step updates.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        !matches!(self, Self::Draft)
    }

    /// Checks if a review transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Draft → Submitted
    /// - Submitted → `UnderReview`
    /// - `UnderReview` → Approved | Rejected
    /// - Approved → Qualified | Disqualified
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Submitted)
                | (Self::Submitted, Self::UnderReview)
                | (Self::UnderReview, Self::Approved | Self::Rejected)
                | (Self::Approved, Self::Qualified | Self::Disqualified)
        )
    }
}

impl FromStr for RegistrationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            "under_review" => Ok(Self::UnderReview),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "qualified" => Ok(Self::Qualified),
            "disqualified" => Ok(Self::Disqualified),
            _ => Err(DomainError::InvalidRegistrationStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement state of the registration fee attached to a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    /// No payment has been initiated.
    #[default]
    Pending,
    /// A payment intent exists and the payer was redirected to the gateway.
    Processing,
    /// The fee settled successfully.
    Completed,
    /// The gateway reported a failed payment.
    Failed,
    /// The fee was refunded after settlement.
    Refunded,
}

impl FeeStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl FromStr for FeeStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidFeeStatus(s.to_string())),
        }
    }
}

/// Lifecycle states of a payment record.
///
/// A record moves exactly once from a non-terminal to a terminal status;
/// the reconciler's conditional transition enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Intent created; payer not yet redirected.
    Initiated,
    /// Awaiting a gateway outcome.
    Pending,
    /// The gateway confirmed the payment.
    Successful,
    /// The gateway reported a failure.
    Failed,
    /// The payer abandoned the payment at the gateway.
    Cancelled,
    /// Settled funds were returned.
    Refunded,
}

impl PaymentStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::Pending => "pending",
            Self::Successful => "successful",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
        }
    }

    /// Returns whether this status is terminal.
    ///
    /// Replays against a terminal record return the stored result without
    /// re-applying side effects.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed | Self::Refunded)
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initiated" => Ok(Self::Initiated),
            "pending" => Ok(Self::Pending),
            "successful" => Ok(Self::Successful),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            "refunded" => Ok(Self::Refunded),
            _ => Err(DomainError::InvalidPaymentStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a payment settles when it completes.
///
/// The subject type selects the fan-out effect the reconciler performs
/// for the winning application of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// A registration fee.
    Registration,
    /// A bulk slot pool purchase.
    Bulk,
    /// A paid-vote purchase.
    Vote,
    /// An event ticket order.
    Ticket,
}

impl SubjectType {
    /// Returns the string representation of this subject type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Bulk => "bulk",
            Self::Vote => "vote",
            Self::Ticket => "ticket",
        }
    }
}

impl FromStr for SubjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registration" => Ok(Self::Registration),
            "bulk" => Ok(Self::Bulk),
            "vote" => Ok(Self::Vote),
            "ticket" => Ok(Self::Ticket),
            _ => Err(DomainError::InvalidSubjectType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle states of a slot pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PoolStatus {
    /// Created, payment intent not yet issued.
    #[default]
    Draft,
    /// Payment intent issued; awaiting the gateway outcome.
    PaymentPending,
    /// Payment settled; participants may be added.
    Active,
    /// Every purchased slot has been consumed.
    Completed,
    /// The pool lapsed without being fully consumed.
    Expired,
}

impl PoolStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PaymentPending => "payment_pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    /// Returns whether participants may currently be added.
    #[must_use]
    pub const fn accepts_participants(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns whether a successful payment may still activate this pool.
    ///
    /// Replayed activations against an `Active` pool are no-ops.
    #[must_use]
    pub const fn is_activatable(&self) -> bool {
        matches!(self, Self::Draft | Self::PaymentPending)
    }
}

impl FromStr for PoolStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "payment_pending" => Ok(Self::PaymentPending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidPoolStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Invitation progress of a slot pool participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Added to the pool; invitation not yet dispatched.
    #[default]
    Pending,
    /// Invitation email dispatched.
    Sent,
    /// The participant created an identity from the invitation.
    Registered,
    /// The participant completed their registration workflow.
    Completed,
}

impl InvitationStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Registered => "registered",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for InvitationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "registered" => Ok(Self::Registered),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidInvitationStatus(s.to_string())),
        }
    }
}

/// Lifecycle states of a ticket order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Intent created; awaiting payment.
    #[default]
    Pending,
    /// Payment settled; ticket numbers minted.
    Completed,
    /// Payment failed; no tickets issued.
    Failed,
}

impl TicketStatus {
    /// Returns the string representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}

/// A normalized, lowercased email address.
///
/// Emails are the sole natural key for identities and the binding key
/// for verification codes, so case differences must never split them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email {
    value: String,
}

impl Email {
    /// Creates a new `Email`, normalized to lowercase and trimmed.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_lowercase(),
        }
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A durable user record.
///
/// `identity_id` is the canonical internal identifier; the email address
/// is unique and is what verification codes bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Canonical internal identifier. `None` before first persistence.
    pub identity_id: Option<i64>,
    /// The identity's first name.
    pub first_name: String,
    /// The identity's last name.
    pub last_name: String,
    /// Unique, normalized email address.
    pub email: Email,
    /// Whether ownership of the email has been proven via a code.
    pub email_verified: bool,
    /// Whether a credential has been set.
    pub credential_set: bool,
    /// The identity's role.
    pub role: Role,
    /// Whether the identity is active.
    pub active: bool,
}

impl Identity {
    /// Creates a new unverified `Identity` without a persisted ID.
    #[must_use]
    pub fn new(first_name: String, last_name: String, email: Email, role: Role) -> Self {
        Self {
            identity_id: None,
            first_name,
            last_name,
            email,
            email_verified: false,
            credential_set: false,
            role,
            active: true,
        }
    }
}

/// A payment intent and its reconciliation state.
///
/// `reference` is unique and is the idempotency key for the whole
/// reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    /// The unique payment reference.
    pub reference: String,
    /// The expected amount in minor currency units.
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
    /// The record's reconciliation status.
    pub status: PaymentStatus,
    /// What this payment settles.
    pub subject_type: SubjectType,
    /// The identifier of the subject aggregate.
    pub subject_id: i64,
    /// When a terminal status was applied (ISO 8601).
    pub processed_at: Option<String>,
}

/// A single paid-vote purchase for a contestant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    /// Canonical internal identifier. `None` before first persistence.
    pub vote_id: Option<i64>,
    /// The contestant the votes are for.
    pub contestant_id: i64,
    /// Number of votes purchased.
    pub number_of_votes: i64,
    /// Amount paid in minor currency units.
    pub amount_paid: i64,
    /// The unique payment reference backing this purchase.
    pub payment_reference: String,
    /// Settlement state mirroring the payment record.
    pub payment_status: FeeStatus,
}

/// A contestant with its denormalized vote projection.
///
/// `total_votes` and `total_vote_amount` must always equal the sums over
/// this contestant's completed vote records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contestant {
    /// Canonical internal identifier.
    pub contestant_id: i64,
    /// Public display name.
    pub stage_name: String,
    /// Running total of completed votes.
    pub total_votes: i64,
    /// Running total of completed vote payments, minor units.
    pub total_vote_amount: i64,
}

/// A named participant consuming one slot of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolParticipant {
    /// Canonical internal identifier. `None` before first persistence.
    pub participant_id: Option<i64>,
    /// The participant's email address.
    pub email: Email,
    /// The participant's first name.
    pub first_name: String,
    /// The participant's last name.
    pub last_name: String,
    /// The identity created from the invitation, once registered.
    pub participant_identity_id: Option<i64>,
    /// The registration created from the invitation, once started.
    pub registration_id: Option<i64>,
    /// Invitation progress.
    pub invitation_status: InvitationStatus,
}

impl PoolParticipant {
    /// Creates a new participant pending invitation.
    #[must_use]
    pub const fn new(email: Email, first_name: String, last_name: String) -> Self {
        Self {
            participant_id: None,
            email,
            first_name,
            last_name,
            participant_identity_id: None,
            registration_id: None,
            invitation_status: InvitationStatus::Pending,
        }
    }
}

/// A prepaid pool of registration slots owned by a sponsor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPool {
    /// Canonical internal identifier.
    pub pool_id: i64,
    /// The sponsor identity that purchased the pool.
    pub owner_identity_id: i64,
    /// Purchased capacity.
    pub total_slots: u32,
    /// Slots consumed so far. Always equals the participant count.
    pub used_slots: u32,
    /// Price per slot in minor units, frozen at creation time.
    pub price_per_slot: i64,
    /// The pool's lifecycle status.
    pub status: PoolStatus,
    /// Settlement state of the purchase.
    pub payment_status: FeeStatus,
    /// The payment reference backing the purchase, once issued.
    pub payment_reference: Option<String>,
    /// The named participants consuming slots.
    pub participants: Vec<PoolParticipant>,
}

impl SlotPool {
    /// Returns the total purchase amount in minor units.
    #[must_use]
    pub const fn total_amount(&self) -> i64 {
        self.price_per_slot * self.total_slots as i64
    }

    /// Returns the number of unconsumed slots.
    #[must_use]
    pub const fn remaining_slots(&self) -> u32 {
        self.total_slots - self.used_slots
    }
}

/// An event ticket order settled by a payment reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketOrder {
    /// Canonical internal identifier. `None` before first persistence.
    pub order_id: Option<i64>,
    /// The purchaser's email address.
    pub email: Email,
    /// Number of tickets ordered.
    pub quantity: u32,
    /// Total amount in minor units.
    pub amount: i64,
    /// The unique payment reference backing this order.
    pub payment_reference: String,
    /// The order's lifecycle status.
    pub status: TicketStatus,
    /// Ticket numbers minted when the order completed.
    pub ticket_numbers: Vec<String>,
}
