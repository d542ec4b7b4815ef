// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request to start a registration, creating an identity and a draft
/// workflow and issuing an email verification code.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartRegistrationRequest {
    /// The registrant's email address.
    pub email: String,
    /// The registrant's first name.
    pub first_name: String,
    /// The registrant's last name.
    pub last_name: String,
    /// The workflow shape ("individual", "group", "bulk").
    pub kind: String,
    /// The slot pool invitation this registration consumes, for bulk kinds.
    #[serde(default)]
    pub bulk_registration_id: Option<i64>,
}

/// Response to a started registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StartRegistrationResponse {
    /// The created identity's canonical ID.
    pub identity_id: i64,
    /// The created registration's canonical ID.
    pub registration_id: i64,
    /// A success message.
    pub message: String,
}

/// Request to verify an email with a one-time code.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyEmailRequest {
    /// The email being verified.
    pub email: String,
    /// The one-time code.
    pub code: String,
}

/// Request to set the account credential after email verification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SetCredentialRequest {
    /// The account email.
    pub email: String,
    /// The one-time code proving ownership.
    pub code: String,
    /// The new credential.
    pub credential: String,
    /// The credential confirmation.
    pub confirmation: String,
}

/// Request to start a credential reset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForgotCredentialRequest {
    /// The account email. The response is identical whether or not an
    /// account exists.
    pub email: String,
}

/// Request to complete a credential reset.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetCredentialRequest {
    /// The account email.
    pub email: String,
    /// The reset code.
    pub code: String,
    /// The new credential.
    pub credential: String,
    /// The credential confirmation.
    pub confirmation: String,
}

/// A generic message response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageResponse {
    /// A human-readable message.
    pub message: String,
}

/// Request to merge a payload into one wizard step.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStepRequest {
    /// The step being updated (1..=8).
    pub step: u8,
    /// The partial payload to merge into the step's slot.
    pub payload: Value,
    /// Where the wizard should point next; derived when absent.
    #[serde(default)]
    pub next_step: Option<u8>,
}

/// Response to a step update.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateStepResponse {
    /// The registration's canonical ID.
    pub registration_id: i64,
    /// The wizard's new position.
    pub current_step: u8,
    /// Steps marked complete so far.
    pub completed_steps: Vec<u8>,
}

/// Response to a submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitRegistrationResponse {
    /// The registration's canonical ID.
    pub registration_id: i64,
    /// The registration's new status.
    pub status: String,
    /// When the registration was submitted (ISO 8601).
    pub submitted_at: String,
}

/// Request to initiate the registration fee payment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InitiateFeeRequest {
    /// The caller-supplied unique payment reference.
    pub reference: String,
}

/// Response to an initiated payment intent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntentResponse {
    /// The unique payment reference.
    pub reference: String,
    /// The amount due in minor currency units.
    pub amount: i64,
    /// The currency code.
    pub currency: String,
}

/// Request to create a slot pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePoolRequest {
    /// The sponsor identity purchasing the pool.
    pub owner_identity_id: i64,
    /// Purchased capacity (2..=50).
    pub total_slots: u32,
    /// The caller-supplied unique payment reference for the purchase.
    pub reference: String,
}

/// Response to a created slot pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreatePoolResponse {
    /// The pool's canonical ID.
    pub pool_id: i64,
    /// Purchased capacity.
    pub total_slots: u32,
    /// The total purchase amount in minor units.
    pub total_amount: i64,
    /// The payment reference to settle at the gateway.
    pub reference: String,
    /// The pool's status.
    pub status: String,
}

/// Request to add a participant to a pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddParticipantRequest {
    /// The participant's email address.
    pub email: String,
    /// The participant's first name.
    pub first_name: String,
    /// The participant's last name.
    pub last_name: String,
}

/// Response to an added participant.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AddParticipantResponse {
    /// The participant's canonical ID.
    pub participant_id: i64,
    /// Slots consumed after this add.
    pub used_slots: u32,
    /// Slots still unconsumed.
    pub remaining_slots: u32,
    /// The pool's status after this add.
    pub pool_status: String,
}

/// Request to record a vote purchase intent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoteIntentRequest {
    /// The contestant the votes are for.
    pub contestant_id: i64,
    /// Number of votes purchased.
    pub number_of_votes: i64,
    /// Amount to be paid in minor units.
    pub amount_paid: i64,
    /// The caller-supplied unique payment reference.
    pub reference: String,
}

/// Request to order event tickets.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketOrderRequest {
    /// The purchaser's email address.
    pub email: String,
    /// Number of tickets ordered.
    pub quantity: u32,
    /// The caller-supplied unique payment reference.
    pub reference: String,
}

/// The result of applying a gateway outcome to a reference.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentApplicationResponse {
    /// The unique payment reference.
    pub reference: String,
    /// The record's status after this call.
    pub status: String,
    /// Whether this call performed the fan-out effect. Replays and
    /// lost races report `false` with the stored status.
    pub applied: bool,
    /// A human-readable message.
    pub message: String,
}

/// One vote record in a tally listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VoteRecordInfo {
    /// Number of votes purchased.
    pub number_of_votes: i64,
    /// Amount paid in minor units.
    pub amount_paid: i64,
    /// The unique payment reference.
    pub payment_reference: String,
    /// Settlement state.
    pub payment_status: String,
}

/// A contestant's tally with its audit-visible ledger.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContestantVotesResponse {
    /// The contestant's canonical ID.
    pub contestant_id: i64,
    /// Public display name.
    pub stage_name: String,
    /// Completed votes only.
    pub total_votes: i64,
    /// Completed vote payments only, minor units.
    pub total_vote_amount: i64,
    /// Every vote record, including pending and failed ones.
    pub records: Vec<VoteRecordInfo>,
}

/// Response describing a ticket order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketOrderResponse {
    /// The order's canonical ID.
    pub order_id: i64,
    /// The unique payment reference.
    pub reference: String,
    /// The total amount due in minor units.
    pub amount: i64,
    /// The order's status.
    pub status: String,
    /// Minted ticket numbers, empty until the order completes.
    pub ticket_numbers: Vec<String>,
}
