// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs and serializable audit representations.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Serializable representation of an audit Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of an audit Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an audit Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Row mapping for the `identities` table.
#[derive(Debug, Clone, Queryable)]
pub struct IdentityRow {
    pub identity_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub credential_hash: Option<String>,
    pub email_verified: i32,
    pub credential_set: i32,
    pub role: String,
    pub active: i32,
    pub created_at: String,
}

/// Row mapping for the `verification_codes` table.
#[derive(Debug, Clone, Queryable)]
pub struct VerificationCodeRow {
    pub code_id: i64,
    pub email: String,
    pub code: String,
    pub purpose: String,
    pub expires_at: String,
    pub used: i32,
    pub created_at: String,
}

/// Row mapping for the `bulk_registrations` table.
#[derive(Debug, Clone, Queryable)]
pub struct BulkRegistrationRow {
    pub bulk_id: i64,
    pub owner_identity_id: i64,
    pub total_slots: i32,
    pub used_slots: i32,
    pub price_per_slot: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub created_at: String,
}

/// Row mapping for the `bulk_participants` table.
#[derive(Debug, Clone, Queryable)]
pub struct BulkParticipantRow {
    pub participant_id: i64,
    pub bulk_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub participant_identity_id: Option<i64>,
    pub registration_id: Option<i64>,
    pub invitation_status: String,
    pub created_at: String,
}

/// Row mapping for the `registrations` table.
#[derive(Debug, Clone, Queryable)]
pub struct RegistrationRow {
    pub registration_id: i64,
    pub owner_identity_id: i64,
    pub kind: String,
    pub current_step: i32,
    pub completed_steps: String,
    pub personal_json: Option<String>,
    pub talent_json: Option<String>,
    pub group_json: Option<String>,
    pub guardian_json: Option<String>,
    pub media_json: Option<String>,
    pub audition_json: Option<String>,
    pub terms_json: Option<String>,
    pub status: String,
    pub fee_amount: i64,
    pub fee_status: String,
    pub fee_reference: Option<String>,
    pub bulk_registration_id: Option<i64>,
    pub submitted_at: Option<String>,
    pub created_at: String,
}

/// Row mapping for the `payment_records` table.
#[derive(Debug, Clone, Queryable)]
pub struct PaymentRecordRow {
    pub payment_id: i64,
    pub reference: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub subject_type: String,
    pub subject_id: i64,
    pub processed_at: Option<String>,
    pub created_at: String,
}

/// Row mapping for the `contestants` table.
#[derive(Debug, Clone, Queryable)]
pub struct ContestantRow {
    pub contestant_id: i64,
    pub stage_name: String,
    pub total_votes: i64,
    pub total_vote_amount: i64,
    pub created_at: String,
}

/// Row mapping for the `vote_records` table.
#[derive(Debug, Clone, Queryable)]
pub struct VoteRecordRow {
    pub vote_id: i64,
    pub contestant_id: i64,
    pub number_of_votes: i64,
    pub amount_paid: i64,
    pub payment_reference: String,
    pub payment_status: String,
    pub created_at: String,
}

/// Row mapping for the `ticket_orders` table.
#[derive(Debug, Clone, Queryable)]
pub struct TicketOrderRow {
    pub order_id: i64,
    pub email: String,
    pub quantity: i32,
    pub amount: i64,
    pub payment_reference: String,
    pub status: String,
    pub ticket_numbers: String,
    pub created_at: String,
}

/// Row mapping for the `audit_events` table.
#[derive(Debug, Clone, Queryable)]
pub struct AuditEventRow {
    pub event_id: i64,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub created_at: String,
}
