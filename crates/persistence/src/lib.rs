// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Ovation talent platform.
//!
//! This crate provides `SQLite` persistence, via Diesel, for every
//! durable entity: identities, verification codes, registrations, slot
//! pools, payment records, the vote ledger, ticket orders, and the
//! audit trail.
//!
//! ## Concurrency model
//!
//! Request handlers are stateless; all cross-request coordination is
//! pushed into conditional updates here:
//!
//! - verification codes flip `used` conditioned on `used = 0`
//! - payment records transition conditioned on being non-terminal
//! - slot claims increment conditioned on `used_slots < total_slots`
//!
//! The winner of each conditional write is the only caller that
//! performs the associated side effects.
//!
//! ## Testing
//!
//! Standard tests run against unique in-memory `SQLite` databases; the
//! atomic counter below guarantees isolation without time-based names.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ovation::FanOutEffect;
use ovation_audit::AuditEvent;
use ovation_domain::{
    CodePurpose, Contestant, Email, Identity, InvitationStatus, PaymentRecord, PaymentStatus,
    Registration, RegistrationKind, RegistrationStatus, Role, SlotPool, SubjectType, TicketOrder,
    VoteRecord,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the current UTC time as an ISO 8601 string.
///
/// All persisted timestamps share this format so lexicographic
/// comparison (code expiry, audit ordering) is chronologically correct.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn now_iso8601() -> Result<String, PersistenceError> {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Persistence adapter for every durable aggregate.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Identities
    // ========================================================================

    /// Creates a new unverified identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already in use or the insert fails.
    pub fn create_identity(
        &mut self,
        email: &Email,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::identities::create_identity(
            &mut self.conn,
            email,
            first_name,
            last_name,
            role,
            &created_at,
        )
    }

    /// Deletes a stale unverified identity so re-registration can
    /// supersede it. Verified identities are never removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn supersede_unverified_identity(
        &mut self,
        email: &Email,
    ) -> Result<bool, PersistenceError> {
        mutations::identities::supersede_unverified_identity(&mut self.conn, email)
    }

    /// Retrieves an identity by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_identity_by_email(
        &mut self,
        email: &Email,
    ) -> Result<Option<Identity>, PersistenceError> {
        queries::identities::get_identity_by_email(&mut self.conn, email)
    }

    /// Retrieves an identity by its canonical ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_identity_by_id(
        &mut self,
        identity_id: i64,
    ) -> Result<Option<Identity>, PersistenceError> {
        queries::identities::get_identity_by_id(&mut self.conn, identity_id)
    }

    /// Marks an identity's email as verified.
    ///
    /// # Errors
    ///
    /// Returns an error if no identity has this email.
    pub fn mark_email_verified(&mut self, email: &Email) -> Result<(), PersistenceError> {
        mutations::identities::mark_email_verified(&mut self.conn, email)
    }

    /// Stores a credential hash (bcrypt) and marks the credential set.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails or no identity has this email.
    pub fn set_credential(
        &mut self,
        email: &Email,
        credential: &str,
    ) -> Result<(), PersistenceError> {
        mutations::identities::set_credential(&mut self.conn, email, credential)
    }

    /// Verifies a credential against an identity's stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query or hash verification fails.
    pub fn verify_credential(
        &mut self,
        email: &Email,
        credential: &str,
    ) -> Result<bool, PersistenceError> {
        queries::identities::verify_credential(&mut self.conn, email, credential)
    }

    // ========================================================================
    // Verification codes
    // ========================================================================

    /// Stores a newly issued verification code.
    ///
    /// Prior unused codes for the same (email, purpose) are left intact.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn insert_code(
        &mut self,
        email: &Email,
        code: &str,
        purpose: CodePurpose,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::codes::insert_code(
            &mut self.conn,
            email,
            code,
            purpose,
            expires_at,
            &created_at,
        )
    }

    /// Consumes the most recent valid code matching (email, code, purpose).
    ///
    /// The flip is conditioned on `used = 0`; only one concurrent
    /// consumer wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn consume_code(
        &mut self,
        email: &Email,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<bool, PersistenceError> {
        let now: String = now_iso8601()?;
        mutations::codes::consume_code(&mut self.conn, email, code, purpose, &now)
    }

    /// Checks code validity without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn peek_code(
        &mut self,
        email: &Email,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<bool, PersistenceError> {
        let now: String = now_iso8601()?;
        Ok(queries::codes::find_valid_code(&mut self.conn, email, code, purpose, &now)?.is_some())
    }

    /// Deletes expired codes (storage hygiene only).
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_codes(&mut self) -> Result<usize, PersistenceError> {
        let now: String = now_iso8601()?;
        mutations::codes::delete_expired_codes(&mut self.conn, &now)
    }

    // ========================================================================
    // Registrations
    // ========================================================================

    /// Creates a draft registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_registration(
        &mut self,
        owner_identity_id: i64,
        kind: RegistrationKind,
        fee_amount: i64,
        bulk_registration_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::registrations::create_registration(
            &mut self.conn,
            owner_identity_id,
            kind,
            fee_amount,
            bulk_registration_id,
            &created_at,
        )
    }

    /// Retrieves a registration by its canonical ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_registration(
        &mut self,
        registration_id: i64,
    ) -> Result<Option<Registration>, PersistenceError> {
        queries::registrations::get_registration(&mut self.conn, registration_id)
    }

    /// Persists one step update from an applied workflow transition.
    ///
    /// Writes only the updated step's payload column plus the completed
    /// set and wizard position; edits to other steps interleave safely.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the database update fails.
    pub fn persist_step_update(
        &mut self,
        registration: &Registration,
        step: u8,
    ) -> Result<(), PersistenceError> {
        let payload_json: String = registration
            .payloads
            .slot(step)
            .map(serde_json::to_string)
            .transpose()?
            .unwrap_or_else(|| String::from("null"));
        let completed_steps_json: String = serde_json::to_string(&registration.completed_steps)?;

        mutations::registrations::update_step_columns(
            &mut self.conn,
            registration.registration_id,
            step,
            &payload_json,
            &completed_steps_json,
            registration.current_step,
        )
    }

    /// Flips a draft registration to submitted, conditioned on it still
    /// being draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn mark_submitted(
        &mut self,
        registration_id: i64,
        submitted_at: &str,
    ) -> Result<bool, PersistenceError> {
        mutations::registrations::mark_submitted(&mut self.conn, registration_id, submitted_at)
    }

    /// Applies a review transition conditioned on the expected prior status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn set_review_status(
        &mut self,
        registration_id: i64,
        from: RegistrationStatus,
        to: RegistrationStatus,
    ) -> Result<bool, PersistenceError> {
        mutations::registrations::set_review_status(&mut self.conn, registration_id, from, to)
    }

    /// Marks a registration fee as prepaid, recording step 8.
    ///
    /// Used for bulk registrations, whose fee was settled by the
    /// sponsor's pool purchase rather than an individual intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration is missing.
    pub fn mark_fee_prepaid(&mut self, registration_id: i64) -> Result<(), PersistenceError> {
        let registration: Registration = self
            .get_registration(registration_id)?
            .ok_or_else(|| {
                PersistenceError::NotFound(format!("Registration {registration_id} not found"))
            })?;

        let mut steps: Vec<u8> = registration.completed_steps;
        if !steps.contains(&ovation_domain::MAX_STEP) {
            steps.push(ovation_domain::MAX_STEP);
            steps.sort_unstable();
        }
        let completed_json: String = serde_json::to_string(&steps)?;

        mutations::registrations::settle_fee(
            &mut self.conn,
            registration_id,
            true,
            Some(&completed_json),
        )
    }

    /// Records the payment reference for a registration fee.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration is missing.
    pub fn set_fee_reference(
        &mut self,
        registration_id: i64,
        reference: &str,
    ) -> Result<(), PersistenceError> {
        mutations::registrations::set_fee_reference(&mut self.conn, registration_id, reference)
    }

    // ========================================================================
    // Slot pools
    // ========================================================================

    /// Creates a draft slot pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_pool(
        &mut self,
        owner_identity_id: i64,
        total_slots: u32,
        price_per_slot: i64,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::pools::create_pool(
            &mut self.conn,
            owner_identity_id,
            total_slots,
            price_per_slot,
            &created_at,
        )
    }

    /// Retrieves a slot pool with its participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_pool(&mut self, pool_id: i64) -> Result<Option<SlotPool>, PersistenceError> {
        queries::pools::get_pool(&mut self.conn, pool_id)
    }

    /// Counts a pool's participants.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_participants(&mut self, pool_id: i64) -> Result<i64, PersistenceError> {
        queries::pools::count_participants(&mut self.conn, pool_id)
    }

    /// Finds a pool participant by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_pool_participant(
        &mut self,
        pool_id: i64,
        email: &Email,
    ) -> Result<Option<ovation_domain::PoolParticipant>, PersistenceError> {
        queries::pools::find_participant_by_email(&mut self.conn, pool_id, email)
    }

    /// Records the payment reference for a pool purchase.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool is missing.
    pub fn set_pool_payment_reference(
        &mut self,
        pool_id: i64,
        reference: &str,
    ) -> Result<(), PersistenceError> {
        mutations::pools::set_pool_payment_reference(&mut self.conn, pool_id, reference)
    }

    /// Claims one slot and appends a participant atomically.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SlotClaimRejected` when the pool is
    /// not active or its capacity is exhausted.
    pub fn add_participant(
        &mut self,
        pool_id: i64,
        email: &Email,
        first_name: &str,
        last_name: &str,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::pools::add_participant(
            &mut self.conn,
            pool_id,
            email,
            first_name,
            last_name,
            &created_at,
        )
    }

    /// Updates a participant's invitation status.
    ///
    /// # Errors
    ///
    /// Returns an error if the participant is missing.
    pub fn set_invitation_status(
        &mut self,
        participant_id: i64,
        status: InvitationStatus,
    ) -> Result<(), PersistenceError> {
        mutations::pools::set_invitation_status(&mut self.conn, participant_id, status)
    }

    /// Links a participant to the identity and registration created
    /// from their invitation.
    ///
    /// # Errors
    ///
    /// Returns an error if the participant is missing.
    pub fn link_participant(
        &mut self,
        participant_id: i64,
        identity_id: i64,
        registration_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::pools::link_participant(
            &mut self.conn,
            participant_id,
            identity_id,
            registration_id,
        )
    }

    // ========================================================================
    // Payment records & reconciliation
    // ========================================================================

    /// Creates a payment intent.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateKey` if the reference is
    /// already in use.
    pub fn create_payment_record(
        &mut self,
        reference: &str,
        amount: i64,
        currency: &str,
        subject_type: SubjectType,
        subject_id: i64,
    ) -> Result<(), PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::payments::create_payment_record(
            &mut self.conn,
            reference,
            amount,
            currency,
            subject_type,
            subject_id,
            &created_at,
        )
    }

    /// Retrieves a payment record by its unique reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_payment_record(
        &mut self,
        reference: &str,
    ) -> Result<Option<PaymentRecord>, PersistenceError> {
        queries::payments::get_payment_record(&mut self.conn, reference)
    }

    /// Lists payment records that are still non-terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_pending_payments(&mut self) -> Result<Vec<PaymentRecord>, PersistenceError> {
        queries::payments::list_pending_payments(&mut self.conn)
    }

    /// Executes a reconciliation: the terminal transition and, if this
    /// caller wins it, the fan-out effect — in one transaction.
    ///
    /// The transition is conditioned on the record being non-terminal,
    /// so of N concurrent callers exactly one performs the effect;
    /// every other caller gets `Ok(false)` and must treat the stored
    /// record as the result.
    ///
    /// # Returns
    ///
    /// `true` if this caller won the transition and performed the effect.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` when the effect's subject
    /// no longer exists — the caller surfaces that as a fatal
    /// inconsistency.
    pub fn execute_reconciliation(
        &mut self,
        reference: &str,
        new_status: PaymentStatus,
        effect: &FanOutEffect,
    ) -> Result<bool, PersistenceError> {
        let processed_at: String = now_iso8601()?;

        self.conn
            .transaction::<bool, PersistenceError, _>(|conn| {
                let won: bool = mutations::payments::mark_payment_terminal(
                    conn,
                    reference,
                    new_status,
                    &processed_at,
                )?;

                if !won {
                    return Ok(false);
                }

                match effect {
                    FanOutEffect::SettleRegistrationFee {
                        registration_id,
                        success,
                    } => {
                        let registration: Registration =
                            queries::registrations::get_registration(conn, *registration_id)?
                                .ok_or_else(|| {
                                    PersistenceError::NotFound(format!(
                                        "Registration {registration_id} not found"
                                    ))
                                })?;

                        let completed_json: Option<String> = if *success {
                            let mut steps: Vec<u8> = registration.completed_steps;
                            if !steps.contains(&ovation_domain::MAX_STEP) {
                                steps.push(ovation_domain::MAX_STEP);
                                steps.sort_unstable();
                            }
                            Some(serde_json::to_string(&steps)?)
                        } else {
                            None
                        };

                        mutations::registrations::settle_fee(
                            conn,
                            *registration_id,
                            *success,
                            completed_json.as_deref(),
                        )?;
                    }
                    FanOutEffect::ActivateSlotPool { pool_id, success } => {
                        if queries::pools::get_pool(conn, *pool_id)?.is_none() {
                            return Err(PersistenceError::NotFound(format!(
                                "Slot pool {pool_id} not found"
                            )));
                        }
                        if *success {
                            mutations::pools::activate_pool(conn, *pool_id)?;
                        } else {
                            mutations::pools::fail_pool_payment(conn, *pool_id)?;
                        }
                    }
                    FanOutEffect::CreditVotes { reference, success } => {
                        mutations::votes::settle_vote(conn, reference, *success)?;
                    }
                    FanOutEffect::CompleteTicketOrder { reference, success } => {
                        let ticket_numbers_json: String = if *success {
                            let order: TicketOrder =
                                queries::tickets::get_ticket_order(conn, reference)?.ok_or_else(
                                    || {
                                        PersistenceError::NotFound(format!(
                                            "Ticket order for reference '{reference}' not found"
                                        ))
                                    },
                                )?;
                            let numbers: Vec<String> = (1..=order.quantity)
                                .map(|n| format!("{reference}-T{n}"))
                                .collect();
                            serde_json::to_string(&numbers)?
                        } else {
                            String::from("[]")
                        };

                        mutations::tickets::settle_ticket_order(
                            conn,
                            reference,
                            *success,
                            &ticket_numbers_json,
                        )?;
                    }
                }

                Ok(true)
            })
    }

    // ========================================================================
    // Vote ledger
    // ========================================================================

    /// Creates a contestant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub fn create_contestant(&mut self, stage_name: &str) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::votes::create_contestant(&mut self.conn, stage_name, &created_at)
    }

    /// Retrieves a contestant with its denormalized totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_contestant(
        &mut self,
        contestant_id: i64,
    ) -> Result<Option<Contestant>, PersistenceError> {
        queries::votes::get_contestant(&mut self.conn, contestant_id)
    }

    /// Records a vote purchase intent.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is already in use.
    pub fn record_vote_intent(
        &mut self,
        contestant_id: i64,
        number_of_votes: i64,
        amount_paid: i64,
        payment_reference: &str,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::votes::record_vote_intent(
            &mut self.conn,
            contestant_id,
            number_of_votes,
            amount_paid,
            payment_reference,
            &created_at,
        )
    }

    /// Lists a contestant's vote records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_contestant_votes(
        &mut self,
        contestant_id: i64,
    ) -> Result<Vec<VoteRecord>, PersistenceError> {
        queries::votes::get_contestant_votes(&mut self.conn, contestant_id)
    }

    /// Retrieves a vote record by its unique payment reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_vote_by_reference(
        &mut self,
        payment_reference: &str,
    ) -> Result<Option<VoteRecord>, PersistenceError> {
        queries::votes::get_vote_by_reference(&mut self.conn, payment_reference)
    }

    /// Sums completed votes for a contestant directly from the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn sum_completed_votes(&mut self, contestant_id: i64) -> Result<i64, PersistenceError> {
        queries::votes::sum_completed_votes(&mut self.conn, contestant_id)
    }

    // ========================================================================
    // Ticket orders
    // ========================================================================

    /// Creates a ticket order pending settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if the reference is already in use.
    pub fn create_ticket_order(
        &mut self,
        email: &Email,
        quantity: u32,
        amount: i64,
        payment_reference: &str,
    ) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::tickets::create_ticket_order(
            &mut self.conn,
            email,
            quantity,
            amount,
            payment_reference,
            &created_at,
        )
    }

    /// Retrieves a ticket order by its unique payment reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_ticket_order(
        &mut self,
        payment_reference: &str,
    ) -> Result<Option<TicketOrder>, PersistenceError> {
        queries::tickets::get_ticket_order(&mut self.conn, payment_reference)
    }

    // ========================================================================
    // Audit trail
    // ========================================================================

    /// Persists an audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        let created_at: String = now_iso8601()?;
        mutations::audit::persist_audit_event(&mut self.conn, event, &created_at)
    }

    /// Retrieves the full ordered audit timeline.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_timeline(&mut self) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn)
    }

    /// Retrieves audit events whose cause matches an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if events cannot be retrieved or deserialized.
    pub fn get_audit_events_by_cause(
        &mut self,
        cause_id: &str,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_events_by_cause(&mut self.conn, cause_id)
    }
}
