// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration workflow mutations.
//!
//! Step payloads live in independent columns, so concurrent edits to
//! different steps never touch the same data. The submission flip and
//! review transitions are conditioned on the expected current status.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::registrations;
use crate::error::PersistenceError;
use crate::sqlite;
use ovation_domain::{FeeStatus, RegistrationKind, RegistrationStatus};

/// Creates a draft registration for an identity.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_registration(
    conn: &mut SqliteConnection,
    owner_identity_id: i64,
    kind: RegistrationKind,
    fee_amount: i64,
    bulk_registration_id: Option<i64>,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(registrations::table)
        .values((
            registrations::owner_identity_id.eq(owner_identity_id),
            registrations::kind.eq(kind.as_str()),
            registrations::fee_amount.eq(fee_amount),
            registrations::bulk_registration_id.eq(bulk_registration_id),
            registrations::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let registration_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(registration_id, owner_identity_id, kind = %kind, "Registration created");
    Ok(registration_id)
}

/// Persists one step update: the merged payload column, the completed
/// set, and the wizard position.
///
/// Only the updated step's column is written; edits to other steps of
/// the same registration interleave safely.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_step_columns(
    conn: &mut SqliteConnection,
    registration_id: i64,
    step: u8,
    payload_json: &str,
    completed_steps_json: &str,
    current_step: u8,
) -> Result<(), PersistenceError> {
    let scope = registrations::table.filter(registrations::registration_id.eq(registration_id));
    let position = (
        registrations::completed_steps.eq(completed_steps_json),
        registrations::current_step.eq(i32::from(current_step)),
    );

    let updated: usize = match step {
        1 => diesel::update(scope)
            .set((registrations::personal_json.eq(payload_json), position))
            .execute(conn)?,
        2 => diesel::update(scope)
            .set((registrations::talent_json.eq(payload_json), position))
            .execute(conn)?,
        3 => diesel::update(scope)
            .set((registrations::group_json.eq(payload_json), position))
            .execute(conn)?,
        4 => diesel::update(scope)
            .set((registrations::guardian_json.eq(payload_json), position))
            .execute(conn)?,
        5 => diesel::update(scope)
            .set((registrations::media_json.eq(payload_json), position))
            .execute(conn)?,
        6 => diesel::update(scope)
            .set((registrations::audition_json.eq(payload_json), position))
            .execute(conn)?,
        7 => diesel::update(scope)
            .set((registrations::terms_json.eq(payload_json), position))
            .execute(conn)?,
        // Step 8 has no payload slot; only the position advances.
        _ => diesel::update(scope).set(position).execute(conn)?,
    };

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Registration {registration_id} not found"
        )));
    }
    Ok(())
}

/// Flips a draft registration to submitted.
///
/// Conditioned on the status still being `draft`; a concurrent
/// submission loses and reports no affected row.
///
/// # Returns
///
/// `true` if this caller performed the flip.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn mark_submitted(
    conn: &mut SqliteConnection,
    registration_id: i64,
    submitted_at: &str,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        registrations::table
            .filter(registrations::registration_id.eq(registration_id))
            .filter(registrations::status.eq(RegistrationStatus::Draft.as_str())),
    )
    .set((
        registrations::status.eq(RegistrationStatus::Submitted.as_str()),
        registrations::submitted_at.eq(submitted_at),
    ))
    .execute(conn)?;

    if updated == 1 {
        info!(registration_id, "Registration submitted");
    }
    Ok(updated == 1)
}

/// Applies a review transition, conditioned on the expected prior status.
///
/// # Returns
///
/// `true` if the transition applied; `false` if the registration had
/// already moved on.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn set_review_status(
    conn: &mut SqliteConnection,
    registration_id: i64,
    from: RegistrationStatus,
    to: RegistrationStatus,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        registrations::table
            .filter(registrations::registration_id.eq(registration_id))
            .filter(registrations::status.eq(from.as_str())),
    )
    .set(registrations::status.eq(to.as_str()))
    .execute(conn)?;

    Ok(updated == 1)
}

/// Records the payment reference for a registration fee and moves the
/// fee to `processing`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the registration is missing.
pub fn set_fee_reference(
    conn: &mut SqliteConnection,
    registration_id: i64,
    reference: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        registrations::table.filter(registrations::registration_id.eq(registration_id)),
    )
    .set((
        registrations::fee_reference.eq(reference),
        registrations::fee_status.eq(FeeStatus::Processing.as_str()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Registration {registration_id} not found"
        )));
    }
    Ok(())
}

/// Settles a registration fee from a reconciled payment outcome.
///
/// On success the fee completes and step 8 is recorded in the completed
/// set; on failure the fee is marked failed so the payer can retry with
/// a fresh intent. Reached only by the applier that won the payment
/// record's conditional transition.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the registration is missing.
pub fn settle_fee(
    conn: &mut SqliteConnection,
    registration_id: i64,
    success: bool,
    completed_steps_json: Option<&str>,
) -> Result<(), PersistenceError> {
    let fee_status: FeeStatus = if success {
        FeeStatus::Completed
    } else {
        FeeStatus::Failed
    };

    let updated: usize = if let Some(steps_json) = completed_steps_json {
        diesel::update(
            registrations::table.filter(registrations::registration_id.eq(registration_id)),
        )
        .set((
            registrations::fee_status.eq(fee_status.as_str()),
            registrations::completed_steps.eq(steps_json),
        ))
        .execute(conn)?
    } else {
        diesel::update(
            registrations::table.filter(registrations::registration_id.eq(registration_id)),
        )
        .set(registrations::fee_status.eq(fee_status.as_str()))
        .execute(conn)?
    };

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Registration {registration_id} not found"
        )));
    }

    info!(registration_id, success, "Registration fee settled");
    Ok(())
}
