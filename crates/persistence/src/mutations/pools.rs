// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot pool mutations.
//!
//! The allocator's invariant — `used_slots <= total_slots` with
//! `used_slots` equal to the participant count — is enforced by a
//! conditional increment: the slot is claimed by an UPDATE that
//! re-checks capacity, and the participant row is inserted only when
//! that UPDATE reports an affected row. Both happen in one transaction.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::{bulk_participants, bulk_registrations};
use crate::error::PersistenceError;
use crate::sqlite;
use ovation_domain::{Email, InvitationStatus, PoolStatus};

/// Creates a draft slot pool.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_pool(
    conn: &mut SqliteConnection,
    owner_identity_id: i64,
    total_slots: u32,
    price_per_slot: i64,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(bulk_registrations::table)
        .values((
            bulk_registrations::owner_identity_id.eq(owner_identity_id),
            bulk_registrations::total_slots.eq(i32::try_from(total_slots).unwrap_or(i32::MAX)),
            bulk_registrations::price_per_slot.eq(price_per_slot),
            bulk_registrations::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let pool_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(pool_id, owner_identity_id, total_slots, "Slot pool created");
    Ok(pool_id)
}

/// Records the payment reference for a pool purchase and moves the pool
/// to `payment_pending`.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the pool is missing.
pub fn set_pool_payment_reference(
    conn: &mut SqliteConnection,
    pool_id: i64,
    reference: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        bulk_registrations::table.filter(bulk_registrations::bulk_id.eq(pool_id)),
    )
    .set((
        bulk_registrations::payment_reference.eq(reference),
        bulk_registrations::status.eq(PoolStatus::PaymentPending.as_str()),
        bulk_registrations::payment_status.eq("processing"),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Slot pool {pool_id} not found"
        )));
    }
    Ok(())
}

/// Activates a pool from a successful payment outcome.
///
/// Conditioned on the pool still being `draft` or `payment_pending`:
/// a replayed activation against an already-active pool affects no rows
/// and is reported as a no-op, which keeps activation idempotent.
///
/// # Returns
///
/// `true` if this call performed the activation.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn activate_pool(conn: &mut SqliteConnection, pool_id: i64) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        bulk_registrations::table
            .filter(bulk_registrations::bulk_id.eq(pool_id))
            .filter(bulk_registrations::status.eq_any([
                PoolStatus::Draft.as_str(),
                PoolStatus::PaymentPending.as_str(),
            ])),
    )
    .set((
        bulk_registrations::status.eq(PoolStatus::Active.as_str()),
        bulk_registrations::payment_status.eq("completed"),
    ))
    .execute(conn)?;

    if updated == 1 {
        info!(pool_id, "Slot pool activated");
    }
    Ok(updated == 1)
}

/// Marks a pool purchase as failed.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn fail_pool_payment(conn: &mut SqliteConnection, pool_id: i64) -> Result<(), PersistenceError> {
    diesel::update(
        bulk_registrations::table
            .filter(bulk_registrations::bulk_id.eq(pool_id))
            .filter(bulk_registrations::status.eq_any([
                PoolStatus::Draft.as_str(),
                PoolStatus::PaymentPending.as_str(),
            ])),
    )
    .set(bulk_registrations::payment_status.eq("failed"))
    .execute(conn)?;

    Ok(())
}

/// Claims one slot and appends a participant, atomically.
///
/// The claim is an UPDATE incrementing `used_slots`, conditioned on the
/// pool being active and `used_slots < total_slots`. Concurrent adds
/// race on that condition; the loser sees no affected row and no
/// participant is inserted, so the pool can never overshoot. When the
/// claim fills the last slot the pool transitions to `completed`.
///
/// # Returns
///
/// The new participant's ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the pool is missing, or
/// `PersistenceError::SlotClaimRejected` carrying the pool's status and
/// counts when the claim loses — the caller maps that to
/// pool-not-active or pool-exhausted.
pub fn add_participant(
    conn: &mut SqliteConnection,
    pool_id: i64,
    email: &Email,
    first_name: &str,
    last_name: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        let claimed: usize = diesel::update(
            bulk_registrations::table
                .filter(bulk_registrations::bulk_id.eq(pool_id))
                .filter(bulk_registrations::status.eq(PoolStatus::Active.as_str()))
                .filter(bulk_registrations::used_slots.lt(bulk_registrations::total_slots)),
        )
        .set(bulk_registrations::used_slots.eq(bulk_registrations::used_slots + 1))
        .execute(conn)?;

        if claimed == 0 {
            let (status, used_slots, total_slots): (String, i32, i32) = bulk_registrations::table
                .filter(bulk_registrations::bulk_id.eq(pool_id))
                .select((
                    bulk_registrations::status,
                    bulk_registrations::used_slots,
                    bulk_registrations::total_slots,
                ))
                .first(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => PersistenceError::NotFound(format!(
                        "Slot pool {pool_id} not found"
                    )),
                    other => other.into(),
                })?;

            return Err(PersistenceError::SlotClaimRejected {
                status,
                used_slots,
                total_slots,
            });
        }

        diesel::insert_into(bulk_participants::table)
            .values((
                bulk_participants::bulk_id.eq(pool_id),
                bulk_participants::email.eq(email.value()),
                bulk_participants::first_name.eq(first_name),
                bulk_participants::last_name.eq(last_name),
                bulk_participants::created_at.eq(created_at),
            ))
            .execute(conn)?;

        let participant_id: i64 = sqlite::get_last_insert_rowid(conn)?;

        // The final slot completes the pool.
        diesel::update(
            bulk_registrations::table
                .filter(bulk_registrations::bulk_id.eq(pool_id))
                .filter(bulk_registrations::status.eq(PoolStatus::Active.as_str()))
                .filter(bulk_registrations::used_slots.eq(bulk_registrations::total_slots)),
        )
        .set(bulk_registrations::status.eq(PoolStatus::Completed.as_str()))
        .execute(conn)?;

        info!(pool_id, participant_id, email = %email, "Participant added to pool");
        Ok(participant_id)
    })
}

/// Updates a participant's invitation status.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the participant is missing.
pub fn set_invitation_status(
    conn: &mut SqliteConnection,
    participant_id: i64,
    status: InvitationStatus,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        bulk_participants::table.filter(bulk_participants::participant_id.eq(participant_id)),
    )
    .set(bulk_participants::invitation_status.eq(status.as_str()))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Participant {participant_id} not found"
        )));
    }
    Ok(())
}

/// Links a participant to the identity and registration created from
/// their invitation.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the participant is missing.
pub fn link_participant(
    conn: &mut SqliteConnection,
    participant_id: i64,
    identity_id: i64,
    registration_id: i64,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        bulk_participants::table.filter(bulk_participants::participant_id.eq(participant_id)),
    )
    .set((
        bulk_participants::participant_identity_id.eq(identity_id),
        bulk_participants::registration_id.eq(registration_id),
        bulk_participants::invitation_status.eq(InvitationStatus::Registered.as_str()),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Participant {participant_id} not found"
        )));
    }
    Ok(())
}
