// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot pool queries.

use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::{BulkParticipantRow, BulkRegistrationRow};
use crate::diesel_schema::{bulk_participants, bulk_registrations};
use crate::error::PersistenceError;
use ovation_domain::{Email, FeeStatus, InvitationStatus, PoolParticipant, PoolStatus, SlotPool};

/// Maps a participant row to the domain type.
fn participant_to_domain(row: BulkParticipantRow) -> Result<PoolParticipant, PersistenceError> {
    Ok(PoolParticipant {
        participant_id: Some(row.participant_id),
        email: Email::new(&row.email),
        first_name: row.first_name,
        last_name: row.last_name,
        participant_identity_id: row.participant_identity_id,
        registration_id: row.registration_id,
        invitation_status: InvitationStatus::from_str(&row.invitation_status)?,
    })
}

/// Retrieves a slot pool with its participants.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_pool(
    conn: &mut SqliteConnection,
    pool_id: i64,
) -> Result<Option<SlotPool>, PersistenceError> {
    let Some(row) = bulk_registrations::table
        .filter(bulk_registrations::bulk_id.eq(pool_id))
        .first::<BulkRegistrationRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let participants: Vec<PoolParticipant> = bulk_participants::table
        .filter(bulk_participants::bulk_id.eq(pool_id))
        .order(bulk_participants::participant_id.asc())
        .load::<BulkParticipantRow>(conn)?
        .into_iter()
        .map(participant_to_domain)
        .collect::<Result<_, _>>()?;

    Ok(Some(SlotPool {
        pool_id: row.bulk_id,
        owner_identity_id: row.owner_identity_id,
        total_slots: u32::try_from(row.total_slots).map_err(|_| {
            PersistenceError::CorruptRow(format!("total_slots {} out of range", row.total_slots))
        })?,
        used_slots: u32::try_from(row.used_slots).map_err(|_| {
            PersistenceError::CorruptRow(format!("used_slots {} out of range", row.used_slots))
        })?,
        price_per_slot: row.price_per_slot,
        status: PoolStatus::from_str(&row.status)?,
        payment_status: FeeStatus::from_str(&row.payment_status)?,
        payment_reference: row.payment_reference,
        participants,
    }))
}

/// Finds a pool participant by email.
///
/// Backs the bulk registration path: an invitee's registration must
/// match a named participant before it can consume the pool's slot.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn find_participant_by_email(
    conn: &mut SqliteConnection,
    pool_id: i64,
    email: &Email,
) -> Result<Option<PoolParticipant>, PersistenceError> {
    bulk_participants::table
        .filter(bulk_participants::bulk_id.eq(pool_id))
        .filter(bulk_participants::email.eq(email.value()))
        .first::<BulkParticipantRow>(conn)
        .optional()?
        .map(participant_to_domain)
        .transpose()
}

/// Counts a pool's participants.
///
/// The allocator invariant requires this to always equal the pool's
/// `used_slots`; tests assert it after concurrent-style add sequences.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_participants(
    conn: &mut SqliteConnection,
    pool_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(bulk_participants::table
        .filter(bulk_participants::bulk_id.eq(pool_id))
        .count()
        .get_result(conn)?)
}
