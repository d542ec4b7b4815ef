// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity mutations.
//!
//! Identities are keyed by their unique email. A stale unverified
//! identity may be superseded by re-registration with the same email;
//! verified identities are never deleted.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::identities;
use crate::error::PersistenceError;
use crate::sqlite;
use ovation_domain::{Email, Role};

/// Creates a new unverified identity.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if an identity with this
/// email already exists.
pub fn create_identity(
    conn: &mut SqliteConnection,
    email: &Email,
    first_name: &str,
    last_name: &str,
    role: Role,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(identities::table)
        .values((
            identities::email.eq(email.value()),
            identities::first_name.eq(first_name),
            identities::last_name.eq(last_name),
            identities::role.eq(role.as_str()),
            identities::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let identity_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(identity_id, email = %email, "Identity created");
    Ok(identity_id)
}

/// Deletes a stale unverified identity so re-registration can supersede it.
///
/// The delete is conditioned on `email_verified = 0`; a verified
/// identity is never removed by this path.
///
/// # Returns
///
/// `true` if a stale identity was removed.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn supersede_unverified_identity(
    conn: &mut SqliteConnection,
    email: &Email,
) -> Result<bool, PersistenceError> {
    let deleted: usize = diesel::delete(
        identities::table
            .filter(identities::email.eq(email.value()))
            .filter(identities::email_verified.eq(0)),
    )
    .execute(conn)?;

    if deleted > 0 {
        info!(email = %email, "Superseded stale unverified identity");
    }
    Ok(deleted > 0)
}

/// Marks an identity's email as verified.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no identity has this email.
pub fn mark_email_verified(
    conn: &mut SqliteConnection,
    email: &Email,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        identities::table.filter(identities::email.eq(email.value())),
    )
    .set(identities::email_verified.eq(1))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Identity '{email}' not found"
        )));
    }
    Ok(())
}

/// Stores a credential hash and marks the credential as set.
///
/// The plain-text credential is hashed with bcrypt before it touches
/// the database.
///
/// # Errors
///
/// Returns an error if hashing fails or no identity has this email.
pub fn set_credential(
    conn: &mut SqliteConnection,
    email: &Email,
    credential: &str,
) -> Result<(), PersistenceError> {
    let credential_hash: String = bcrypt::hash(credential, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash credential: {e}")))?;

    let updated: usize = diesel::update(
        identities::table.filter(identities::email.eq(email.value())),
    )
    .set((
        identities::credential_hash.eq(&credential_hash),
        identities::credential_set.eq(1),
    ))
    .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Identity '{email}' not found"
        )));
    }

    info!(email = %email, "Credential set");
    Ok(())
}
