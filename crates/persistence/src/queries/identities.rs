// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity queries.

use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::IdentityRow;
use crate::diesel_schema::identities;
use crate::error::PersistenceError;
use ovation_domain::{Email, Identity, Role};

/// Maps an identity row to the domain type.
fn to_domain(row: IdentityRow) -> Result<Identity, PersistenceError> {
    Ok(Identity {
        identity_id: Some(row.identity_id),
        first_name: row.first_name,
        last_name: row.last_name,
        email: Email::new(&row.email),
        email_verified: row.email_verified != 0,
        credential_set: row.credential_set != 0,
        role: Role::from_str(&row.role)?,
        active: row.active != 0,
    })
}

/// Retrieves an identity by email.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored role is
/// unmappable.
pub fn get_identity_by_email(
    conn: &mut SqliteConnection,
    email: &Email,
) -> Result<Option<Identity>, PersistenceError> {
    identities::table
        .filter(identities::email.eq(email.value()))
        .first::<IdentityRow>(conn)
        .optional()?
        .map(to_domain)
        .transpose()
}

/// Retrieves an identity by its canonical ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored role is
/// unmappable.
pub fn get_identity_by_id(
    conn: &mut SqliteConnection,
    identity_id: i64,
) -> Result<Option<Identity>, PersistenceError> {
    identities::table
        .filter(identities::identity_id.eq(identity_id))
        .first::<IdentityRow>(conn)
        .optional()?
        .map(to_domain)
        .transpose()
}

/// Verifies a credential against an identity's stored hash.
///
/// # Returns
///
/// `false` when the identity is missing or has no credential set, so
/// callers cannot distinguish a wrong credential from a missing one.
///
/// # Errors
///
/// Returns an error if the database query or hash verification fails.
pub fn verify_credential(
    conn: &mut SqliteConnection,
    email: &Email,
    credential: &str,
) -> Result<bool, PersistenceError> {
    let hash: Option<Option<String>> = identities::table
        .filter(identities::email.eq(email.value()))
        .select(identities::credential_hash)
        .first(conn)
        .optional()?;

    let Some(Some(hash)) = hash else {
        return Ok(false);
    };

    bcrypt::verify(credential, &hash)
        .map_err(|e| PersistenceError::Other(format!("Failed to verify credential: {e}")))
}
