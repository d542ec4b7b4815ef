// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification code mutations.
//!
//! Issuing never invalidates prior codes; validity always targets the
//! newest matching row. Consumption flips `used` exactly once: the
//! UPDATE is conditioned on `used = 0`, so of two concurrent consumers
//! only one observes an affected row.

use diesel::prelude::*;
use tracing::debug;

use crate::diesel_schema::verification_codes;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite;
use ovation_domain::{CodePurpose, Email};

/// Stores a newly issued verification code.
///
/// Prior unused codes for the same (email, purpose) are left intact.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn insert_code(
    conn: &mut SqliteConnection,
    email: &Email,
    code: &str,
    purpose: CodePurpose,
    expires_at: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(verification_codes::table)
        .values((
            verification_codes::email.eq(email.value()),
            verification_codes::code.eq(code),
            verification_codes::purpose.eq(purpose.as_str()),
            verification_codes::expires_at.eq(expires_at),
            verification_codes::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let code_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    debug!(code_id, email = %email, purpose = %purpose, "Verification code stored");
    Ok(code_id)
}

/// Consumes the most recent valid code matching (email, code, purpose).
///
/// The lookup finds the newest unused, unexpired row; the flip is a
/// separate UPDATE conditioned on `used = 0`, which is what guards the
/// double-submit race: both submitters resolve the same row, but only
/// the UPDATE that still sees `used = 0` reports an affected row.
///
/// # Returns
///
/// `true` if this caller consumed the code; `false` if no valid code
/// matched or a concurrent caller consumed it first.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn consume_code(
    conn: &mut SqliteConnection,
    email: &Email,
    code: &str,
    purpose: CodePurpose,
    now: &str,
) -> Result<bool, PersistenceError> {
    let Some(candidate) = queries::codes::find_valid_code(conn, email, code, purpose, now)? else {
        return Ok(false);
    };

    let updated: usize = diesel::update(
        verification_codes::table
            .filter(verification_codes::code_id.eq(candidate.code_id))
            .filter(verification_codes::used.eq(0)),
    )
    .set(verification_codes::used.eq(1))
    .execute(conn)?;

    Ok(updated == 1)
}

/// Deletes expired codes.
///
/// Expiry is enforced by timestamp comparison at validation time; this
/// sweep is storage hygiene only, not a correctness requirement.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_codes(
    conn: &mut SqliteConnection,
    now: &str,
) -> Result<usize, PersistenceError> {
    Ok(
        diesel::delete(verification_codes::table.filter(verification_codes::expires_at.le(now)))
            .execute(conn)?,
    )
}
