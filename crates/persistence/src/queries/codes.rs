// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification code queries.

use diesel::prelude::*;

use crate::data_models::VerificationCodeRow;
use crate::diesel_schema::verification_codes;
use crate::error::PersistenceError;
use ovation_domain::{CodePurpose, Email};

/// Finds the most recent valid code matching (email, code, purpose).
///
/// Valid means unused and unexpired at `now`. This is the shared
/// validity check behind both `peek` (which stops here) and `consume`
/// (which goes on to flip `used` conditionally).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_valid_code(
    conn: &mut SqliteConnection,
    email: &Email,
    code: &str,
    purpose: CodePurpose,
    now: &str,
) -> Result<Option<VerificationCodeRow>, PersistenceError> {
    Ok(verification_codes::table
        .filter(verification_codes::email.eq(email.value()))
        .filter(verification_codes::code.eq(code))
        .filter(verification_codes::purpose.eq(purpose.as_str()))
        .filter(verification_codes::used.eq(0))
        .filter(verification_codes::expires_at.gt(now))
        .order(verification_codes::created_at.desc())
        .first::<VerificationCodeRow>(conn)
        .optional()?)
}
