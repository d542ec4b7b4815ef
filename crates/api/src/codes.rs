// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-time code issuance and consumption.

use rand::RngExt;
use time::{Duration, OffsetDateTime};

use ovation_domain::{CodePurpose, Email, validate_code_format, validate_email};
use ovation_persistence::Persistence;

use crate::collaborators::{EmailDispatcher, dispatch_code_quietly};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};

/// Code issuing and consumption service.
///
/// Codes are fixed-length numeric strings bound to (email, purpose).
/// Issuing never invalidates prior codes; consumption flips `used`
/// exactly once via the persistence layer's conditional update.
pub struct CodeIssuer;

/// The result of issuing a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    /// The numeric code value.
    pub code: String,
    /// Expiry timestamp (ISO 8601).
    pub expires_at: String,
}

impl CodeIssuer {
    /// Default code lifetime in minutes.
    pub const DEFAULT_TTL_MINUTES: i64 = 15;

    /// Generates a fixed-length numeric code.
    fn generate_code() -> String {
        let value: u32 = rand::rng().random_range(0..1_000_000);
        format!("{value:06}")
    }

    /// Issues a new code for (email, purpose) and dispatches it.
    ///
    /// Prior unused codes stay valid; verification always targets the
    /// newest matching row. Email dispatch is fire-and-forget — a
    /// delivery failure is logged, never surfaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is malformed or storage fails.
    pub fn issue(
        persistence: &mut Persistence,
        dispatcher: &dyn EmailDispatcher,
        email: &Email,
        purpose: CodePurpose,
        ttl_minutes: i64,
    ) -> Result<IssuedCode, ApiError> {
        validate_email(email).map_err(translate_domain_error)?;

        let code: String = Self::generate_code();
        let expires_at: String = (OffsetDateTime::now_utc() + Duration::minutes(ttl_minutes))
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to format expiry: {e}"),
            })?;

        persistence
            .insert_code(email, &code, purpose, &expires_at)
            .map_err(translate_persistence_error)?;

        dispatch_code_quietly(dispatcher, email, &code, purpose);

        Ok(IssuedCode { code, expires_at })
    }

    /// Consumes a code, burning it for future use.
    ///
    /// All invalid outcomes (not found, expired, already used) collapse
    /// to one generic error so callers cannot enumerate codes.
    ///
    /// # Errors
    ///
    /// Returns the generic invalid-code error on any failure.
    pub fn consume(
        persistence: &mut Persistence,
        email: &Email,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), ApiError> {
        validate_code_format(code).map_err(translate_domain_error)?;

        let consumed: bool = persistence
            .consume_code(email, code, purpose)
            .map_err(translate_persistence_error)?;

        if consumed {
            Ok(())
        } else {
            Err(ApiError::InvalidInput {
                field: String::from("code"),
                message: String::from(crate::error::GENERIC_CODE_MESSAGE),
            })
        }
    }

    /// Checks a code's validity without burning it.
    ///
    /// Used when a later step must re-validate the same code across a
    /// multi-call flow without consuming it twice.
    ///
    /// # Errors
    ///
    /// Returns the generic invalid-code error on any failure.
    pub fn peek(
        persistence: &mut Persistence,
        email: &Email,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), ApiError> {
        validate_code_format(code).map_err(translate_domain_error)?;

        let valid: bool = persistence
            .peek_code(email, code, purpose)
            .map_err(translate_persistence_error)?;

        if valid {
            Ok(())
        } else {
            Err(ApiError::InvalidInput {
                field: String::from("code"),
                message: String::from(crate::error::GENERIC_CODE_MESSAGE),
            })
        }
    }

    /// Infers the purpose for a caller that did not specify one.
    ///
    /// If the identity's email is already verified the code can only be
    /// for a credential reset; otherwise it is for email verification.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity lookup fails.
    pub fn detect_purpose(
        persistence: &mut Persistence,
        email: &Email,
    ) -> Result<CodePurpose, ApiError> {
        let verified: bool = persistence
            .get_identity_by_email(email)
            .map_err(translate_persistence_error)?
            .is_some_and(|identity| identity.email_verified);

        Ok(if verified {
            CodePurpose::PasswordReset
        } else {
            CodePurpose::EmailVerification
        })
    }
}
