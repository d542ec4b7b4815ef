// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential policy validation.
//!
//! This module enforces credential requirements for identity accounts.

use thiserror::Error;

/// Credential policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialPolicyError {
    /// Credential is too short.
    #[error("Credential must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Credential does not meet complexity requirements.
    #[error(
        "Credential must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Credential matches the account email.
    #[error("Credential must not match the account email")]
    MatchesEmail,

    /// Credential and confirmation do not match.
    #[error("Credential and confirmation do not match")]
    ConfirmationMismatch,
}

/// Credential policy configuration.
pub struct CredentialPolicy {
    /// Minimum credential length.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            min_length: 10,
            min_complexity: 3,
        }
    }
}

impl CredentialPolicy {
    /// Validates a credential against the policy.
    ///
    /// # Arguments
    ///
    /// * `credential` - The credential to validate
    /// * `confirmation` - The credential confirmation
    /// * `email` - The account email (credential must not match)
    ///
    /// # Errors
    ///
    /// Returns a `CredentialPolicyError` if the credential does not
    /// meet policy requirements.
    pub fn validate(
        &self,
        credential: &str,
        confirmation: &str,
        email: &str,
    ) -> Result<(), CredentialPolicyError> {
        if credential != confirmation {
            return Err(CredentialPolicyError::ConfirmationMismatch);
        }

        if credential.len() < self.min_length {
            return Err(CredentialPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let complexity: usize = Self::calculate_complexity(credential);
        if complexity < self.min_complexity {
            return Err(CredentialPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        if credential.to_lowercase() == email.to_lowercase() {
            return Err(CredentialPolicyError::MatchesEmail);
        }

        Ok(())
    }

    /// Calculates the complexity score of a credential.
    ///
    /// Returns the number of character classes present:
    /// - Uppercase letters
    /// - Lowercase letters
    /// - Digits
    /// - Symbols
    fn calculate_complexity(credential: &str) -> usize {
        let mut has_uppercase: bool = false;
        let mut has_lowercase: bool = false;
        let mut has_digit: bool = false;
        let mut has_symbol: bool = false;

        for ch in credential.chars() {
            if ch.is_ascii_uppercase() {
                has_uppercase = true;
            } else if ch.is_ascii_lowercase() {
                has_lowercase = true;
            } else if ch.is_ascii_digit() {
                has_digit = true;
            } else {
                has_symbol = true;
            }
        }

        usize::from(has_uppercase)
            + usize::from(has_lowercase)
            + usize::from(has_digit)
            + usize::from(has_symbol)
    }
}
