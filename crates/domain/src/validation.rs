// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::Email;

/// The smallest slot pool a sponsor may purchase.
pub const MIN_POOL_SLOTS: u32 = 2;
/// The largest slot pool a sponsor may purchase.
pub const MAX_POOL_SLOTS: u32 = 50;
/// The fixed length of a verification code.
pub const CODE_LENGTH: usize = 6;

/// Validates that an email address is plausibly deliverable.
///
/// This is a structural check, not an RFC 5321 parse: non-empty local
/// part and a domain containing a dot. Deliverability is proven by the
/// verification code flow, not here.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is malformed.
pub fn validate_email(email: &Email) -> Result<(), DomainError> {
    let value: &str = email.value();
    if value.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    let Some((local, domain)) = value.split_once('@') else {
        return Err(DomainError::InvalidEmail(String::from(
            "Email must contain '@'",
        )));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(format!(
            "Email '{value}' is not a valid address"
        )));
    }

    Ok(())
}

/// Validates that a name field is non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or whitespace.
pub fn validate_name(label: &str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(format!(
            "{label} cannot be empty"
        )));
    }
    Ok(())
}

/// Validates that a verification code has the required format.
///
/// Codes are exactly [`CODE_LENGTH`] ASCII digits.
///
/// # Errors
///
/// Returns `DomainError::InvalidCodeFormat` if the code is malformed.
pub fn validate_code_format(code: &str) -> Result<(), DomainError> {
    if code.len() != CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::InvalidCodeFormat(format!(
            "Code must be exactly {CODE_LENGTH} digits"
        )));
    }
    Ok(())
}

/// Validates a slot pool purchase size.
///
/// # Errors
///
/// Returns `DomainError::InvalidSlotCount` if the count is outside
/// [`MIN_POOL_SLOTS`]..=[`MAX_POOL_SLOTS`].
pub const fn validate_slot_count(count: u32) -> Result<(), DomainError> {
    if count >= MIN_POOL_SLOTS && count <= MAX_POOL_SLOTS {
        Ok(())
    } else {
        Err(DomainError::InvalidSlotCount { count })
    }
}

/// Validates a paid-vote purchase request.
///
/// # Errors
///
/// Returns `DomainError::InvalidVotePurchase` if the vote count or
/// amount is non-positive.
pub fn validate_vote_purchase(number_of_votes: i64, amount_paid: i64) -> Result<(), DomainError> {
    if number_of_votes < 1 {
        return Err(DomainError::InvalidVotePurchase(format!(
            "Vote count must be at least 1, got {number_of_votes}"
        )));
    }
    if amount_paid < 1 {
        return Err(DomainError::InvalidVotePurchase(format!(
            "Amount must be positive, got {amount_paid}"
        )));
    }
    Ok(())
}

/// Validates a ticket order quantity.
///
/// # Errors
///
/// Returns `DomainError::InvalidTicketQuantity` if the quantity is zero.
pub const fn validate_ticket_quantity(quantity: u32) -> Result<(), DomainError> {
    if quantity >= 1 {
        Ok(())
    } else {
        Err(DomainError::InvalidTicketQuantity { quantity })
    }
}
