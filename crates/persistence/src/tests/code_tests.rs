// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Verification code single-use and validity tests.

use super::helpers::{future_expiry, new_persistence, past_expiry, test_email};
use crate::Persistence;
use ovation_domain::CodePurpose;

#[test]
fn test_consume_with_wrong_code_then_right_code_then_replay() {
    // Scenario: issue, wrong code fails, right code succeeds once.
    let mut persistence: Persistence = new_persistence();
    let email = test_email("a");

    persistence
        .insert_code(&email, "123456", CodePurpose::EmailVerification, &future_expiry())
        .expect("Failed to insert code");

    assert!(
        !persistence
            .consume_code(&email, "999999", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
    assert!(
        persistence
            .consume_code(&email, "123456", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
    assert!(
        !persistence
            .consume_code(&email, "123456", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
}

#[test]
fn test_expired_code_is_invalid() {
    let mut persistence: Persistence = new_persistence();
    let email = test_email("b");

    persistence
        .insert_code(&email, "123456", CodePurpose::EmailVerification, &past_expiry())
        .expect("Failed to insert code");

    assert!(
        !persistence
            .consume_code(&email, "123456", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
}

#[test]
fn test_purpose_mismatch_is_invalid() {
    let mut persistence: Persistence = new_persistence();
    let email = test_email("c");

    persistence
        .insert_code(&email, "123456", CodePurpose::EmailVerification, &future_expiry())
        .expect("Failed to insert code");

    assert!(
        !persistence
            .consume_code(&email, "123456", CodePurpose::PasswordReset)
            .expect("consume should not error")
    );
}

#[test]
fn test_issuing_does_not_invalidate_prior_codes() {
    let mut persistence: Persistence = new_persistence();
    let email = test_email("d");

    persistence
        .insert_code(&email, "111111", CodePurpose::EmailVerification, &future_expiry())
        .expect("Failed to insert code");
    persistence
        .insert_code(&email, "222222", CodePurpose::EmailVerification, &future_expiry())
        .expect("Failed to insert code");

    // Both codes remain individually consumable.
    assert!(
        persistence
            .consume_code(&email, "111111", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
    assert!(
        persistence
            .consume_code(&email, "222222", CodePurpose::EmailVerification)
            .expect("consume should not error")
    );
}

#[test]
fn test_peek_does_not_burn_the_code() {
    let mut persistence: Persistence = new_persistence();
    let email = test_email("e");

    persistence
        .insert_code(&email, "123456", CodePurpose::PasswordReset, &future_expiry())
        .expect("Failed to insert code");

    assert!(
        persistence
            .peek_code(&email, "123456", CodePurpose::PasswordReset)
            .expect("peek should not error")
    );
    // Still consumable after any number of peeks.
    assert!(
        persistence
            .peek_code(&email, "123456", CodePurpose::PasswordReset)
            .expect("peek should not error")
    );
    assert!(
        persistence
            .consume_code(&email, "123456", CodePurpose::PasswordReset)
            .expect("consume should not error")
    );
    assert!(
        !persistence
            .peek_code(&email, "123456", CodePurpose::PasswordReset)
            .expect("peek should not error")
    );
}

#[test]
fn test_expired_code_sweep_removes_only_expired_rows() {
    let mut persistence: Persistence = new_persistence();
    let email = test_email("f");

    persistence
        .insert_code(&email, "111111", CodePurpose::EmailVerification, &past_expiry())
        .expect("Failed to insert code");
    persistence
        .insert_code(&email, "222222", CodePurpose::EmailVerification, &future_expiry())
        .expect("Failed to insert code");

    let swept: usize = persistence.delete_expired_codes().expect("sweep failed");
    assert_eq!(swept, 1);

    assert!(
        persistence
            .peek_code(&email, "222222", CodePurpose::EmailVerification)
            .expect("peek should not error")
    );
}
