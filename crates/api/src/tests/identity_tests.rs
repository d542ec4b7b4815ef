// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity onboarding tests.

use super::helpers::{create_test_cause, new_persistence, start_test_registration, test_pricing};
use crate::{
    ApiError, CodeIssuer, CredentialPolicy, ForgotCredentialRequest, GENERIC_RESET_MESSAGE,
    IssuedCode, LoggingEmailDispatcher, SetCredentialRequest, StartRegistrationRequest,
    forgot_credential, set_credential, start_registration, verify_email, VerifyEmailRequest,
};
use ovation_domain::{CodePurpose, Email, RegistrationStatus};
use ovation_persistence::Persistence;

#[test]
fn test_start_registration_creates_identity_and_draft() {
    let mut persistence: Persistence = new_persistence();
    let response = start_test_registration(&mut persistence, "starter");

    let identity = persistence
        .get_identity_by_email(&Email::new("starter@example.com"))
        .expect("get failed")
        .expect("identity should exist");
    assert!(!identity.email_verified);

    let registration = persistence
        .get_registration(response.registration_id)
        .expect("get failed")
        .expect("registration should exist");
    assert_eq!(registration.status, RegistrationStatus::Draft);
    assert_eq!(registration.owner_identity_id, response.identity_id);
}

#[test]
fn test_reregistration_supersedes_stale_unverified_identity() {
    let mut persistence: Persistence = new_persistence();
    let first = start_test_registration(&mut persistence, "stale");
    let second = start_test_registration(&mut persistence, "stale");

    assert_ne!(first.identity_id, second.identity_id);
}

#[test]
fn test_reregistration_with_verified_identity_conflicts() {
    let mut persistence: Persistence = new_persistence();
    start_test_registration(&mut persistence, "settled");

    let email: Email = Email::new("settled@example.com");
    let issued: IssuedCode = CodeIssuer::issue(
        &mut persistence,
        &LoggingEmailDispatcher,
        &email,
        CodePurpose::EmailVerification,
        15,
    )
    .expect("issue failed");
    verify_email(
        &mut persistence,
        VerifyEmailRequest {
            email: String::from("settled@example.com"),
            code: issued.code,
        },
        create_test_cause(),
    )
    .expect("verify failed");

    let err = start_registration(
        &mut persistence,
        &LoggingEmailDispatcher,
        &test_pricing(),
        StartRegistrationRequest {
            email: String::from("settled@example.com"),
            first_name: String::from("Second"),
            last_name: String::from("Try"),
            kind: String::from("individual"),
            bulk_registration_id: None,
        },
        create_test_cause(),
    )
    .expect_err("verified email should conflict");
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_bulk_registration_requires_pool_reference() {
    let mut persistence: Persistence = new_persistence();

    let err = start_registration(
        &mut persistence,
        &LoggingEmailDispatcher,
        &test_pricing(),
        StartRegistrationRequest {
            email: String::from("bulk@example.com"),
            first_name: String::from("Bulk"),
            last_name: String::from("Kid"),
            kind: String::from("bulk"),
            bulk_registration_id: None,
        },
        create_test_cause(),
    )
    .expect_err("bulk without pool should fail");
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_set_credential_peeks_then_consumes() {
    let mut persistence: Persistence = new_persistence();
    start_test_registration(&mut persistence, "credflow");
    let email: Email = Email::new("credflow@example.com");

    let issued: IssuedCode = CodeIssuer::issue(
        &mut persistence,
        &LoggingEmailDispatcher,
        &email,
        CodePurpose::EmailVerification,
        15,
    )
    .expect("issue failed");

    // A policy failure must leave the code usable.
    let weak = set_credential(
        &mut persistence,
        &CredentialPolicy::default(),
        SetCredentialRequest {
            email: String::from("credflow@example.com"),
            code: issued.code.clone(),
            credential: String::from("short"),
            confirmation: String::from("short"),
        },
        create_test_cause(),
    )
    .expect_err("weak credential should fail");
    assert!(matches!(weak, ApiError::InvalidInput { .. }));

    set_credential(
        &mut persistence,
        &CredentialPolicy::default(),
        SetCredentialRequest {
            email: String::from("credflow@example.com"),
            code: issued.code.clone(),
            credential: String::from("Str0ng-Credential!"),
            confirmation: String::from("Str0ng-Credential!"),
        },
        create_test_cause(),
    )
    .expect("set_credential failed");

    // The code was consumed by the successful set.
    let replay = set_credential(
        &mut persistence,
        &CredentialPolicy::default(),
        SetCredentialRequest {
            email: String::from("credflow@example.com"),
            code: issued.code,
            credential: String::from("An0ther-Credential!"),
            confirmation: String::from("An0ther-Credential!"),
        },
        create_test_cause(),
    )
    .expect_err("burned code should fail");
    assert!(matches!(replay, ApiError::InvalidInput { .. }));

    assert!(
        persistence
            .verify_credential(&email, "Str0ng-Credential!")
            .expect("verify failed")
    );
}

#[test]
fn test_forgot_credential_never_reveals_account_existence() {
    let mut persistence: Persistence = new_persistence();
    start_test_registration(&mut persistence, "known");

    let for_known = forgot_credential(
        &mut persistence,
        &LoggingEmailDispatcher,
        ForgotCredentialRequest {
            email: String::from("known@example.com"),
        },
    )
    .expect("forgot failed");
    let for_unknown = forgot_credential(
        &mut persistence,
        &LoggingEmailDispatcher,
        ForgotCredentialRequest {
            email: String::from("unknown@example.com"),
        },
    )
    .expect("forgot failed");

    assert_eq!(for_known.message, GENERIC_RESET_MESSAGE);
    assert_eq!(for_unknown.message, for_known.message);
}

#[test]
fn test_verify_email_flips_identity_flag() {
    let mut persistence: Persistence = new_persistence();
    start_test_registration(&mut persistence, "flipme");
    let email: Email = Email::new("flipme@example.com");

    let issued: IssuedCode = CodeIssuer::issue(
        &mut persistence,
        &LoggingEmailDispatcher,
        &email,
        CodePurpose::EmailVerification,
        15,
    )
    .expect("issue failed");

    verify_email(
        &mut persistence,
        VerifyEmailRequest {
            email: String::from("flipme@example.com"),
            code: issued.code,
        },
        create_test_cause(),
    )
    .expect("verify failed");

    let identity = persistence
        .get_identity_by_email(&email)
        .expect("get failed")
        .expect("identity should exist");
    assert!(identity.email_verified);
}
