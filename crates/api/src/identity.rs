// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity onboarding: registration start, email verification,
//! credential management.

use std::str::FromStr;

use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{
    CodePurpose, Email, Identity, RegistrationKind, Role, validate_email, validate_name,
};
use ovation_persistence::Persistence;

use crate::codes::CodeIssuer;
use crate::collaborators::EmailDispatcher;
use crate::credential_policy::CredentialPolicy;
use crate::error::{
    ApiError, GENERIC_RESET_MESSAGE, translate_domain_error, translate_persistence_error,
};
use crate::pricing::Pricing;
use crate::request_response::{
    ForgotCredentialRequest, MessageResponse, ResetCredentialRequest, SetCredentialRequest,
    StartRegistrationRequest, StartRegistrationResponse, VerifyEmailRequest,
};

/// Persists an audit event for an identity-scoped action.
fn audit_identity_action(
    persistence: &mut Persistence,
    email: &Email,
    cause: Cause,
    name: &str,
    details: String,
    before: String,
    after: String,
) -> Result<(), ApiError> {
    let event: AuditEvent = AuditEvent::new(
        Actor::identity(email),
        cause,
        Action::new(name.to_string(), Some(details)),
        StateSnapshot::new(before),
        StateSnapshot::new(after),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;
    Ok(())
}

/// Starts a registration: creates an identity and a draft workflow,
/// then issues an email verification code.
///
/// Re-registration with the same email supersedes a stale unverified
/// identity; a verified identity conflicts.
///
/// # Errors
///
/// Returns an error if validation fails, the email belongs to a
/// verified identity, or persistence fails.
pub fn start_registration(
    persistence: &mut Persistence,
    dispatcher: &dyn EmailDispatcher,
    pricing: &Pricing,
    request: StartRegistrationRequest,
    cause: Cause,
) -> Result<StartRegistrationResponse, ApiError> {
    let email: Email = Email::new(&request.email);
    validate_email(&email).map_err(translate_domain_error)?;
    validate_name("First name", &request.first_name).map_err(translate_domain_error)?;
    validate_name("Last name", &request.last_name).map_err(translate_domain_error)?;

    let kind: RegistrationKind =
        RegistrationKind::from_str(&request.kind).map_err(translate_domain_error)?;

    // A bulk registration must match a named invitation in its pool.
    let invitation_id: Option<i64> = if kind == RegistrationKind::Bulk {
        let Some(pool_id) = request.bulk_registration_id else {
            return Err(ApiError::InvalidInput {
                field: String::from("bulk_registration_id"),
                message: String::from("Bulk registrations require a slot pool reference"),
            });
        };

        let participant = persistence
            .find_pool_participant(pool_id, &email)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("email"),
                message: format!("No invitation exists for '{email}' in pool {pool_id}"),
            })?;
        participant.participant_id
    } else {
        None
    };

    // A stale unverified identity is superseded; a verified one conflicts.
    if let Some(existing) = persistence
        .get_identity_by_email(&email)
        .map_err(translate_persistence_error)?
    {
        if existing.email_verified {
            return Err(ApiError::Conflict {
                rule: String::from("unique_email"),
                message: format!("An account already exists for '{email}'"),
            });
        }
        persistence
            .supersede_unverified_identity(&email)
            .map_err(translate_persistence_error)?;
    }

    let identity_id: i64 = persistence
        .create_identity(&email, &request.first_name, &request.last_name, Role::Contestant)
        .map_err(translate_persistence_error)?;

    let fee_amount: i64 = pricing.fee_for(kind);
    let registration_id: i64 = persistence
        .create_registration(identity_id, kind, fee_amount, request.bulk_registration_id)
        .map_err(translate_persistence_error)?;

    // A prepaid slot settles the bulk participant's fee up front, and
    // the invitation is linked to the identity it produced.
    if kind == RegistrationKind::Bulk {
        persistence
            .mark_fee_prepaid(registration_id)
            .map_err(translate_persistence_error)?;

        if let Some(participant_id) = invitation_id {
            persistence
                .link_participant(participant_id, identity_id, registration_id)
                .map_err(translate_persistence_error)?;
        }
    }

    CodeIssuer::issue(
        persistence,
        dispatcher,
        &email,
        CodePurpose::EmailVerification,
        CodeIssuer::DEFAULT_TTL_MINUTES,
    )?;

    audit_identity_action(
        persistence,
        &email,
        cause,
        "StartRegistration",
        format!("Started {kind} registration {registration_id} for '{email}'"),
        String::from("identity=absent"),
        format!("identity={identity_id},registration={registration_id},status=draft"),
    )?;

    Ok(StartRegistrationResponse {
        identity_id,
        registration_id,
        message: format!("Registration started; a verification code was sent to '{email}'"),
    })
}

/// Verifies an email with a one-time code, consuming the code.
///
/// # Errors
///
/// Returns the generic invalid-code error on any code failure.
pub fn verify_email(
    persistence: &mut Persistence,
    request: VerifyEmailRequest,
    cause: Cause,
) -> Result<MessageResponse, ApiError> {
    let email: Email = Email::new(&request.email);

    CodeIssuer::consume(persistence, &email, &request.code, CodePurpose::EmailVerification)?;

    persistence
        .mark_email_verified(&email)
        .map_err(translate_persistence_error)?;

    audit_identity_action(
        persistence,
        &email,
        cause,
        "VerifyEmail",
        format!("Verified email '{email}'"),
        String::from("email_verified=false"),
        String::from("email_verified=true"),
    )?;

    Ok(MessageResponse {
        message: String::from("Email verified"),
    })
}

/// Sets the account credential.
///
/// The code is peeked (not burned) for validation, so a policy failure
/// leaves it usable for a corrected retry; it is consumed only after
/// the credential is stored.
///
/// # Errors
///
/// Returns an error if the code is invalid or the credential violates
/// policy.
pub fn set_credential(
    persistence: &mut Persistence,
    policy: &CredentialPolicy,
    request: SetCredentialRequest,
    cause: Cause,
) -> Result<MessageResponse, ApiError> {
    let email: Email = Email::new(&request.email);

    let purpose: CodePurpose = CodeIssuer::detect_purpose(persistence, &email)?;
    CodeIssuer::peek(persistence, &email, &request.code, purpose)?;

    policy.validate(&request.credential, &request.confirmation, email.value())?;

    persistence
        .set_credential(&email, &request.credential)
        .map_err(translate_persistence_error)?;

    CodeIssuer::consume(persistence, &email, &request.code, purpose)?;

    audit_identity_action(
        persistence,
        &email,
        cause,
        "SetCredential",
        format!("Set credential for '{email}'"),
        String::from("credential_set=false"),
        String::from("credential_set=true"),
    )?;

    Ok(MessageResponse {
        message: String::from("Credential set"),
    })
}

/// Starts a credential reset.
///
/// Always answers with the same generic message so the response never
/// reveals whether an account exists. A reset code is issued only when
/// one does.
///
/// # Errors
///
/// Returns an error only on infrastructure failure, never on a missing
/// account.
pub fn forgot_credential(
    persistence: &mut Persistence,
    dispatcher: &dyn EmailDispatcher,
    request: ForgotCredentialRequest,
) -> Result<MessageResponse, ApiError> {
    let email: Email = Email::new(&request.email);

    let exists: Option<Identity> = persistence
        .get_identity_by_email(&email)
        .map_err(translate_persistence_error)?;

    if exists.is_some() {
        let purpose: CodePurpose = CodeIssuer::detect_purpose(persistence, &email)?;
        CodeIssuer::issue(
            persistence,
            dispatcher,
            &email,
            purpose,
            CodeIssuer::DEFAULT_TTL_MINUTES,
        )?;
    }

    Ok(MessageResponse {
        message: String::from(GENERIC_RESET_MESSAGE),
    })
}

/// Completes a credential reset.
///
/// # Errors
///
/// Returns an error if the code is invalid or the credential violates
/// policy.
pub fn reset_credential(
    persistence: &mut Persistence,
    policy: &CredentialPolicy,
    request: ResetCredentialRequest,
    cause: Cause,
) -> Result<MessageResponse, ApiError> {
    let email: Email = Email::new(&request.email);

    let purpose: CodePurpose = CodeIssuer::detect_purpose(persistence, &email)?;
    CodeIssuer::peek(persistence, &email, &request.code, purpose)?;

    policy.validate(&request.credential, &request.confirmation, email.value())?;

    persistence
        .set_credential(&email, &request.credential)
        .map_err(translate_persistence_error)?;

    CodeIssuer::consume(persistence, &email, &request.code, purpose)?;

    audit_identity_action(
        persistence,
        &email,
        cause,
        "ResetCredential",
        format!("Reset credential for '{email}'"),
        String::from("credential=previous"),
        String::from("credential=rotated"),
    )?;

    Ok(MessageResponse {
        message: String::from("Credential updated"),
    })
}
