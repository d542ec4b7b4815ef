// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Ovation talent platform.
//!
//! Handlers here orchestrate the pure core transitions against the
//! persistence layer, translate every inner error into the [`ApiError`]
//! taxonomy, and persist one audit event per successful state change.
//! Nothing in this crate touches HTTP; the server crate maps these
//! functions onto routes and status codes.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod codes;
mod collaborators;
mod credential_policy;
mod error;
mod geo;
mod identity;
mod payments;
mod pools;
mod pricing;
mod request_response;
mod tickets;
mod votes;
mod workflow;

#[cfg(test)]
mod tests;

pub use codes::{CodeIssuer, IssuedCode};
pub use collaborators::{
    EmailDispatcher, InMemoryMediaStore, LoggingEmailDispatcher, MediaStore,
    dispatch_code_quietly, dispatch_invitation_quietly,
};
pub use credential_policy::{CredentialPolicy, CredentialPolicyError};
pub use error::{
    ApiError, GENERIC_CODE_MESSAGE, GENERIC_RESET_MESSAGE, translate_core_error,
    translate_domain_error, translate_persistence_error,
};
pub use geo::{GeoCache, GeoSource};
pub use identity::{
    forgot_credential, reset_credential, set_credential, start_registration, verify_email,
};
pub use payments::{apply_gateway_payload, apply_outcome, get_payment_status};
pub use pools::{add_participant, create_pool, get_pool};
pub use pricing::Pricing;
pub use request_response::{
    AddParticipantRequest, AddParticipantResponse, ContestantVotesResponse, CreatePoolRequest,
    CreatePoolResponse, ForgotCredentialRequest, InitiateFeeRequest, MessageResponse,
    PaymentApplicationResponse, PaymentIntentResponse, ResetCredentialRequest,
    SetCredentialRequest, StartRegistrationRequest, StartRegistrationResponse,
    SubmitRegistrationResponse, TicketOrderRequest, TicketOrderResponse, UpdateStepRequest,
    UpdateStepResponse, VerifyEmailRequest, VoteIntentRequest, VoteRecordInfo,
};
pub use tickets::{get_ticket_order, order_tickets};
pub use votes::{get_contestant_votes, record_vote_intent};
pub use workflow::{
    initiate_fee_payment, review_registration, submit_registration, update_step,
    upload_step_media,
};
