// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod gateway;
mod steps;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use gateway::{
    GatewayDialect, GatewayOutcome, MetadataItem, RawGatewayPayload, normalize,
};
pub use steps::{
    FeeInfo, MAX_STEP, MIN_STEP, Registration, StepPayloads, missing_steps, next_required_step,
    required_steps, step_name, validate_step_number, validate_step_payload,
};
pub use types::{
    CodePurpose, Contestant, Email, FeeStatus, Identity, InvitationStatus, PaymentRecord,
    PaymentStatus, PoolParticipant, PoolStatus, RegistrationKind, RegistrationStatus, Role,
    SlotPool, SubjectType, TicketOrder, TicketStatus, VoteRecord,
};
pub use validation::{
    CODE_LENGTH, MAX_POOL_SLOTS, MIN_POOL_SLOTS, validate_code_format, validate_email,
    validate_name, validate_slot_count, validate_ticket_quantity, validate_vote_purchase,
};
