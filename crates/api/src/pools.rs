// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot pool orchestration.

use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{Email, SlotPool, SubjectType, validate_email, validate_slot_count};
use ovation_persistence::{Persistence, PersistenceError};

use crate::collaborators::{EmailDispatcher, dispatch_invitation_quietly};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::pricing::Pricing;
use crate::request_response::{
    AddParticipantRequest, AddParticipantResponse, CreatePoolRequest, CreatePoolResponse,
};

/// Loads a pool or reports it missing.
fn load_pool(persistence: &mut Persistence, pool_id: i64) -> Result<SlotPool, ApiError> {
    persistence
        .get_pool(pool_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Slot pool"),
            message: format!("Slot pool {pool_id} does not exist"),
        })
}

/// Creates a slot pool and its payment intent.
///
/// The pool starts in `payment_pending`; it activates only through the
/// payment reconciler when the purchase settles.
///
/// # Errors
///
/// Returns an error if the slot count is out of range, the owner is
/// missing, or the reference is already in use.
pub fn create_pool(
    persistence: &mut Persistence,
    pricing: &Pricing,
    request: CreatePoolRequest,
    actor: Actor,
    cause: Cause,
) -> Result<CreatePoolResponse, ApiError> {
    validate_slot_count(request.total_slots).map_err(translate_domain_error)?;

    if persistence
        .get_identity_by_id(request.owner_identity_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Identity"),
            message: format!("Identity {} does not exist", request.owner_identity_id),
        });
    }

    let pool_id: i64 = persistence
        .create_pool(
            request.owner_identity_id,
            request.total_slots,
            pricing.price_per_slot,
        )
        .map_err(translate_persistence_error)?;

    let total_amount: i64 = pricing.price_per_slot * i64::from(request.total_slots);
    persistence
        .create_payment_record(
            &request.reference,
            total_amount,
            &pricing.currency,
            SubjectType::Bulk,
            pool_id,
        )
        .map_err(translate_persistence_error)?;
    persistence
        .set_pool_payment_reference(pool_id, &request.reference)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("CreateSlotPool"),
            Some(format!(
                "Created pool {pool_id} with {} slots for identity {}",
                request.total_slots, request.owner_identity_id
            )),
        ),
        StateSnapshot::new(String::from("pool=absent")),
        StateSnapshot::new(format!(
            "pool={pool_id},slots=0/{},status=payment_pending",
            request.total_slots
        )),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(CreatePoolResponse {
        pool_id,
        total_slots: request.total_slots,
        total_amount,
        reference: request.reference,
        status: String::from("payment_pending"),
    })
}

/// Adds a participant, consuming exactly one slot.
///
/// The conditional claim in the persistence layer arbitrates
/// concurrent adds; this handler maps a rejected claim onto the
/// domain's pool-not-active / pool-exhausted distinction and fires the
/// invitation side effect for the winner.
///
/// # Errors
///
/// Returns `pool_not_active` unless the pool is active, or
/// `pool_exhausted` when capacity is gone.
pub fn add_participant(
    persistence: &mut Persistence,
    dispatcher: &dyn EmailDispatcher,
    pool_id: i64,
    request: AddParticipantRequest,
    actor: Actor,
    cause: Cause,
) -> Result<AddParticipantResponse, ApiError> {
    let email: Email = Email::new(&request.email);
    validate_email(&email).map_err(translate_domain_error)?;

    let participant_id: i64 = match persistence.add_participant(
        pool_id,
        &email,
        &request.first_name,
        &request.last_name,
    ) {
        Ok(id) => id,
        Err(PersistenceError::SlotClaimRejected {
            status,
            used_slots,
            total_slots,
        }) => {
            // An active pool can only have been rejected for capacity.
            let err = if status == "active" || used_slots >= total_slots {
                ovation_domain::DomainError::PoolExhausted {
                    total_slots: u32::try_from(total_slots).unwrap_or(0),
                }
            } else {
                ovation_domain::DomainError::PoolNotActive { status }
            };
            return Err(translate_domain_error(err));
        }
        Err(other) => return Err(translate_persistence_error(other)),
    };

    dispatch_invitation_quietly(dispatcher, &email, pool_id);
    persistence
        .set_invitation_status(participant_id, ovation_domain::InvitationStatus::Sent)
        .map_err(translate_persistence_error)?;

    let pool: SlotPool = load_pool(persistence, pool_id)?;
    let event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("AddParticipant"),
            Some(format!("Added '{email}' to pool {pool_id}")),
        ),
        StateSnapshot::new(format!(
            "pool={pool_id},slots={}/{}",
            pool.used_slots - 1,
            pool.total_slots
        )),
        StateSnapshot::new(format!(
            "pool={pool_id},slots={}/{},status={}",
            pool.used_slots, pool.total_slots, pool.status
        )),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(AddParticipantResponse {
        participant_id,
        used_slots: pool.used_slots,
        remaining_slots: pool.remaining_slots(),
        pool_status: pool.status.as_str().to_string(),
    })
}

/// Retrieves a pool for display.
///
/// # Errors
///
/// Returns an error if the pool is missing.
pub fn get_pool(persistence: &mut Persistence, pool_id: i64) -> Result<SlotPool, ApiError> {
    load_pool(persistence, pool_id)
}
