// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote ledger orchestration.

use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{Contestant, SubjectType, validate_vote_purchase};
use ovation_persistence::Persistence;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::pricing::Pricing;
use crate::request_response::{
    ContestantVotesResponse, PaymentIntentResponse, VoteIntentRequest, VoteRecordInfo,
};

/// Loads a contestant or reports it missing.
fn load_contestant(
    persistence: &mut Persistence,
    contestant_id: i64,
) -> Result<Contestant, ApiError> {
    persistence
        .get_contestant(contestant_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Contestant"),
            message: format!("Contestant {contestant_id} does not exist"),
        })
}

/// Records a vote purchase intent before the payer is redirected.
///
/// Creates the payment record and the pending vote record under the
/// same unique reference; credit happens only through the reconciler.
///
/// # Errors
///
/// Returns an error if the purchase is malformed, the contestant is
/// missing, or the reference is already in use.
pub fn record_vote_intent(
    persistence: &mut Persistence,
    pricing: &Pricing,
    request: VoteIntentRequest,
    actor: Actor,
    cause: Cause,
) -> Result<PaymentIntentResponse, ApiError> {
    validate_vote_purchase(request.number_of_votes, request.amount_paid)
        .map_err(translate_domain_error)?;
    load_contestant(persistence, request.contestant_id)?;

    persistence
        .create_payment_record(
            &request.reference,
            request.amount_paid,
            &pricing.currency,
            SubjectType::Vote,
            request.contestant_id,
        )
        .map_err(translate_persistence_error)?;
    persistence
        .record_vote_intent(
            request.contestant_id,
            request.number_of_votes,
            request.amount_paid,
            &request.reference,
        )
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("RecordVoteIntent"),
            Some(format!(
                "Recorded intent for {} votes on contestant {} under reference {}",
                request.number_of_votes, request.contestant_id, request.reference
            )),
        ),
        StateSnapshot::new(format!("reference={},state=absent", request.reference)),
        StateSnapshot::new(format!("reference={},state=pending", request.reference)),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(PaymentIntentResponse {
        reference: request.reference,
        amount: request.amount_paid,
        currency: pricing.currency.clone(),
    })
}

/// Returns a contestant's tally and full ledger.
///
/// Totals come from the denormalized projection, which the reconciler
/// keeps equal to the completed-record sum; pending and failed records
/// are listed for audit but never counted.
///
/// # Errors
///
/// Returns an error if the contestant is missing.
pub fn get_contestant_votes(
    persistence: &mut Persistence,
    contestant_id: i64,
) -> Result<ContestantVotesResponse, ApiError> {
    let contestant: Contestant = load_contestant(persistence, contestant_id)?;

    let records: Vec<VoteRecordInfo> = persistence
        .get_contestant_votes(contestant_id)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(|record| VoteRecordInfo {
            number_of_votes: record.number_of_votes,
            amount_paid: record.amount_paid,
            payment_reference: record.payment_reference,
            payment_status: record.payment_status.as_str().to_string(),
        })
        .collect();

    Ok(ContestantVotesResponse {
        contestant_id: contestant.contestant_id,
        stage_name: contestant.stage_name,
        total_votes: contestant.total_votes,
        total_vote_amount: contestant.total_vote_amount,
        records,
    })
}
