// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket order orchestration.

use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use ovation_domain::{Email, SubjectType, validate_email, validate_ticket_quantity};
use ovation_persistence::Persistence;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::pricing::Pricing;
use crate::request_response::{TicketOrderRequest, TicketOrderResponse};

/// Creates a ticket order and its payment intent.
///
/// Ticket numbers are minted by the reconciler when the payment
/// settles; until then the order is pending with none.
///
/// # Errors
///
/// Returns an error if the order is malformed or the reference is
/// already in use.
pub fn order_tickets(
    persistence: &mut Persistence,
    pricing: &Pricing,
    request: TicketOrderRequest,
    actor: Actor,
    cause: Cause,
) -> Result<TicketOrderResponse, ApiError> {
    let email: Email = Email::new(&request.email);
    validate_email(&email).map_err(translate_domain_error)?;
    validate_ticket_quantity(request.quantity).map_err(translate_domain_error)?;

    let amount: i64 = pricing.ticket_price * i64::from(request.quantity);

    let order_id: i64 = persistence
        .create_ticket_order(&email, request.quantity, amount, &request.reference)
        .map_err(translate_persistence_error)?;
    persistence
        .create_payment_record(
            &request.reference,
            amount,
            &pricing.currency,
            SubjectType::Ticket,
            order_id,
        )
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(
            String::from("OrderTickets"),
            Some(format!(
                "Ordered {} tickets for '{email}' under reference {}",
                request.quantity, request.reference
            )),
        ),
        StateSnapshot::new(format!("reference={},state=absent", request.reference)),
        StateSnapshot::new(format!("reference={},state=pending", request.reference)),
    );
    persistence
        .persist_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(TicketOrderResponse {
        order_id,
        reference: request.reference,
        amount,
        status: String::from("pending"),
        ticket_numbers: Vec::new(),
    })
}

/// Retrieves a ticket order by its payment reference.
///
/// # Errors
///
/// Returns an error if the order is missing.
pub fn get_ticket_order(
    persistence: &mut Persistence,
    reference: &str,
) -> Result<TicketOrderResponse, ApiError> {
    let order = persistence
        .get_ticket_order(reference)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Ticket order"),
            message: format!("No ticket order exists for reference '{reference}'"),
        })?;

    Ok(TicketOrderResponse {
        order_id: order.order_id.unwrap_or_default(),
        reference: order.payment_reference,
        amount: order.amount,
        status: order.status.as_str().to_string(),
        ticket_numbers: order.ticket_numbers,
    })
}
