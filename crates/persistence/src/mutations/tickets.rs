// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket order mutations.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::ticket_orders;
use crate::error::PersistenceError;
use crate::sqlite;
use ovation_domain::{Email, TicketStatus};

/// Creates a ticket order pending settlement.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the payment reference is
/// already in use.
pub fn create_ticket_order(
    conn: &mut SqliteConnection,
    email: &Email,
    quantity: u32,
    amount: i64,
    payment_reference: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(ticket_orders::table)
        .values((
            ticket_orders::email.eq(email.value()),
            ticket_orders::quantity.eq(i32::try_from(quantity).unwrap_or(i32::MAX)),
            ticket_orders::amount.eq(amount),
            ticket_orders::payment_reference.eq(payment_reference),
            ticket_orders::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let order_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(order_id, email = %email, quantity, "Ticket order created");
    Ok(order_id)
}

/// Settles a ticket order from a reconciled payment outcome.
///
/// On success the order completes and the minted ticket numbers are
/// stored; on failure the order is marked failed with no tickets. The
/// flip is conditioned on the order still being `pending`.
///
/// # Returns
///
/// `true` if the order flipped.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no order exists for the
/// reference.
pub fn settle_ticket_order(
    conn: &mut SqliteConnection,
    payment_reference: &str,
    success: bool,
    ticket_numbers_json: &str,
) -> Result<bool, PersistenceError> {
    let exists: i64 = ticket_orders::table
        .filter(ticket_orders::payment_reference.eq(payment_reference))
        .count()
        .get_result(conn)?;
    if exists == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Ticket order for reference '{payment_reference}' not found"
        )));
    }

    let new_status: TicketStatus = if success {
        TicketStatus::Completed
    } else {
        TicketStatus::Failed
    };

    let flipped: usize = diesel::update(
        ticket_orders::table
            .filter(ticket_orders::payment_reference.eq(payment_reference))
            .filter(ticket_orders::status.eq(TicketStatus::Pending.as_str())),
    )
    .set((
        ticket_orders::status.eq(new_status.as_str()),
        ticket_orders::ticket_numbers.eq(if success { ticket_numbers_json } else { "[]" }),
    ))
    .execute(conn)?;

    if flipped == 1 {
        info!(payment_reference, success, "Ticket order settled");
    }
    Ok(flipped == 1)
}
