// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket order queries.

use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::TicketOrderRow;
use crate::diesel_schema::ticket_orders;
use crate::error::PersistenceError;
use ovation_domain::{Email, TicketOrder, TicketStatus};

/// Maps a ticket order row to the domain type.
fn to_domain(row: TicketOrderRow) -> Result<TicketOrder, PersistenceError> {
    Ok(TicketOrder {
        order_id: Some(row.order_id),
        email: Email::new(&row.email),
        quantity: u32::try_from(row.quantity).map_err(|_| {
            PersistenceError::CorruptRow(format!("quantity {} out of range", row.quantity))
        })?,
        amount: row.amount,
        payment_reference: row.payment_reference,
        status: TicketStatus::from_str(&row.status)?,
        ticket_numbers: serde_json::from_str(&row.ticket_numbers)?,
    })
}

/// Retrieves a ticket order by its unique payment reference.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_ticket_order(
    conn: &mut SqliteConnection,
    payment_reference: &str,
) -> Result<Option<TicketOrder>, PersistenceError> {
    ticket_orders::table
        .filter(ticket_orders::payment_reference.eq(payment_reference))
        .first::<TicketOrderRow>(conn)
        .optional()?
        .map(to_domain)
        .transpose()
}
