// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment record queries.

use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::PaymentRecordRow;
use crate::diesel_schema::payment_records;
use crate::error::PersistenceError;
use ovation_domain::{PaymentRecord, PaymentStatus, SubjectType};

/// Maps a payment record row to the domain type.
fn to_domain(row: PaymentRecordRow) -> Result<PaymentRecord, PersistenceError> {
    Ok(PaymentRecord {
        reference: row.reference,
        amount: row.amount,
        currency: row.currency,
        status: PaymentStatus::from_str(&row.status)?,
        subject_type: SubjectType::from_str(&row.subject_type)?,
        subject_id: row.subject_id,
        processed_at: row.processed_at,
    })
}

/// Retrieves a payment record by its unique reference.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_payment_record(
    conn: &mut SqliteConnection,
    reference: &str,
) -> Result<Option<PaymentRecord>, PersistenceError> {
    payment_records::table
        .filter(payment_records::reference.eq(reference))
        .first::<PaymentRecordRow>(conn)
        .optional()?
        .map(to_domain)
        .transpose()
}

/// Lists payment records that are still non-terminal.
///
/// Operators use this to find intents held pending by ambiguous
/// gateway statuses.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn list_pending_payments(
    conn: &mut SqliteConnection,
) -> Result<Vec<PaymentRecord>, PersistenceError> {
    payment_records::table
        .filter(payment_records::status.eq_any([
            PaymentStatus::Initiated.as_str(),
            PaymentStatus::Pending.as_str(),
            PaymentStatus::Cancelled.as_str(),
        ]))
        .order(payment_records::payment_id.asc())
        .load::<PaymentRecordRow>(conn)?
        .into_iter()
        .map(to_domain)
        .collect()
}
