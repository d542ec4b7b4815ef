// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment record mutations.
//!
//! The terminal transition here is the write-arbitration point for the
//! whole reconciler: it is conditioned on the record still being
//! non-terminal, so of N concurrent appliers of the same reference
//! exactly one observes an affected row and performs the fan-out.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::payment_records;
use crate::error::PersistenceError;
use ovation_domain::{PaymentStatus, SubjectType};

/// Statuses from which no further transition is permitted.
const TERMINAL_STATUSES: [&str; 3] = ["successful", "failed", "refunded"];

/// Creates a payment intent.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the reference is already
/// in use — references are caller-supplied and must be unique.
pub fn create_payment_record(
    conn: &mut SqliteConnection,
    reference: &str,
    amount: i64,
    currency: &str,
    subject_type: SubjectType,
    subject_id: i64,
    created_at: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(payment_records::table)
        .values((
            payment_records::reference.eq(reference),
            payment_records::amount.eq(amount),
            payment_records::currency.eq(currency),
            payment_records::status.eq(PaymentStatus::Pending.as_str()),
            payment_records::subject_type.eq(subject_type.as_str()),
            payment_records::subject_id.eq(subject_id),
            payment_records::created_at.eq(created_at),
        ))
        .execute(conn)?;

    info!(reference, subject = %subject_type, subject_id, "Payment intent created");
    Ok(())
}

/// Transitions a payment record to a terminal status.
///
/// Conditioned on the current status being non-terminal. Exactly one
/// concurrent applier of a reference wins; every other applier sees no
/// affected row and must skip the fan-out effect.
///
/// # Returns
///
/// `true` if this caller performed the transition.
///
/// # Errors
///
/// Returns an error if the database update fails. A missing reference
/// is indistinguishable from a lost race here; callers load the record
/// first and treat absence as an unknown reference.
pub fn mark_payment_terminal(
    conn: &mut SqliteConnection,
    reference: &str,
    new_status: PaymentStatus,
    processed_at: &str,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        payment_records::table
            .filter(payment_records::reference.eq(reference))
            .filter(payment_records::status.ne_all(TERMINAL_STATUSES)),
    )
    .set((
        payment_records::status.eq(new_status.as_str()),
        payment_records::processed_at.eq(processed_at),
    ))
    .execute(conn)?;

    if updated == 1 {
        info!(reference, status = %new_status, "Payment record transitioned");
    }
    Ok(updated == 1)
}
