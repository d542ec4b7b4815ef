// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote ledger mutations.
//!
//! The ledger is append-only: a vote record is created at intent time
//! and its status flips once when the payment reconciles. The
//! contestant's denormalized totals are incremented in the same
//! transaction as the flip, so the projection is never observably ahead
//! of or behind the ledger.

use diesel::prelude::*;
use tracing::info;

use crate::diesel_schema::{contestants, vote_records};
use crate::error::PersistenceError;
use crate::sqlite;
use ovation_domain::FeeStatus;

/// Creates a contestant.
///
/// # Errors
///
/// Returns an error if the database insert fails.
pub fn create_contestant(
    conn: &mut SqliteConnection,
    stage_name: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(contestants::table)
        .values((
            contestants::stage_name.eq(stage_name),
            contestants::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let contestant_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(contestant_id, stage_name, "Contestant created");
    Ok(contestant_id)
}

/// Records a vote purchase intent, pending settlement.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the payment reference is
/// already in use.
pub fn record_vote_intent(
    conn: &mut SqliteConnection,
    contestant_id: i64,
    number_of_votes: i64,
    amount_paid: i64,
    payment_reference: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(vote_records::table)
        .values((
            vote_records::contestant_id.eq(contestant_id),
            vote_records::number_of_votes.eq(number_of_votes),
            vote_records::amount_paid.eq(amount_paid),
            vote_records::payment_reference.eq(payment_reference),
            vote_records::created_at.eq(created_at),
        ))
        .execute(conn)?;

    let vote_id: i64 = sqlite::get_last_insert_rowid(conn)?;
    info!(
        vote_id,
        contestant_id, number_of_votes, payment_reference, "Vote intent recorded"
    );
    Ok(vote_id)
}

/// Settles a vote record from a reconciled payment outcome.
///
/// On success the record flips to `completed` and the contestant's
/// totals are incremented by the record's own votes and amount, in one
/// transaction. The flip is conditioned on the record still being
/// `pending`, so even if a caller reached this without winning the
/// payment record's transition, the totals could not be double-applied.
///
/// # Returns
///
/// `true` if the record flipped (and, on success, the totals moved).
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no vote record exists for
/// the reference.
pub fn settle_vote(
    conn: &mut SqliteConnection,
    payment_reference: &str,
    success: bool,
) -> Result<bool, PersistenceError> {
    conn.transaction::<bool, PersistenceError, _>(|conn| {
        let (vote_id, contestant_id, number_of_votes, amount_paid): (i64, i64, i64, i64) =
            vote_records::table
                .filter(vote_records::payment_reference.eq(payment_reference))
                .select((
                    vote_records::vote_id,
                    vote_records::contestant_id,
                    vote_records::number_of_votes,
                    vote_records::amount_paid,
                ))
                .first(conn)
                .map_err(|e| match e {
                    diesel::result::Error::NotFound => PersistenceError::NotFound(format!(
                        "Vote record for reference '{payment_reference}' not found"
                    )),
                    other => other.into(),
                })?;

        let new_status: FeeStatus = if success {
            FeeStatus::Completed
        } else {
            FeeStatus::Failed
        };

        let flipped: usize = diesel::update(
            vote_records::table
                .filter(vote_records::vote_id.eq(vote_id))
                .filter(vote_records::payment_status.eq(FeeStatus::Pending.as_str())),
        )
        .set(vote_records::payment_status.eq(new_status.as_str()))
        .execute(conn)?;

        if flipped == 0 {
            return Ok(false);
        }

        if success {
            diesel::update(contestants::table.filter(contestants::contestant_id.eq(contestant_id)))
                .set((
                    contestants::total_votes.eq(contestants::total_votes + number_of_votes),
                    contestants::total_vote_amount
                        .eq(contestants::total_vote_amount + amount_paid),
                ))
                .execute(conn)?;

            info!(
                vote_id,
                contestant_id, number_of_votes, "Votes credited to contestant"
            );
        }

        Ok(true)
    })
}
