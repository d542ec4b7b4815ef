// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote ledger queries.
//!
//! Totals only ever come from `completed` records; pending and failed
//! records remain visible for audit but never count.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use std::str::FromStr;

use crate::data_models::{ContestantRow, VoteRecordRow};
use crate::diesel_schema::{contestants, vote_records};
use crate::error::PersistenceError;
use ovation_domain::{Contestant, FeeStatus, VoteRecord};

/// Maps a vote record row to the domain type.
fn vote_to_domain(row: VoteRecordRow) -> Result<VoteRecord, PersistenceError> {
    Ok(VoteRecord {
        vote_id: Some(row.vote_id),
        contestant_id: row.contestant_id,
        number_of_votes: row.number_of_votes,
        amount_paid: row.amount_paid,
        payment_reference: row.payment_reference,
        payment_status: FeeStatus::from_str(&row.payment_status)?,
    })
}

/// Retrieves a contestant with its denormalized totals.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_contestant(
    conn: &mut SqliteConnection,
    contestant_id: i64,
) -> Result<Option<Contestant>, PersistenceError> {
    Ok(contestants::table
        .filter(contestants::contestant_id.eq(contestant_id))
        .first::<ContestantRow>(conn)
        .optional()?
        .map(|row| Contestant {
            contestant_id: row.contestant_id,
            stage_name: row.stage_name,
            total_votes: row.total_votes,
            total_vote_amount: row.total_vote_amount,
        }))
}

/// Lists a contestant's vote records, newest first.
///
/// All records are returned, including pending and failed ones, for
/// audit visibility.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_contestant_votes(
    conn: &mut SqliteConnection,
    contestant_id: i64,
) -> Result<Vec<VoteRecord>, PersistenceError> {
    vote_records::table
        .filter(vote_records::contestant_id.eq(contestant_id))
        .order(vote_records::vote_id.desc())
        .load::<VoteRecordRow>(conn)?
        .into_iter()
        .map(vote_to_domain)
        .collect()
}

/// Retrieves a vote record by its unique payment reference.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_vote_by_reference(
    conn: &mut SqliteConnection,
    payment_reference: &str,
) -> Result<Option<VoteRecord>, PersistenceError> {
    vote_records::table
        .filter(vote_records::payment_reference.eq(payment_reference))
        .first::<VoteRecordRow>(conn)
        .optional()?
        .map(vote_to_domain)
        .transpose()
}

/// Sums completed votes for a contestant directly from the ledger.
///
/// The result must always equal the contestant's denormalized
/// `total_votes`; the consistency tests assert exactly that.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn sum_completed_votes(
    conn: &mut SqliteConnection,
    contestant_id: i64,
) -> Result<i64, PersistenceError> {
    let total: Option<i64> = vote_records::table
        .filter(vote_records::contestant_id.eq(contestant_id))
        .filter(vote_records::payment_status.eq(FeeStatus::Completed.as_str()))
        .select(sql::<Nullable<BigInt>>("SUM(number_of_votes)"))
        .get_result(conn)?;

    Ok(total.unwrap_or(0))
}
