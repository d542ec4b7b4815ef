// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Registration workflow queries.

use diesel::prelude::*;
use std::str::FromStr;

use crate::data_models::RegistrationRow;
use crate::diesel_schema::registrations;
use crate::error::PersistenceError;
use ovation_domain::{
    FeeInfo, FeeStatus, Registration, RegistrationKind, RegistrationStatus, StepPayloads,
};

/// Parses an optional JSON payload column.
fn parse_slot(column: Option<String>) -> Result<Option<serde_json::Value>, PersistenceError> {
    column
        .map(|json| serde_json::from_str(&json))
        .transpose()
        .map_err(Into::into)
}

/// Maps a registration row to the domain type.
fn to_domain(row: RegistrationRow) -> Result<Registration, PersistenceError> {
    let completed_steps: Vec<u8> = serde_json::from_str(&row.completed_steps)?;

    Ok(Registration {
        registration_id: row.registration_id,
        owner_identity_id: row.owner_identity_id,
        kind: RegistrationKind::from_str(&row.kind)?,
        current_step: u8::try_from(row.current_step)
            .map_err(|_| PersistenceError::CorruptRow(format!(
                "current_step {} out of range",
                row.current_step
            )))?,
        completed_steps,
        payloads: StepPayloads {
            personal: parse_slot(row.personal_json)?,
            talent: parse_slot(row.talent_json)?,
            group: parse_slot(row.group_json)?,
            guardian: parse_slot(row.guardian_json)?,
            media: parse_slot(row.media_json)?,
            audition: parse_slot(row.audition_json)?,
            terms: parse_slot(row.terms_json)?,
        },
        status: RegistrationStatus::from_str(&row.status)?,
        fee: FeeInfo {
            amount: row.fee_amount,
            status: FeeStatus::from_str(&row.fee_status)?,
            reference: row.fee_reference,
        },
        bulk_registration_id: row.bulk_registration_id,
        submitted_at: row.submitted_at,
    })
}

/// Retrieves a registration by its canonical ID.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored column is
/// unmappable.
pub fn get_registration(
    conn: &mut SqliteConnection,
    registration_id: i64,
) -> Result<Option<Registration>, PersistenceError> {
    registrations::table
        .filter(registrations::registration_id.eq(registration_id))
        .first::<RegistrationRow>(conn)
        .optional()?
        .map(to_domain)
        .transpose()
}
