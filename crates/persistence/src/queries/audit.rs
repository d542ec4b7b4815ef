// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;

use crate::data_models::{ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;
use ovation_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};

/// Deserializes an audit event row.
fn to_domain(row: &AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause: CauseData = serde_json::from_str(&row.cause_json)?;
    let action: ActionData = serde_json::from_str(&row.action_json)?;
    let before: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    Ok(AuditEvent::new(
        Actor::new(actor.id, actor.actor_type),
        Cause::new(cause.id, cause.description),
        Action::new(action.name, action.details),
        StateSnapshot::new(before.data),
        StateSnapshot::new(after.data),
    ))
}

/// Retrieves the full ordered audit timeline.
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &mut SqliteConnection,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    audit_events::table
        .order(audit_events::event_id.asc())
        .load::<AuditEventRow>(conn)?
        .iter()
        .map(to_domain)
        .collect()
}

/// Retrieves audit events whose cause matches an identifier.
///
/// Payment applications use the payment reference as the cause id, so
/// this is how an operator traces every delivery of one reference.
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_events_by_cause(
    conn: &mut SqliteConnection,
    cause_id: &str,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    Ok(get_audit_timeline(conn)?
        .into_iter()
        .filter(|event| event.cause.id == cause_id)
        .collect())
}
