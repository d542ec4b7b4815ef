// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step workflow rules for the registration wizard.
//!
//! The wizard is an ordered, resumable process over steps 1..=8. Which
//! steps are required depends on the registration kind. Completion is
//! **computed** from the completed-step set and the fee status, never
//! stored separately.

use crate::error::DomainError;
use crate::types::{FeeStatus, RegistrationKind, RegistrationStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The lowest step number in the wizard.
pub const MIN_STEP: u8 = 1;
/// The highest step number in the wizard (fee settlement).
pub const MAX_STEP: u8 = 8;

/// Required steps for an individual registration.
///
/// Step 3 (group info) is skipped; step 4 (guardian) is required.
const INDIVIDUAL_REQUIRED_STEPS: &[u8] = &[1, 2, 4, 5, 6, 7, 8];

/// Required steps for a group registration.
///
/// Step 4 (guardian) is skipped; step 3 (group info) is required.
const GROUP_REQUIRED_STEPS: &[u8] = &[1, 2, 3, 5, 6, 7, 8];

/// Returns the human-readable name of a step.
#[must_use]
pub const fn step_name(step: u8) -> &'static str {
    match step {
        1 => "personal",
        2 => "talent",
        3 => "group",
        4 => "guardian",
        5 => "media",
        6 => "audition",
        7 => "terms",
        8 => "payment",
        _ => "unknown",
    }
}

/// Returns the required step set for a registration kind.
///
/// Bulk registrations are created from a slot pool invitation and reuse
/// the individual step set.
#[must_use]
pub const fn required_steps(kind: RegistrationKind) -> &'static [u8] {
    match kind {
        RegistrationKind::Individual | RegistrationKind::Bulk => INDIVIDUAL_REQUIRED_STEPS,
        RegistrationKind::Group => GROUP_REQUIRED_STEPS,
    }
}

/// Validates that a step number is within the wizard range.
///
/// # Errors
///
/// Returns `DomainError::InvalidStep` if the step is outside 1..=8.
pub const fn validate_step_number(step: u8) -> Result<(), DomainError> {
    if step >= MIN_STEP && step <= MAX_STEP {
        Ok(())
    } else {
        Err(DomainError::InvalidStep { step })
    }
}

/// Reads a non-empty string field from a JSON payload.
fn string_field<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Validates the conditional field rules for a step payload.
///
/// Rules are enforced before a step is marked complete, so a completed
/// step always satisfies them:
/// - personal requires a date of birth
/// - talent with category "Other" requires a free-text category
/// - talent with `previously_participated` "Yes" requires the prior
///   competition's name
/// - group requires a group name
/// - guardian requires the guardian's name
/// - media requires at least one stored media URL
/// - terms requires an explicit acceptance
///
/// # Errors
///
/// Returns `DomainError::StepValidationError` naming the missing field,
/// or `DomainError::InvalidStep` for an out-of-range step.
pub fn validate_step_payload(step: u8, payload: &Value) -> Result<(), DomainError> {
    validate_step_number(step)?;

    let missing = |field: &str| DomainError::StepValidationError {
        step,
        field: field.to_string(),
    };

    match step {
        1 => {
            if string_field(payload, "date_of_birth").is_none() {
                return Err(missing("date_of_birth"));
            }
        }
        2 => {
            let category: &str = string_field(payload, "category").ok_or_else(|| missing("category"))?;
            if category.eq_ignore_ascii_case("other")
                && string_field(payload, "other_category").is_none()
            {
                return Err(missing("other_category"));
            }
            if let Some(participated) = string_field(payload, "previously_participated")
                && participated.eq_ignore_ascii_case("yes")
                && string_field(payload, "previous_competition").is_none()
            {
                return Err(missing("previous_competition"));
            }
        }
        3 => {
            if string_field(payload, "group_name").is_none() {
                return Err(missing("group_name"));
            }
        }
        4 => {
            if string_field(payload, "guardian_name").is_none() {
                return Err(missing("guardian_name"));
            }
        }
        5 => {
            let has_media: bool = payload
                .get("media_urls")
                .and_then(Value::as_array)
                .is_some_and(|urls| !urls.is_empty())
                || string_field(payload, "media_url").is_some();
            if !has_media {
                return Err(missing("media_url"));
            }
        }
        7 => {
            if payload.get("accepted").and_then(Value::as_bool) != Some(true) {
                return Err(missing("accepted"));
            }
        }
        // Audition preferences and the payment step carry no conditional rules.
        _ => {}
    }

    Ok(())
}

/// Returns the required steps not yet present in the completed set.
#[must_use]
pub fn missing_steps(kind: RegistrationKind, completed: &[u8]) -> Vec<u8> {
    required_steps(kind)
        .iter()
        .copied()
        .filter(|step| !completed.contains(step))
        .collect()
}

/// Derives the next actionable step: the lowest required step not yet
/// completed, or `None` when every required step is done.
#[must_use]
pub fn next_required_step(kind: RegistrationKind, completed: &[u8]) -> Option<u8> {
    required_steps(kind)
        .iter()
        .copied()
        .find(|step| !completed.contains(step))
}

/// Per-step payload slots of a registration.
///
/// Each slot is an independent sub-document; concurrent edits to
/// different steps never conflict.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepPayloads {
    /// Step 1: personal details.
    pub personal: Option<Value>,
    /// Step 2: talent details.
    pub talent: Option<Value>,
    /// Step 3: group details (group registrations only).
    pub group: Option<Value>,
    /// Step 4: guardian details (individual registrations only).
    pub guardian: Option<Value>,
    /// Step 5: media uploads.
    pub media: Option<Value>,
    /// Step 6: audition preferences.
    pub audition: Option<Value>,
    /// Step 7: terms acceptance.
    pub terms: Option<Value>,
}

impl StepPayloads {
    /// Returns the payload slot for a step, if any is stored.
    #[must_use]
    pub const fn slot(&self, step: u8) -> Option<&Value> {
        match step {
            1 => self.personal.as_ref(),
            2 => self.talent.as_ref(),
            3 => self.group.as_ref(),
            4 => self.guardian.as_ref(),
            5 => self.media.as_ref(),
            6 => self.audition.as_ref(),
            7 => self.terms.as_ref(),
            _ => None,
        }
    }

    /// Merges a payload into a step's slot.
    ///
    /// Object payloads merge field-by-field, last write wins per field.
    /// Non-object payloads replace the slot wholesale. Step 8 has no
    /// payload slot; merging into it is a no-op.
    pub fn merge(&mut self, step: u8, payload: Value) {
        let slot: &mut Option<Value> = match step {
            1 => &mut self.personal,
            2 => &mut self.talent,
            3 => &mut self.group,
            4 => &mut self.guardian,
            5 => &mut self.media,
            6 => &mut self.audition,
            7 => &mut self.terms,
            _ => return,
        };

        match (slot.as_mut(), payload) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                for (key, value) in incoming {
                    existing.insert(key, value);
                }
            }
            (_, payload) => *slot = Some(payload),
        }
    }
}

/// Fee settlement info attached to a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    /// The fee amount in minor currency units.
    pub amount: i64,
    /// Settlement state.
    pub status: FeeStatus,
    /// The payment reference backing the fee, once initiated.
    pub reference: Option<String>,
}

impl FeeInfo {
    /// Creates pending fee info for a given amount.
    #[must_use]
    pub const fn pending(amount: i64) -> Self {
        Self {
            amount,
            status: FeeStatus::Pending,
            reference: None,
        }
    }
}

/// A registration workflow and its wizard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Canonical internal identifier.
    pub registration_id: i64,
    /// The identity that owns this registration.
    pub owner_identity_id: i64,
    /// The workflow shape.
    pub kind: RegistrationKind,
    /// The step the wizard currently points at.
    pub current_step: u8,
    /// Steps marked complete, in ascending order.
    pub completed_steps: Vec<u8>,
    /// Per-step payloads.
    pub payloads: StepPayloads,
    /// The registration's lifecycle status.
    pub status: RegistrationStatus,
    /// Fee settlement info.
    pub fee: FeeInfo,
    /// The slot pool this registration consumes, for bulk kinds.
    pub bulk_registration_id: Option<i64>,
    /// When the registration was submitted (ISO 8601).
    pub submitted_at: Option<String>,
}

impl Registration {
    /// Records a step as complete, keeping the set sorted and deduplicated.
    pub fn record_step_completion(&mut self, step: u8) {
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
            self.completed_steps.sort_unstable();
        }
    }

    /// Checks the full submission invariant.
    ///
    /// A registration may be submitted only when every required step for
    /// its kind is complete and the fee has settled.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::WorkflowIncomplete` enumerating the missing
    /// steps and whether the fee is outstanding.
    pub fn evaluate_submission(&self) -> Result<(), DomainError> {
        let mut unmet: Vec<u8> = missing_steps(self.kind, &self.completed_steps);
        let payment_missing: bool = self.fee.status != FeeStatus::Completed;

        // Step 8 is the fee itself; reporting it alongside the explicit
        // payment flag would double-count the same gap.
        if payment_missing {
            unmet.retain(|step| *step != MAX_STEP);
        }

        if unmet.is_empty() && !payment_missing {
            Ok(())
        } else {
            Err(DomainError::WorkflowIncomplete {
                missing_steps: unmet,
                payment_missing,
            })
        }
    }
}
