// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Gateway payload normalization.
//!
//! Gateway webhooks and verification responses arrive in several shapes:
//! field names vary, statuses arrive as numbers or strings, and amounts
//! arrive as numbers or numeric strings. This module collapses all of
//! them into one tagged outcome before anything touches the reconciler.
//! Anything unrecognized is `Ambiguous` and is never applied.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status encodings accepted as success.
const SUCCESS_WORDS: &[&str] = &["successful", "success", "completed", "paid"];

/// Status encodings accepted as failure.
const FAILURE_WORDS: &[&str] = &["failed", "failure", "declined", "error"];

/// Which status conventions a gateway integration is allowed to use.
///
/// Some integrations encode success as numeric `0`, others as an
/// enumerated string, and nothing in the payload says which convention
/// the sender follows. The dialect is configured per integration, never
/// inferred from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GatewayDialect {
    /// Accept both numeric and textual status encodings.
    #[default]
    Lenient,
    /// Accept only numeric status encodings (0 success, 1 failure).
    NumericOnly,
    /// Accept only textual status encodings.
    TextOnly,
}

/// One entry of the optional webhook metadata array.
///
/// Metadata carries subject-specific routing hints such as
/// `type=vote_payment`, `contestantId`, and `votesPurchased`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    /// The hint's tag name.
    #[serde(rename = "insightTag")]
    pub insight_tag: String,
    /// The hint's value.
    #[serde(rename = "insightTagValue")]
    pub insight_tag_value: String,
}

/// The raw webhook/verification payload, tolerant of field-name variants.
///
/// This is the only place the heterogeneous shapes are acknowledged;
/// everything downstream sees a [`GatewayOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawGatewayPayload {
    /// The unique payment reference.
    #[serde(alias = "transRef", alias = "businessRef")]
    pub reference: String,
    /// The status value, numeric or textual.
    #[serde(alias = "transaction_status", alias = "paymentStatus")]
    pub status: Option<Value>,
    /// The observed amount, numeric or a numeric string.
    #[serde(alias = "transAmount")]
    pub amount: Option<Value>,
    /// Optional subject-specific routing hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Vec<MetadataItem>>,
}

impl RawGatewayPayload {
    /// Looks up a metadata hint by tag name.
    #[must_use]
    pub fn metadata_value(&self, tag: &str) -> Option<&str> {
        self.metadata
            .as_deref()?
            .iter()
            .find(|item| item.insight_tag == tag)
            .map(|item| item.insight_tag_value.as_str())
    }
}

/// The canonical outcome of a gateway payload.
///
/// Produced by [`normalize`]; the reconciler only ever sees this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// The gateway confirmed the payment.
    Success {
        /// The unique payment reference.
        reference: String,
        /// The observed amount in minor units, when the payload carried one.
        amount: Option<i64>,
    },
    /// The gateway reported a failed payment.
    Failure {
        /// The unique payment reference.
        reference: String,
        /// The raw status value, for the audit trail.
        reason: String,
    },
    /// The status was missing or unrecognized. Never applied.
    Ambiguous {
        /// The raw payload, held for manual review.
        raw: Value,
    },
}

impl GatewayOutcome {
    /// Returns the payment reference, when the outcome carries one.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Success { reference, .. } | Self::Failure { reference, .. } => Some(reference),
            Self::Ambiguous { .. } => None,
        }
    }
}

/// Interprets a raw status value under a dialect.
///
/// Returns `Some(true)` for success, `Some(false)` for failure, and
/// `None` for anything unrecognized.
fn interpret_status(status: &Value, dialect: GatewayDialect) -> Option<bool> {
    match status {
        Value::Number(n) if dialect != GatewayDialect::TextOnly => match n.as_i64()? {
            0 => Some(true),
            1 => Some(false),
            _ => None,
        },
        Value::String(s) => {
            let normalized: String = s.trim().to_lowercase();
            // Numeric statuses sometimes arrive stringified.
            if dialect != GatewayDialect::TextOnly {
                match normalized.as_str() {
                    "0" => return Some(true),
                    "1" => return Some(false),
                    _ => {}
                }
            }
            if dialect == GatewayDialect::NumericOnly {
                return None;
            }
            if SUCCESS_WORDS.contains(&normalized.as_str()) {
                Some(true)
            } else if FAILURE_WORDS.contains(&normalized.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Coerces an amount value to minor currency units.
///
/// Accepts a JSON integer, a JSON float with an integral value, or a
/// numeric string. Anything else yields `None`.
fn coerce_amount(amount: &Value) -> Option<i64> {
    match amount {
        Value::Number(n) => {
            if let Some(int) = n.as_i64() {
                Some(int)
            } else {
                let float: f64 = n.as_f64()?;
                if float.fract() == 0.0 {
                    float.to_i64()
                } else {
                    None
                }
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Normalizes a raw gateway payload into a canonical outcome.
///
/// Fail-closed: a missing or unrecognized status yields
/// [`GatewayOutcome::Ambiguous`], which the reconciler refuses to apply.
#[must_use]
pub fn normalize(payload: &RawGatewayPayload, dialect: GatewayDialect) -> GatewayOutcome {
    let ambiguous = || GatewayOutcome::Ambiguous {
        raw: serde_json::to_value(payload).unwrap_or(Value::Null),
    };

    let Some(status) = payload.status.as_ref() else {
        return ambiguous();
    };

    match interpret_status(status, dialect) {
        Some(true) => GatewayOutcome::Success {
            reference: payload.reference.clone(),
            amount: payload.amount.as_ref().and_then(coerce_amount),
        },
        Some(false) => GatewayOutcome::Failure {
            reference: payload.reference.clone(),
            reason: status.to_string(),
        },
        None => ambiguous(),
    }
}
