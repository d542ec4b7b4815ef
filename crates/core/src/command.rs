// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ovation_domain::RegistrationStatus;
use serde_json::Value;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request workflow state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowCommand {
    /// Merge a payload into one wizard step and mark it complete.
    UpdateStep {
        /// The step being updated (1..=8).
        step: u8,
        /// The partial payload to merge into the step's slot.
        payload: Value,
        /// Where the wizard should point next. When absent, the lowest
        /// not-yet-completed required step is derived.
        next_step: Option<u8>,
    },
    /// Submit the registration, locking it against further step edits.
    Submit {
        /// Submission timestamp (ISO 8601).
        submitted_at: String,
    },
    /// Move a submitted registration through the review lifecycle.
    Review {
        /// The requested status.
        target: RegistrationStatus,
    },
}
