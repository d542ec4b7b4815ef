// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::Persistence;
use ovation_domain::{Email, Role};

pub fn new_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn test_email(local: &str) -> Email {
    Email::new(&format!("{local}@example.com"))
}

pub fn create_test_identity(persistence: &mut Persistence, local: &str) -> i64 {
    persistence
        .create_identity(&test_email(local), "Test", "Identity", Role::Contestant)
        .expect("Failed to create identity")
}

/// An expiry comfortably in the future relative to `now_iso8601`.
pub fn future_expiry() -> String {
    let expires = time::OffsetDateTime::now_utc() + time::Duration::minutes(15);
    expires
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .expect("Failed to format expiry")
}

/// An expiry already in the past.
pub fn past_expiry() -> String {
    let expires = time::OffsetDateTime::now_utc() - time::Duration::minutes(15);
    expires
        .format(&time::format_description::well_known::Iso8601::DEFAULT)
        .expect("Failed to format expiry")
}
