// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use ovation_audit::{Actor, Cause};
use ovation_domain::RawGatewayPayload;
use ovation_persistence::Persistence;
use serde_json::json;

use crate::{
    LoggingEmailDispatcher, Pricing, StartRegistrationRequest, StartRegistrationResponse,
    start_registration,
};

pub fn new_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("test@example.com"), String::from("identity"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn test_pricing() -> Pricing {
    Pricing::default()
}

/// Starts an individual registration for `<local>@example.com`.
pub fn start_test_registration(
    persistence: &mut Persistence,
    local: &str,
) -> StartRegistrationResponse {
    start_registration(
        persistence,
        &LoggingEmailDispatcher,
        &test_pricing(),
        StartRegistrationRequest {
            email: format!("{local}@example.com"),
            first_name: String::from("Test"),
            last_name: String::from("Registrant"),
            kind: String::from("individual"),
            bulk_registration_id: None,
        },
        create_test_cause(),
    )
    .expect("Failed to start registration")
}

/// A successful webhook payload for a reference.
pub fn success_payload(reference: &str, amount: i64) -> RawGatewayPayload {
    serde_json::from_value(json!({
        "reference": reference,
        "status": "successful",
        "amount": amount,
    }))
    .expect("payload should deserialize")
}

/// A failed webhook payload for a reference.
pub fn failure_payload(reference: &str) -> RawGatewayPayload {
    serde_json::from_value(json!({
        "reference": reference,
        "status": "failed",
    }))
    .expect("payload should deserialize")
}
