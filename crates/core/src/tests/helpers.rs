// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use ovation_audit::{Actor, Cause};
use ovation_domain::{
    FeeInfo, PaymentRecord, PaymentStatus, Registration, RegistrationKind, RegistrationStatus,
    StepPayloads, SubjectType,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("jane@example.com"), String::from("identity"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-123"), String::from("API request"))
}

pub fn create_draft_registration(kind: RegistrationKind) -> Registration {
    Registration {
        registration_id: 1,
        owner_identity_id: 10,
        kind,
        current_step: 1,
        completed_steps: Vec::new(),
        payloads: StepPayloads::default(),
        status: RegistrationStatus::Draft,
        fee: FeeInfo::pending(50_000),
        bulk_registration_id: None,
        submitted_at: None,
    }
}

pub fn create_payment_record(
    reference: &str,
    status: PaymentStatus,
    subject_type: SubjectType,
    subject_id: i64,
) -> PaymentRecord {
    PaymentRecord {
        reference: reference.to_string(),
        amount: 50_000,
        currency: String::from("NGN"),
        status,
        subject_type,
        subject_id,
        processed_at: None,
    }
}
