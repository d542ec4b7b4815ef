// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborator interfaces consumed by the API layer.
//!
//! Both collaborators are thin I/O boundaries. Email dispatch is
//! fire-and-forget: a delivery failure is logged and never propagated
//! to the caller's success response. Media storage is the opposite: a
//! storage failure aborts the media step update it was part of.

use ovation_domain::{CodePurpose, Email};
use tracing::warn;

/// Outbound email dispatch.
pub trait EmailDispatcher {
    /// Sends a verification code to an address.
    ///
    /// # Errors
    ///
    /// Returns a description of the delivery failure. Callers log this
    /// and continue; they never surface it.
    fn send_code(&self, email: &Email, code: &str, purpose: CodePurpose) -> Result<(), String>;

    /// Sends a slot pool invitation to a participant.
    ///
    /// # Errors
    ///
    /// Returns a description of the delivery failure.
    fn send_invitation(&self, email: &Email, pool_id: i64) -> Result<(), String>;
}

/// Dispatches a code, logging any failure instead of propagating it.
pub fn dispatch_code_quietly(
    dispatcher: &dyn EmailDispatcher,
    email: &Email,
    code: &str,
    purpose: CodePurpose,
) {
    if let Err(reason) = dispatcher.send_code(email, code, purpose) {
        warn!(email = %email, purpose = %purpose, %reason, "Code email dispatch failed");
    }
}

/// Dispatches an invitation, logging any failure instead of propagating it.
pub fn dispatch_invitation_quietly(dispatcher: &dyn EmailDispatcher, email: &Email, pool_id: i64) {
    if let Err(reason) = dispatcher.send_invitation(email, pool_id) {
        warn!(email = %email, pool_id, %reason, "Invitation email dispatch failed");
    }
}

/// An email dispatcher that only logs.
///
/// The default for the server binary until an SMTP transport is
/// configured, and the standard dispatcher for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEmailDispatcher;

impl EmailDispatcher for LoggingEmailDispatcher {
    fn send_code(&self, email: &Email, _code: &str, purpose: CodePurpose) -> Result<(), String> {
        tracing::info!(email = %email, purpose = %purpose, "Would send verification code");
        Ok(())
    }

    fn send_invitation(&self, email: &Email, pool_id: i64) -> Result<(), String> {
        tracing::info!(email = %email, pool_id, "Would send pool invitation");
        Ok(())
    }
}

/// Durable media storage.
pub trait MediaStore {
    /// Stores a media blob and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns a description of the storage failure. Unlike email
    /// dispatch, this failure aborts the step update that needed the URL.
    fn store(&self, bytes: &[u8]) -> Result<String, String>;
}

/// A deterministic in-memory media store for tests and local runs.
///
/// URLs are derived from a simple content checksum so repeated stores
/// of the same bytes are stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryMediaStore;

impl MediaStore for InMemoryMediaStore {
    fn store(&self, bytes: &[u8]) -> Result<String, String> {
        if bytes.is_empty() {
            return Err(String::from("Refusing to store an empty media blob"));
        }

        let checksum: u64 = bytes
            .iter()
            .fold(0_u64, |acc, b| acc.wrapping_mul(31).wrapping_add(u64::from(*b)));
        Ok(format!("memory://media/{checksum:016x}"))
    }
}
