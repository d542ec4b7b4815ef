// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Core transition logic for the Ovation talent platform.
//!
//! This crate holds the pure halves of the two state machines the
//! platform revolves around:
//!
//! - the registration **step workflow** (ordered, resumable wizard with
//!   per-step payload merging and a one-way submission), and
//! - the payment **reconciler** (exactly-once application of gateway
//!   outcomes to domain aggregates).
//!
//! Everything here is deterministic and side-effect free. Durable
//! writes — and the conditional updates that arbitrate concurrent
//! callers — live in the persistence crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod command;
mod error;
mod reconcile;
mod workflow;

#[cfg(test)]
mod tests;

pub use command::WorkflowCommand;
pub use error::CoreError;
pub use reconcile::{FanOutEffect, ReconcileDecision, decide_reconciliation};
pub use workflow::{WorkflowTransition, apply_workflow, registration_snapshot};
