// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pricing configuration.
//!
//! All amounts are minor currency units. Prices are frozen onto the
//! aggregates they apply to at creation time (e.g., a pool keeps the
//! per-slot price it was purchased at), so changing this configuration
//! never rewrites history.

/// Platform pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pricing {
    /// Registration fee for individual (and bulk-slot) registrations.
    pub individual_fee: i64,
    /// Registration fee for group registrations.
    pub group_fee: i64,
    /// Price per purchased slot in a bulk pool.
    pub price_per_slot: i64,
    /// Price per event ticket.
    pub ticket_price: i64,
    /// ISO 4217 currency code for all platform amounts.
    pub currency: String,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            individual_fee: 50_000,
            group_fee: 80_000,
            price_per_slot: 45_000,
            ticket_price: 15_000,
            currency: String::from("NGN"),
        }
    }
}

impl Pricing {
    /// Returns the registration fee for a workflow kind.
    ///
    /// Bulk registrations consume a prepaid slot, so no further fee is
    /// due from the participant.
    #[must_use]
    pub const fn fee_for(&self, kind: ovation_domain::RegistrationKind) -> i64 {
        match kind {
            ovation_domain::RegistrationKind::Individual => self.individual_fee,
            ovation_domain::RegistrationKind::Group => self.group_fee,
            ovation_domain::RegistrationKind::Bulk => 0,
        }
    }
}
