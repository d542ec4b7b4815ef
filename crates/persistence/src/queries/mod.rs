// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules.
//!
//! Read-only operations, one module per aggregate. Row-to-domain
//! mapping lives here; anything that fails to map surfaces as
//! `PersistenceError::CorruptRow` rather than a silent default.

pub mod audit;
pub mod codes;
pub mod identities;
pub mod payments;
pub mod pools;
pub mod registrations;
pub mod tickets;
pub mod votes;
