// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Geographic lookup cache.
//!
//! The lookup feeds optional address-field hints in the wizard and
//! never gates an invariant. The cache is an explicitly constructed,
//! injected object owned by the process's dependency container; there
//! is no module-level singleton and no import-time side effect.
//! Refresh happens on stale read.

use time::{Duration, OffsetDateTime};
use tracing::warn;

/// A source of region names.
pub trait GeoSource {
    /// Fetches the current region list.
    ///
    /// # Errors
    ///
    /// Returns a description of the lookup failure.
    fn fetch_regions(&self) -> Result<Vec<String>, String>;
}

/// A cached region list with refresh-on-stale-read.
pub struct GeoCache {
    /// The cached region names.
    data: Vec<String>,
    /// When the data was last refreshed. `None` before the first fetch.
    last_refreshed: Option<OffsetDateTime>,
    /// How long a refresh stays fresh.
    ttl: Duration,
}

impl GeoCache {
    /// Creates an empty cache with the given time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            data: Vec::new(),
            last_refreshed: None,
            ttl,
        }
    }

    /// Returns whether the cached data is stale.
    #[must_use]
    pub fn is_stale(&self, now: OffsetDateTime) -> bool {
        self.last_refreshed
            .is_none_or(|refreshed| now - refreshed >= self.ttl)
    }

    /// Returns the cached regions, refreshing from the source first if
    /// the cache is stale.
    ///
    /// A failed refresh keeps serving the previous data: the hints are
    /// optional, so a degraded lookup must never fail a caller.
    pub fn regions(&mut self, source: &dyn GeoSource, now: OffsetDateTime) -> &[String] {
        if self.is_stale(now) {
            match source.fetch_regions() {
                Ok(data) => {
                    self.data = data;
                    self.last_refreshed = Some(now);
                }
                Err(reason) => {
                    warn!(%reason, "Geo lookup refresh failed; serving cached data");
                }
            }
        }
        &self.data
    }
}
