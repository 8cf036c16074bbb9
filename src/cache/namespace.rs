//! Namespace Module
//!
//! Data-type namespaces and the freshness policy callers apply to each.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == TTL Policy ==
/// Address to coordinate mappings are stable.
pub const GEOCODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Places change rarely, but not never.
pub const POI_TTL: Duration = Duration::from_secs(60 * 60);
/// Road conditions vary.
pub const ROUTE_TTL: Duration = Duration::from_secs(5 * 60);
/// Schedules drift.
pub const TRANSIT_TTL: Duration = Duration::from_secs(5 * 60);

// == Namespace ==
/// The data types cached by upstream-calling collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    Geocode,
    Poi,
    Route,
    Transit,
}

impl Namespace {
    pub const ALL: [Namespace; 4] = [
        Namespace::Geocode,
        Namespace::Poi,
        Namespace::Route,
        Namespace::Transit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Geocode => "geocode",
            Namespace::Poi => "poi",
            Namespace::Route => "route",
            Namespace::Transit => "transit",
        }
    }

    /// Freshness window for results in this namespace.
    pub fn ttl(&self) -> Duration {
        match self {
            Namespace::Geocode => GEOCODE_TTL,
            Namespace::Poi => POI_TTL,
            Namespace::Route => ROUTE_TTL,
            Namespace::Transit => TRANSIT_TTL,
        }
    }

    /// Whether the upstream behind this namespace enforces a request ceiling.
    ///
    /// Only the geocoding service (1 request per second) does.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Namespace::Geocode)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Namespace::ALL
            .into_iter()
            .find(|ns| ns.as_str() == s)
            .ok_or_else(|| CacheError::InvalidKey(format!("unknown namespace '{}'", s)))
    }
}
