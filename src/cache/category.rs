//! Cache Categories
//!
//! Named groups of endpoints for bulk invalidation, and named TTL classes so
//! callers pick a lifetime by kind of data instead of hardcoding durations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Data Category ==
/// Endpoint families that are invalidated together after writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCategory {
    Dashboard,
    Investors,
    Users,
    Transactions,
    Kyc,
}

impl DataCategory {
    pub const ALL: [DataCategory; 5] = [
        DataCategory::Dashboard,
        DataCategory::Investors,
        DataCategory::Users,
        DataCategory::Transactions,
        DataCategory::Kyc,
    ];

    /// Substring matched against keys when invalidating this category.
    pub fn pattern(self) -> &'static str {
        match self {
            DataCategory::Dashboard => "dashboard",
            DataCategory::Investors => "investors",
            DataCategory::Users => "users",
            DataCategory::Transactions => "transactions",
            DataCategory::Kyc => "kyc",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for DataCategory {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataCategory::ALL
            .into_iter()
            .find(|category| category.pattern().eq_ignore_ascii_case(s))
            .ok_or_else(|| CacheError::NotFound(format!("Unknown category '{}'", s)))
    }
}

// == TTL Category ==
/// Kinds of data with their own default lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtlCategory {
    /// Dashboard overview cards
    Overview,
    /// Live counters that must stay close to the source
    Realtime,
    /// Per-investor, per-user and per-transaction metrics
    EntityMetrics,
    /// Generated reports
    Reports,
}

// == TTL Defaults ==
/// Default lifetime per `TtlCategory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlDefaults {
    pub overview: Duration,
    pub realtime: Duration,
    pub entity_metrics: Duration,
    pub reports: Duration,
}

impl TtlDefaults {
    pub fn get(&self, category: TtlCategory) -> Duration {
        match category {
            TtlCategory::Overview => self.overview,
            TtlCategory::Realtime => self.realtime,
            TtlCategory::EntityMetrics => self.entity_metrics,
            TtlCategory::Reports => self.reports,
        }
    }
}

impl Default for TtlDefaults {
    fn default() -> Self {
        Self {
            overview: Duration::from_secs(5 * 60),
            realtime: Duration::from_secs(30),
            entity_metrics: Duration::from_secs(10 * 60),
            reports: Duration::from_secs(30 * 60),
        }
    }
}
