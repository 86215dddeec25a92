//! Caching layer for computed route plans.
//!
//! Plans are expensive (two geocode calls, a directions call and a full
//! corridor scan), so completed results are kept for an hour under a key
//! derived from the request content. Entries are immutable once written;
//! a racing recomputation simply overwrites with an equal value.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::RoutePlan;

/// Default TTL for cached plans: 1 hour.
const DEFAULT_PLAN_TTL: Duration = Duration::from_secs(60 * 60);

/// Default maximum number of cached plans.
const DEFAULT_PLAN_CAPACITY: u64 = 1000;

/// Configuration for the plan cache.
#[derive(Debug, Clone)]
pub struct PlanCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for PlanCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_PLAN_TTL,
            max_capacity: DEFAULT_PLAN_CAPACITY,
        }
    }
}

/// Cache of computed route plans, keyed by content-addressed request key.
#[derive(Debug)]
pub struct PlanCache {
    plans: MokaCache<String, Arc<RoutePlan>>,
}

impl PlanCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &PlanCacheConfig) -> Self {
        let plans = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { plans }
    }

    /// Get a cached plan.
    pub async fn get(&self, key: &str) -> Option<Arc<RoutePlan>> {
        self.plans.get(key).await
    }

    /// Insert a computed plan.
    pub async fn insert(&self, key: String, plan: Arc<RoutePlan>) {
        self.plans.insert(key, plan).await;
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.plans.entry_count()
    }

    /// Drop all cached plans.
    pub fn invalidate_all(&self) {
        self.plans.invalidate_all();
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new(&PlanCacheConfig::default())
    }
}
