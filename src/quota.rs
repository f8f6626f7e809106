//! Per-user request quota tracking.
//!
//! Counts generator invocations in sliding minute and day windows over a
//! usage log owned by the persistence layer. Stats are cached per user with
//! a short TTL so repeated checks within one burst of requests do not
//! recompute the window counts; any tracked write invalidates that user's
//! entry.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

const MINUTE_WINDOW: Duration = Duration::from_secs(60);
const DAY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// One generator invocation as recorded in the usage log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEntry {
    pub user_id: String,
    pub operation: String,
    pub success: bool,
    pub error_code: Option<String>,
    pub timestamp: SystemTime,
}

impl UsageEntry {
    pub fn new(user_id: impl Into<String>, operation: impl Into<String>, success: bool) -> Self {
        Self {
            user_id: user_id.into(),
            operation: operation.into(),
            success,
            error_code: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }
}

/// Usage log collaborator. Implementations persist entries and answer
/// windowed counts; both are suspension points.
pub trait UsageLog {
    fn append(&self, entry: UsageEntry) -> impl std::future::Future<Output = ()> + Send;
    fn count_since(
        &self,
        user_id: &str,
        since: SystemTime,
    ) -> impl std::future::Future<Output = u32> + Send;
}

/// Request limits per user.
#[derive(Debug, Clone, Copy)]
pub struct QuotaConfig {
    pub per_minute: u32,
    pub per_day: u32,
    pub cache_ttl: Duration,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            per_minute: 10,
            per_day: 200,
            cache_ttl: Duration::from_secs(10),
        }
    }
}

/// Window counts for one user at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotaStats {
    pub minute_count: u32,
    pub minute_limit: u32,
    pub minute_remaining: u32,
    pub minute_percent_used: f32,
    pub minute_resets_at: SystemTime,
    pub day_count: u32,
    pub day_limit: u32,
    pub day_remaining: u32,
    pub day_percent_used: f32,
    pub day_resets_at: SystemTime,
}

impl QuotaStats {
    pub fn is_minute_exceeded(&self) -> bool {
        self.minute_count >= self.minute_limit
    }

    pub fn is_day_exceeded(&self) -> bool {
        self.day_count >= self.day_limit
    }

    pub fn is_exceeded(&self) -> bool {
        self.is_minute_exceeded() || self.is_day_exceeded()
    }
}

fn percent_used(count: u32, limit: u32) -> f32 {
    if limit == 0 {
        return 100.0;
    }
    (100.0 * count as f32 / limit as f32).min(100.0)
}

struct CacheEntry {
    stats: QuotaStats,
    expires_at: Instant,
}

/// Sliding-window quota tracker over a usage log.
pub struct QuotaTracker<L> {
    log: L,
    config: QuotaConfig,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl<L: UsageLog> QuotaTracker<L> {
    pub fn new(log: L, config: QuotaConfig) -> Self {
        Self {
            log,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Current window stats for a user, served from the TTL cache when fresh.
    pub async fn stats(&self, user_id: &str) -> QuotaStats {
        {
            let cache = self.cache.lock().expect("quota cache poisoned");
            if let Some(entry) = cache.get(user_id) {
                if entry.expires_at > Instant::now() {
                    tracing::debug!(user_id, "quota stats served from cache");
                    return entry.stats;
                }
            }
        }

        let now = SystemTime::now();
        let minute_count = self.log.count_since(user_id, now - MINUTE_WINDOW).await;
        let day_count = self.log.count_since(user_id, now - DAY_WINDOW).await;

        let stats = QuotaStats {
            minute_count,
            minute_limit: self.config.per_minute,
            minute_remaining: self.config.per_minute.saturating_sub(minute_count),
            minute_percent_used: percent_used(minute_count, self.config.per_minute),
            minute_resets_at: now + MINUTE_WINDOW,
            day_count,
            day_limit: self.config.per_day,
            day_remaining: self.config.per_day.saturating_sub(day_count),
            day_percent_used: percent_used(day_count, self.config.per_day),
            day_resets_at: now + DAY_WINDOW,
        };

        let mut cache = self.cache.lock().expect("quota cache poisoned");
        cache.insert(
            user_id.to_string(),
            CacheEntry {
                stats,
                expires_at: Instant::now() + self.config.cache_ttl,
            },
        );
        stats
    }

    /// Drop one user's cached stats. Called after every tracked write.
    pub fn invalidate(&self, user_id: &str) {
        let mut cache = self.cache.lock().expect("quota cache poisoned");
        cache.remove(user_id);
    }

    /// Run a generator call with usage tracking: the outcome is appended to
    /// the usage log (success or failure) and the user's cached quota stats
    /// are invalidated.
    pub async fn with_tracking<T, E, F, Fut>(
        &self,
        user_id: &str,
        operation: &str,
        call: F,
    ) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let result = call().await;

        let entry = match &result {
            Ok(_) => UsageEntry::new(user_id, operation, true),
            Err(err) => UsageEntry::new(user_id, operation, false).with_error_code(err.to_string()),
        };
        self.log.append(entry).await;
        self.invalidate(user_id);

        result
    }
}
