//! Simulated remote lookup services.
//!
//! Both services behave like an idempotent HTTP endpoint: a fixed directory
//! behind an artificial latency, with an in-process `moka` cache in front.
//! Only hits are cached - a failing key pays the latency again on every call
//! (mirroring the behavior of the service this simulates).
//!
//! The services are safe to call concurrently, including with the same key
//! while a previous call is still pending: the cache does not deduplicate
//! in-flight requests, it only prevents re-querying once a result exists.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

/// City and province resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalInfo {
    pub city: String,
    pub province: String,
}

/// A resolved discount code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    /// The canonical (upper-cased) code.
    pub code: String,
    /// Discount percentage (0-100).
    pub percent: u8,
}

/// The known postal codes: code, city, province.
const POSTAL_DIRECTORY: &[(&str, &str, &str)] = &[
    ("28001", "Madrid", "Madrid"),
    ("08001", "Barcelona", "Barcelona"),
    ("41001", "Sevilla", "Sevilla"),
    ("46001", "Valencia", "Valencia"),
];

/// The valid discount codes and their percentages.
const DISCOUNT_CODES: &[(&str, u8)] = &[("BIENVENIDO10", 10), ("VERANO20", 20), ("VIP30", 30)];

/// Cache sizing; entries never expire within a session.
const CACHE_CAPACITY: u64 = 1_000;

/// Postal code to city/province lookup, keyed by the literal code.
pub struct PostalCodeService {
    cache: Cache<String, PostalInfo>,
    latency: Duration,
    directory_lookups: AtomicU64,
}

impl PostalCodeService {
    /// Create a service with the given simulated latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
            latency,
            directory_lookups: AtomicU64::new(0),
        }
    }

    /// Resolve a postal code to its city and province.
    ///
    /// Cache hits return immediately; misses pay the simulated latency before
    /// consulting the directory. Unknown codes return `None` and are not
    /// cached.
    pub async fn lookup(&self, code: &str) -> Option<PostalInfo> {
        if let Some(hit) = self.cache.get(code).await {
            tracing::debug!(code, "postal code served from cache");
            return Some(hit);
        }

        tokio::time::sleep(self.latency).await;
        self.directory_lookups.fetch_add(1, Ordering::Relaxed);

        let info = POSTAL_DIRECTORY
            .iter()
            .find(|(known, _, _)| *known == code)
            .map(|(_, city, province)| PostalInfo {
                city: (*city).to_owned(),
                province: (*province).to_owned(),
            });

        match &info {
            Some(info) => {
                self.cache.insert(code.to_owned(), info.clone()).await;
                tracing::debug!(code, city = %info.city, "postal code resolved");
            }
            None => tracing::debug!(code, "postal code not found"),
        }

        info
    }

    /// Number of directory consultations so far (cache hits excluded).
    #[must_use]
    pub fn directory_lookups(&self) -> u64 {
        self.directory_lookups.load(Ordering::Relaxed)
    }
}

/// Discount code lookup, case-insensitive (keyed by the upper-cased code).
pub struct DiscountService {
    cache: Cache<String, Discount>,
    latency: Duration,
    directory_lookups: AtomicU64,
}

impl DiscountService {
    /// Create a service with the given simulated latency.
    #[must_use]
    pub fn new(latency: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(CACHE_CAPACITY).build(),
            latency,
            directory_lookups: AtomicU64::new(0),
        }
    }

    /// Resolve a discount code to its percentage.
    ///
    /// Matching is case-insensitive; hits are cached under the canonical
    /// upper-cased code. Unknown codes return `None` and are not cached.
    pub async fn lookup(&self, code: &str) -> Option<Discount> {
        let canonical = code.trim().to_uppercase();

        if let Some(hit) = self.cache.get(&canonical).await {
            tracing::debug!(code = %canonical, "discount code served from cache");
            return Some(hit);
        }

        tokio::time::sleep(self.latency).await;
        self.directory_lookups.fetch_add(1, Ordering::Relaxed);

        let discount = DISCOUNT_CODES
            .iter()
            .find(|(known, _)| *known == canonical)
            .map(|(known, percent)| Discount {
                code: (*known).to_owned(),
                percent: *percent,
            });

        match &discount {
            Some(discount) => {
                self.cache.insert(canonical.clone(), discount.clone()).await;
                tracing::debug!(code = %canonical, percent = discount.percent, "discount code resolved");
            }
            None => tracing::debug!(code = %canonical, "discount code not found"),
        }

        discount
    }

    /// Number of directory consultations so far (cache hits excluded).
    #[must_use]
    pub fn directory_lookups(&self) -> u64 {
        self.directory_lookups.load(Ordering::Relaxed)
    }
}
