//! Page props cache for time-based revalidation.
//!
//! Every route's props are stored with the time they were fetched. A build
//! reuses props younger than the revalidation interval and refetches older
//! ones. When a refetch fails, the previously cached props are served
//! instead, however old, so a CMS outage never blanks a page that already
//! had content.
//!
//! ## Keys
//!
//! Entries are keyed by route path (`/`, `/about`, `/projects`,
//! `/articles/<key>`, `/projects/<key>`). Props are stored as raw JSON and
//! decoded by the caller, so the cache is agnostic to the props type.
//!
//! ## Storage
//!
//! The cache is a JSON file at `<temp_dir>/.props-cache.json`. A missing,
//! corrupt or version-mismatched file loads as an empty cache.
//!
//! ## Bypassing the cache
//!
//! `--no-cache` skips the freshness check (every route is refetched) but
//! keeps the fallback: a failed refetch still serves cached props.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the cache file within the temp directory.
const CACHE_FILENAME: &str = ".props-cache.json";

/// Version of the cache format. Bump to invalidate existing caches when
/// a props type changes shape.
const CACHE_VERSION: u32 = 1;

/// Props for one route and when they were fetched.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub struct CachedProps {
    pub fetched_at: DateTime<Utc>,
    pub props: Value,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PropsCache {
    pub version: u32,
    pub entries: BTreeMap<String, CachedProps>,
}

impl PropsCache {
    /// Create an empty cache (first build).
    pub fn empty() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from the temp directory, falling back to empty.
    pub fn load(dir: &Path) -> Self {
        let content = match std::fs::read_to_string(cache_path(dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(cache) if cache.version == CACHE_VERSION => cache,
            Ok(_) => {
                tracing::info!("props cache version changed, starting fresh");
                Self::empty()
            }
            Err(e) => {
                tracing::warn!("ignoring unreadable props cache: {e}");
                Self::empty()
            }
        }
    }

    /// Save to the temp directory.
    pub fn save(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(cache_path(dir), json)
    }

    /// Cached props for `route` if they are younger than `interval`.
    pub fn fresh<T: DeserializeOwned>(
        &self,
        route: &str,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> Option<T> {
        let entry = self.entries.get(route)?;
        if now - entry.fetched_at >= interval {
            return None;
        }
        decode(route, entry)
    }

    /// Cached props for `route` regardless of age.
    pub fn any_age<T: DeserializeOwned>(&self, route: &str) -> Option<T> {
        decode(route, self.entries.get(route)?)
    }

    /// Record freshly fetched props.
    pub fn insert<T: Serialize>(&mut self, route: &str, props: &T, now: DateTime<Utc>) {
        match serde_json::to_value(props) {
            Ok(props) => {
                self.entries.insert(
                    route.to_string(),
                    CachedProps {
                        fetched_at: now,
                        props,
                    },
                );
            }
            Err(e) => tracing::warn!(route, "props not cacheable: {e}"),
        }
    }

    /// Drop entries for routes that no longer exist.
    pub fn retain_routes(&mut self, live: &HashSet<String>) {
        self.entries.retain(|route, _| live.contains(route));
    }
}

fn decode<T: DeserializeOwned>(route: &str, entry: &CachedProps) -> Option<T> {
    match serde_json::from_value(entry.props.clone()) {
        Ok(props) => Some(props),
        Err(e) => {
            tracing::warn!(route, "discarding cached props: {e}");
            None
        }
    }
}

/// Resolve the cache file path for a temp directory.
pub fn cache_path(dir: &Path) -> PathBuf {
    dir.join(CACHE_FILENAME)
}

/// How each route's props were obtained during a build.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RevalidationStats {
    /// Served from cache, still inside the revalidation window.
    pub fresh: u32,
    /// Refetched successfully.
    pub refetched: u32,
    /// Refetch failed, served stale cached props.
    pub fallback: u32,
    /// Refetch failed with nothing cached, served the empty state.
    pub degraded: u32,
}

impl RevalidationStats {
    pub fn total(&self) -> u32 {
        self.fresh + self.refetched + self.fallback + self.degraded
    }

    pub fn merge(&mut self, other: RevalidationStats) {
        self.fresh += other.fresh;
        self.refetched += other.refetched;
        self.fallback += other.fallback;
        self.degraded += other.degraded;
    }
}

impl fmt::Display for RevalidationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fresh, {} refetched",
            self.fresh, self.refetched
        )?;
        if self.fallback > 0 {
            write!(f, ", {} stale (CMS unreachable)", self.fallback)?;
        }
        if self.degraded > 0 {
            write!(f, ", {} empty (CMS unreachable)", self.degraded)?;
        }
        write!(f, " ({} routes)", self.total())
    }
}
