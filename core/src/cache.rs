//! In-memory query cache with tag-based invalidation.
//!
//! # Design
//! Entries are keyed by endpoint plus serialized arguments. A write never
//! edits cached data: it drops every entry that provides one of the tags the
//! write invalidates, and the next read refetches. Fulfilled entries also
//! age out after `keep_unused_for`.
//!
//! An entry that is pending when its tag is invalidated is kept but flagged:
//! the response already in flight predates the write, so when it lands its
//! data is stored without a fulfilment time and is never served as fresh.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use crate::endpoints::{Endpoint, Tag};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: Endpoint,
    pub args: String,
}

impl CacheKey {
    pub fn new(endpoint: Endpoint, args: impl Into<String>) -> Self {
        Self {
            endpoint,
            args: args.into(),
        }
    }

    pub fn no_args(endpoint: Endpoint) -> Self {
        Self::new(endpoint, "")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.endpoint, self.args)
    }
}

/// Per-request lifecycle: `Uninitialized -> Pending -> Fulfilled | Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub status: QueryStatus,
    pub data: Option<V>,
    pub error: Option<ApiError>,
    pub tags: Vec<Tag>,
    /// `None` on a fulfilled entry means its data predates a write.
    pub fulfilled_at: Option<Instant>,
    invalidated: bool,
}

impl<V> CacheEntry<V> {
    fn pending(tags: &[Tag]) -> Self {
        Self {
            status: QueryStatus::Pending,
            data: None,
            error: None,
            tags: tags.to_vec(),
            fulfilled_at: None,
            invalidated: false,
        }
    }

    pub fn is_expired(&self, now: Instant, keep_unused_for: Duration) -> bool {
        match self.fulfilled_at {
            Some(at) => now.saturating_duration_since(at) >= keep_unused_for,
            None => self.status == QueryStatus::Fulfilled,
        }
    }

    /// Whether a write invalidated this entry while its request was in flight.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }
}

#[derive(Debug)]
pub struct QueryCache<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    keep_unused_for: Duration,
}

impl<V> QueryCache<V> {
    pub fn new(keep_unused_for: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            keep_unused_for,
        }
    }

    pub fn status(&self, key: &CacheKey) -> QueryStatus {
        self.entries
            .get(key)
            .map_or(QueryStatus::Uninitialized, |e| e.status)
    }

    pub fn entry(&self, key: &CacheKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Data that may be served without a network call.
    pub fn fresh_data(&self, key: &CacheKey, now: Instant) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if entry.status != QueryStatus::Fulfilled || entry.is_expired(now, self.keep_unused_for) {
            return None;
        }
        entry.data.as_ref()
    }

    /// Start a request for `key`. Data from a previous fulfilment is kept
    /// until the new request settles.
    pub fn mark_pending(&mut self, key: CacheKey, tags: &[Tag]) {
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CacheEntry::pending(tags));
        entry.status = QueryStatus::Pending;
        entry.error = None;
        entry.tags = tags.to_vec();
        entry.invalidated = false;
    }

    pub fn fulfill(&mut self, key: CacheKey, data: V, now: Instant) {
        let tags = key.endpoint.provides_tags();
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CacheEntry::pending(tags));
        entry.status = QueryStatus::Fulfilled;
        entry.data = Some(data);
        entry.error = None;
        entry.fulfilled_at = if entry.invalidated { None } else { Some(now) };
        entry.invalidated = false;
    }

    pub fn reject(&mut self, key: CacheKey, error: ApiError) {
        let tags = key.endpoint.provides_tags();
        let entry = self
            .entries
            .entry(key)
            .or_insert_with(|| CacheEntry::pending(tags));
        entry.status = QueryStatus::Rejected;
        entry.error = Some(error);
        entry.invalidated = false;
    }

    /// Drop every settled entry providing any of `tags` and flag pending
    /// ones. Returns how many entries were affected.
    pub fn invalidate_tags(&mut self, tags: &[Tag]) -> usize {
        let mut affected = 0;
        self.entries.retain(|_, entry| {
            if !entry.tags.iter().any(|t| tags.contains(t)) {
                return true;
            }
            affected += 1;
            if entry.status == QueryStatus::Pending {
                entry.invalidated = true;
                return true;
            }
            false
        });
        affected
    }

    pub fn remove_expired(&mut self, now: Instant) -> usize {
        let keep_unused_for = self.keep_unused_for;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(now, keep_unused_for));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
