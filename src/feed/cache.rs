//! Paginated feed cache.
//!
//! Pages of the active [`FeedKind`] are merged into one growing list.  An
//! offset-0 page replaces the list outright, any other offset is appended.
//! Every request is tagged with the generation it was issued in; a reset
//! (offset 0, kind switch, refresh) starts a new generation so a slow
//! response from before the reset is recognised as stale and dropped.

use std::collections::{BTreeSet, HashMap};

use crate::models::{FeedKind, FeedPage, NormalizedItem};

/// Cursor position on the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub kind: FeedKind,
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Serialized request tuple, used for in-flight de-duplication.
    pub fn cache_key(&self) -> String {
        format!("{}?skip={}&limit={}", self.kind, self.offset, self.limit)
    }
}

/// A request plus the cache generation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag {
    pub request: PageRequest,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HasMore {
    /// No page has been merged yet.
    Unknown,
    Yes,
    No,
}

impl HasMore {
    /// `Unknown` is optimistic: the first request is always allowed.
    pub fn allows_request(self) -> bool {
        !matches!(self, HasMore::No)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Offset-0 page replaced the entry.
    Replaced,
    /// Page appended to the entry.
    Merged,
    /// The offset had already been merged in this generation.
    Duplicate,
    /// Issued before the last reset or for another kind; dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedCacheEntry {
    pub items: Vec<NormalizedItem>,
    pub total: Option<u32>,
    pub offset: u32,
    pub limit: u32,
    merged_offsets: BTreeSet<u32>,
}

impl FeedCacheEntry {
    fn from_page(page: FeedPage) -> Self {
        let mut merged_offsets = BTreeSet::new();
        merged_offsets.insert(page.offset);
        Self {
            items: page.items,
            total: Some(page.total),
            offset: page.offset,
            limit: page.limit,
            merged_offsets,
        }
    }

    pub fn has_more(&self) -> HasMore {
        match self.total {
            None => HasMore::Unknown,
            Some(total) if self.offset.saturating_add(self.limit) < total => HasMore::Yes,
            Some(_) => HasMore::No,
        }
    }

    pub fn contains_offset(&self, offset: u32) -> bool {
        self.merged_offsets.contains(&offset)
    }
}

/// Last failed request, kept so the UI can offer a retry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedError {
    pub message: String,
    pub request: PageRequest,
}

#[derive(Debug, Clone)]
pub struct FeedCache {
    active: FeedKind,
    limit: u32,
    cursor: u32,
    generation: u64,
    entries: HashMap<FeedKind, FeedCacheEntry>,
    in_flight: HashMap<String, RequestTag>,
    error: Option<FeedError>,
}

impl FeedCache {
    pub fn new(kind: FeedKind, limit: u32) -> Self {
        Self {
            active: kind,
            limit: limit.max(1),
            cursor: 0,
            generation: 0,
            entries: HashMap::new(),
            in_flight: HashMap::new(),
            error: None,
        }
    }

    pub fn active_kind(&self) -> FeedKind {
        self.active
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset of the last page merged for the active kind.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entry(&self, kind: FeedKind) -> Option<&FeedCacheEntry> {
        self.entries.get(&kind)
    }

    /// Items of the active kind only; another kind's entry is never shown.
    pub fn visible_items(&self) -> &[NormalizedItem] {
        self.entries
            .get(&self.active)
            .map(|entry| entry.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn total(&self, kind: FeedKind) -> Option<u32> {
        self.entries.get(&kind).and_then(|entry| entry.total)
    }

    pub fn has_more(&self, kind: FeedKind) -> HasMore {
        self.entries
            .get(&kind)
            .map(FeedCacheEntry::has_more)
            .unwrap_or(HasMore::Unknown)
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn error(&self) -> Option<&FeedError> {
        self.error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Issue a request for `offset` on the active kind.
    ///
    /// Returns `None` when an identical request is already in flight or the
    /// page is already merged.  An offset-0 request starts a new generation
    /// and forgets every older in-flight request.
    pub fn request_page(&mut self, offset: u32) -> Option<RequestTag> {
        let request = PageRequest {
            kind: self.active,
            offset,
            limit: self.limit,
        };
        let key = request.cache_key();

        if self.in_flight.contains_key(&key) {
            debug_log!("Feed: {} already in flight", key);
            return None;
        }
        if self
            .entries
            .get(&self.active)
            .is_some_and(|entry| entry.contains_offset(offset))
        {
            debug_log!("Feed: {} already cached", key);
            return None;
        }

        if offset == 0 {
            self.generation += 1;
            self.in_flight.clear();
        }

        let tag = RequestTag {
            request,
            generation: self.generation,
        };
        self.in_flight.insert(key, tag);
        self.error = None;
        Some(tag)
    }

    /// Next page for the scroll trigger.  Gated on nothing being in flight,
    /// no unresolved failure and the active kind possibly having more.  A
    /// failed page is only re-fetched through [`FeedCache::retry`].
    pub fn load_more(&mut self) -> Option<RequestTag> {
        if self.is_loading() || self.error.is_some() {
            return None;
        }
        if !self.has_more(self.active).allows_request() {
            return None;
        }
        let next = if self.entries.contains_key(&self.active) {
            self.cursor.saturating_add(self.limit)
        } else {
            0
        };
        self.request_page(next)
    }

    /// Switch the feed to `kind` and request its first page.
    ///
    /// The new kind's entry is dropped immediately so the visible list is
    /// empty until its first page lands, whatever the fetch latency.
    pub fn switch_kind(&mut self, kind: FeedKind) -> Option<RequestTag> {
        if kind == self.active {
            return None;
        }
        debug_log!("Feed: switching {} -> {}", self.active, kind);
        self.active = kind;
        self.cursor = 0;
        self.error = None;
        self.entries.remove(&kind);
        self.request_page(0)
    }

    /// Re-fetch the first page of the active kind.  Current items stay
    /// visible until the replacement arrives.
    pub fn refresh(&mut self) -> Option<RequestTag> {
        if let Some(entry) = self.entries.get_mut(&self.active) {
            entry.merged_offsets.clear();
        }
        self.request_page(0)
    }

    /// Re-issue the request that last failed.
    pub fn retry(&mut self) -> Option<RequestTag> {
        let failed = self.error.take()?;
        if failed.request.kind != self.active {
            return None;
        }
        self.request_page(failed.request.offset)
    }

    fn settle(&mut self, tag: &RequestTag) -> bool {
        let key = tag.request.cache_key();
        if self.in_flight.get(&key) == Some(tag) {
            self.in_flight.remove(&key);
        }
        tag.generation == self.generation && tag.request.kind == self.active
    }

    /// Merge a page that arrived for `tag`.
    pub fn complete(&mut self, tag: RequestTag, page: FeedPage) -> MergeOutcome {
        if !self.settle(&tag) {
            debug_log!(
                "Feed: discarding stale page {} (generation {} != {})",
                tag.request.cache_key(),
                tag.generation,
                self.generation
            );
            return MergeOutcome::Stale;
        }

        let kind = tag.request.kind;
        if tag.request.offset == 0 {
            self.entries.insert(kind, FeedCacheEntry::from_page(page));
            self.cursor = 0;
            return MergeOutcome::Replaced;
        }

        let entry = self.entries.entry(kind).or_default();
        if entry.contains_offset(tag.request.offset) {
            return MergeOutcome::Duplicate;
        }
        entry.items.extend(page.items);
        entry.total = Some(page.total);
        entry.offset = page.offset;
        entry.limit = page.limit;
        entry.merged_offsets.insert(tag.request.offset);
        self.cursor = self.cursor.max(tag.request.offset);
        MergeOutcome::Merged
    }

    /// Record a failed fetch.  Cached items are left untouched.  Returns
    /// `false` when the failure belongs to a stale request.
    pub fn fail(&mut self, tag: RequestTag, message: String) -> bool {
        if !self.settle(&tag) {
            return false;
        }
        warn_log!("Feed: {} failed: {}", tag.request.cache_key(), message);
        self.error = Some(FeedError {
            message,
            request: tag.request,
        });
        true
    }

    /// Forget everything (used on logout).  The generation keeps counting
    /// so a request issued before the reset can never match a later one.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::new(self.active, self.limit);
        self.generation = generation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: u32) -> NormalizedItem {
        NormalizedItem {
            id: id.to_string(),
            title: format!("Item {}", id),
            body: String::new(),
            image: None,
            author: "a".into(),
            rating: None,
            price: None,
            category: None,
            department: None,
            age: None,
            created_at: Utc::now(),
        }
    }

    fn page(offset: u32, count: u32, total: u32) -> FeedPage {
        FeedPage {
            items: (offset..offset + count).map(item).collect(),
            total,
            offset,
            limit: 10,
        }
    }

    fn ids(cache: &FeedCache) -> Vec<String> {
        cache.visible_items().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn offset_zero_replaces_cached_sequence() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let first = cache.request_page(0).unwrap();
        cache.complete(first, page(0, 10, 100));
        let second = cache.load_more().unwrap();
        assert_eq!(second.request.offset, 10);
        cache.complete(second, page(10, 10, 100));
        assert_eq!(cache.visible_items().len(), 20);

        let again = cache.refresh().unwrap();
        assert_eq!(cache.complete(again, page(0, 10, 100)), MergeOutcome::Replaced);
        assert_eq!(cache.visible_items().len(), 10);
        assert_eq!(ids(&cache)[0], "0");
    }

    #[test]
    fn successive_pages_append_in_fetch_order() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let first = cache.request_page(0).unwrap();
        cache.complete(first, page(0, 10, 100));

        let p10 = cache.request_page(10).unwrap();
        assert_eq!(cache.complete(p10, page(10, 10, 100)), MergeOutcome::Merged);
        let p20 = cache.request_page(20).unwrap();
        assert_eq!(cache.complete(p20, page(20, 7, 100)), MergeOutcome::Merged);

        assert_eq!(cache.visible_items().len(), 27);
        let expected: Vec<String> = (0..27).map(|i| i.to_string()).collect();
        assert_eq!(ids(&cache), expected);
    }

    #[test]
    fn has_more_follows_latest_counters() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        assert_eq!(cache.has_more(FeedKind::Products), HasMore::Unknown);

        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 25));
        assert_eq!(cache.has_more(FeedKind::Products), HasMore::Yes);

        let t10 = cache.load_more().unwrap();
        cache.complete(t10, page(10, 10, 25));
        assert_eq!(cache.has_more(FeedKind::Products), HasMore::Yes);

        let t20 = cache.load_more().unwrap();
        cache.complete(t20, page(20, 5, 25));
        assert_eq!(cache.has_more(FeedKind::Products), HasMore::No);
        assert!(cache.load_more().is_none());
    }

    #[test]
    fn empty_dataset_stops_after_one_request() {
        let mut cache = FeedCache::new(FeedKind::Users, 10);
        let t0 = cache.load_more().unwrap();
        cache.complete(t0, page(0, 0, 0));
        assert_eq!(cache.has_more(FeedKind::Users), HasMore::No);
        assert!(cache.load_more().is_none());
    }

    #[test]
    fn identical_requests_are_deduplicated() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        assert!(cache.request_page(0).is_none(), "in flight");
        cache.complete(t0, page(0, 10, 100));
        assert!(cache.request_page(0).is_none(), "already cached");

        let t10 = cache.request_page(10).unwrap();
        assert!(cache.load_more().is_none(), "gated while loading");
        cache.complete(t10, page(10, 10, 100));
        assert!(cache.request_page(10).is_none());
    }

    #[test]
    fn same_offset_is_never_appended_twice() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let t10 = cache.request_page(10).unwrap();
        assert_eq!(cache.complete(t10, page(10, 10, 100)), MergeOutcome::Merged);
        assert_eq!(cache.complete(t10, page(10, 10, 100)), MergeOutcome::Duplicate);
        assert_eq!(cache.visible_items().len(), 20);
    }

    #[test]
    fn kind_switch_hides_previous_items_immediately() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        assert_eq!(cache.visible_items().len(), 10);

        let users = cache.switch_kind(FeedKind::Users).unwrap();
        assert_eq!(users.request.kind, FeedKind::Users);
        assert_eq!(users.request.offset, 0);
        assert!(cache.visible_items().is_empty());
        assert!(cache.is_loading());
        assert_eq!(cache.has_more(FeedKind::Users), HasMore::Unknown);
    }

    #[test]
    fn stale_response_after_kind_switch_is_discarded() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let slow = cache.load_more().unwrap();

        let users = cache.switch_kind(FeedKind::Users).unwrap();
        assert_eq!(cache.complete(slow, page(10, 10, 100)), MergeOutcome::Stale);
        assert!(cache.visible_items().is_empty());

        assert_eq!(cache.complete(users, page(0, 3, 3)), MergeOutcome::Replaced);
        assert_eq!(cache.visible_items().len(), 3);
        assert!(!cache.is_loading());
    }

    #[test]
    fn stale_response_after_refresh_is_discarded() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let slow = cache.load_more().unwrap();
        let fresh = cache.refresh().unwrap();

        assert_eq!(cache.complete(slow, page(10, 10, 100)), MergeOutcome::Stale);
        assert_eq!(cache.complete(fresh, page(0, 10, 100)), MergeOutcome::Replaced);
        assert_eq!(cache.visible_items().len(), 10);
    }

    #[test]
    fn failure_keeps_cache_and_can_be_retried() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let t10 = cache.load_more().unwrap();

        assert!(cache.fail(t10, "boom".into()));
        assert_eq!(cache.visible_items().len(), 10);
        assert!(!cache.is_loading());
        assert_eq!(cache.error().unwrap().message, "boom");

        let retried = cache.retry().unwrap();
        assert_eq!(retried.request.offset, 10);
        assert!(cache.error().is_none());
        cache.complete(retried, page(10, 10, 100));
        assert_eq!(cache.visible_items().len(), 20);
    }

    #[test]
    fn failed_page_is_not_skipped_by_load_more() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let t10 = cache.load_more().unwrap();
        assert_eq!(t10.request.offset, 10);

        cache.fail(t10, "offline".into());
        assert!(cache.load_more().is_none(), "blocked until retried");
        assert_eq!(cache.cursor(), 0);
        assert!(cache.error().is_some());

        let retried = cache.retry().unwrap();
        assert_eq!(retried.request.offset, 10);
        cache.complete(retried, page(10, 10, 100));
        assert_eq!(cache.cursor(), 10);
        assert_eq!(cache.load_more().unwrap().request.offset, 20);
        assert_eq!(ids(&cache), (0..20).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn request_from_before_reset_is_stale_afterwards() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.complete(t0, page(0, 10, 100));
        let pending = cache.load_more().unwrap();

        cache.reset();
        let fresh = cache.request_page(0).unwrap();
        assert_ne!(fresh.generation, t0.generation);
        cache.complete(fresh, page(0, 10, 100));

        assert_eq!(cache.complete(pending, page(10, 10, 100)), MergeOutcome::Stale);
        assert_eq!(cache.visible_items().len(), 10);
        assert_eq!(cache.load_more().unwrap().request.offset, 10);
    }

    #[test]
    fn stale_failure_is_ignored() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        let t0 = cache.request_page(0).unwrap();
        cache.switch_kind(FeedKind::Users);
        assert!(!cache.fail(t0, "late".into()));
        assert!(cache.error().is_none());
    }

    #[test]
    fn switching_to_the_active_kind_is_a_no_op() {
        let mut cache = FeedCache::new(FeedKind::Products, 10);
        assert!(cache.switch_kind(FeedKind::Products).is_none());
        assert_eq!(cache.generation(), 0);
    }

    #[test]
    fn cache_key_serializes_the_request_tuple() {
        let req = PageRequest { kind: FeedKind::Users, offset: 20, limit: 10 };
        assert_eq!(req.cache_key(), "users?skip=20&limit=10");
    }
}
