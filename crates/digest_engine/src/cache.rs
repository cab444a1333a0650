use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use digest_logging::digest_debug;

use crate::{FetchError, ProblemFetcher, ProblemSummary};

pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(300);

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Debug)]
struct CachedPage {
    fetched_at: Instant,
    limit: u32,
    problems: Vec<ProblemSummary>,
}

/// Time-bounded memo of the first page of the remote listing.
///
/// A cached page answers any request for at most as many entries as it was
/// fetched with. Expired or too-short pages are refetched.
#[derive(Debug)]
pub struct ListingCache<C = SystemClock> {
    clock: C,
    ttl: Duration,
    page: Mutex<Option<CachedPage>>,
}

impl ListingCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl Default for ListingCache<SystemClock> {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_TTL)
    }
}

impl<C: Clock> ListingCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            clock,
            ttl,
            page: Mutex::new(None),
        }
    }

    pub fn lookup(&self, limit: u32) -> Option<Vec<ProblemSummary>> {
        let guard = self.page.lock().unwrap_or_else(PoisonError::into_inner);
        let page = guard.as_ref()?;
        let age = self.clock.now().saturating_duration_since(page.fetched_at);
        if age >= self.ttl || limit > page.limit {
            return None;
        }
        Some(page.problems.iter().take(limit as usize).cloned().collect())
    }

    pub fn store(&self, limit: u32, problems: Vec<ProblemSummary>) {
        let mut guard = self.page.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(CachedPage {
            fetched_at: self.clock.now(),
            limit,
            problems,
        });
    }

    pub fn invalidate(&self) {
        let mut guard = self.page.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub async fn get_or_fetch(
        &self,
        fetcher: &dyn ProblemFetcher,
        limit: u32,
    ) -> Result<Vec<ProblemSummary>, FetchError> {
        if let Some(hit) = self.lookup(limit) {
            digest_debug!("listing cache hit for {limit} entries");
            return Ok(hit);
        }
        digest_debug!("listing cache miss for {limit} entries");
        let problems = fetcher.fetch_listing(limit, 0).await?;
        self.store(limit, problems.clone());
        Ok(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::Difficulty;

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock().unwrap() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    fn summaries(n: usize) -> Vec<ProblemSummary> {
        (1..=n)
            .map(|i| ProblemSummary {
                title: format!("Problem {i}"),
                slug: format!("problem-{i}"),
                difficulty: Difficulty::Easy,
                topics: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn empty_cache_misses() {
        let cache = ListingCache::new(DEFAULT_LISTING_TTL);
        assert!(cache.lookup(10).is_none());
    }

    #[test]
    fn fresh_page_serves_smaller_requests() {
        let clock = Arc::new(ManualClock::new());
        let cache = ListingCache::with_clock(Duration::from_secs(60), clock.clone());
        cache.store(5, summaries(5));

        let hit = cache.lookup(3).unwrap();
        assert_eq!(hit.len(), 3);
        assert_eq!(hit[2].slug, "problem-3");
        assert!(cache.lookup(6).is_none());
    }

    #[test]
    fn page_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = ListingCache::with_clock(Duration::from_secs(60), clock.clone());
        cache.store(5, summaries(5));

        clock.advance(Duration::from_secs(59));
        assert!(cache.lookup(5).is_some());
        clock.advance(Duration::from_secs(1));
        assert!(cache.lookup(5).is_none());
    }

    #[test]
    fn invalidate_drops_page() {
        let cache = ListingCache::new(DEFAULT_LISTING_TTL);
        cache.store(2, summaries(2));
        cache.invalidate();
        assert!(cache.lookup(1).is_none());
    }
}
