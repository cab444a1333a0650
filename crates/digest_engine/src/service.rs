use digest_core::{parse_problem, ProblemId, ProblemRecord};
use digest_logging::{digest_error, digest_info};

use crate::cache::{Clock, ListingCache, SystemClock};
use crate::catalog::Catalog;
use crate::counter::{CounterError, DailyCounter};
use crate::store::{ProblemStore, StoreError};
use crate::{FetchError, ProblemFetcher, ProblemSummary};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error("problem {0} is not in the catalog")]
    NotInCatalog(ProblemId),
}

/// Ties fetching, parsing and storage together.
pub struct ProblemService<F, C = SystemClock> {
    fetcher: F,
    store: ProblemStore,
    listing: ListingCache<C>,
}

impl<F: ProblemFetcher> ProblemService<F, SystemClock> {
    pub fn new(fetcher: F, store: ProblemStore) -> Self {
        Self::with_cache(fetcher, store, ListingCache::default())
    }
}

impl<F: ProblemFetcher, C: Clock> ProblemService<F, C> {
    pub fn with_cache(fetcher: F, store: ProblemStore, listing: ListingCache<C>) -> Self {
        Self {
            fetcher,
            store,
            listing,
        }
    }

    pub fn store(&self) -> &ProblemStore {
        &self.store
    }

    /// Fetches, parses and stores the problem at `url`, replacing any
    /// record with the same id.
    pub async fn add_problem_by_url(&mut self, url: &str) -> Result<ProblemRecord, ServiceError> {
        digest_info!("adding problem from {url}");
        let source = self.fetcher.fetch_problem(url).await.inspect_err(|err| {
            digest_error!("fetching {url} failed: {err}");
        })?;
        let record = parse_problem(&source);
        if self.store.insert(record.clone())?.is_some() {
            digest_info!("replaced stored problem {}", record.id);
        } else {
            digest_info!("stored problem {} ({})", record.id, record.title);
        }
        Ok(record)
    }

    pub fn problem(&self, id: ProblemId) -> Option<&ProblemRecord> {
        self.store.get(id)
    }

    /// Advances the daily counter and adds the problem it now points at.
    pub async fn daily_problem(
        &mut self,
        catalog: &Catalog,
        counter: &DailyCounter,
    ) -> Result<ProblemRecord, ServiceError> {
        let id = counter.advance()?;
        let url = catalog
            .url_for(id)
            .ok_or(ServiceError::NotInCatalog(id))?
            .to_string();
        self.add_problem_by_url(&url).await
    }

    pub async fn listing(&self, limit: u32) -> Result<Vec<ProblemSummary>, ServiceError> {
        Ok(self.listing.get_or_fetch(&self.fetcher, limit).await?)
    }
}
