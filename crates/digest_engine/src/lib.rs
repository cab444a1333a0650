//! Digest engine: fetching, storage and scheduling collaborators around the core parser.
mod cache;
mod catalog;
mod counter;
mod export;
mod fetch;
mod persist;
mod service;
mod slug;
mod store;
mod types;

pub use cache::{Clock, ListingCache, SystemClock, DEFAULT_LISTING_TTL};
pub use catalog::{Catalog, CatalogError};
pub use counter::{CounterError, DailyCounter};
pub use export::{export_filename, export_markdown, frontmatter, ExportError};
pub use fetch::{FetchSettings, GraphqlFetcher, ProblemFetcher};
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use service::{ProblemService, ServiceError};
pub use slug::slug_from_url;
pub use store::{ProblemStore, StoreError};
pub use types::{FailureKind, FetchError, ProblemSummary};
