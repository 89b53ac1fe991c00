pub mod cache;
pub use cache::{CacheKey, CachePolicy, CacheStore, NullCacheStore, SeaOrmCacheStore};

pub mod search;
pub use search::{SearchError, SearchService};

pub mod sitemap;
pub use sitemap::build_sitemap;

pub mod submissions;
pub use submissions::{ClientInfo, SubmissionError, SubmissionService};

pub mod visits;
pub use visits::VisitCounter;
