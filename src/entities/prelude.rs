pub use super::cache_entries::Entity as CacheEntries;
pub use super::site_stats::Entity as SiteStats;
pub use super::submissions::Entity as Submissions;
