pub mod prelude;

pub mod cache_entries;
pub mod site_stats;
pub mod submissions;
