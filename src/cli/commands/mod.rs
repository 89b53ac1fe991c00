mod cache;
mod search;
mod sitemap;

pub use cache::cmd_recreate_cache;
pub use search::cmd_search;
pub use sitemap::cmd_sitemap;
