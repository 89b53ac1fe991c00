use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::build_sitemap;

pub fn cmd_sitemap(config: &Config) -> anyhow::Result<()> {
    let catalog = Catalog::load(&config.data);
    let xml = build_sitemap(&config.server.base_url, &catalog)?;
    println!("{xml}");
    Ok(())
}
