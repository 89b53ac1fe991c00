use crate::config::Config;
use crate::db::Store;

pub async fn cmd_recreate_cache(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let before = store.cache_entry_count().await?;
    store.recreate_cache().await?;

    println!("✓ Cache table recreated ({before} entries dropped)");
    Ok(())
}
