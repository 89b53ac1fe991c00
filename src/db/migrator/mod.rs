use sea_orm_migration::prelude::*;

mod m20250301_initial;

pub use m20250301_initial::{cache_indexes, cache_table, drop_cache_table};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250301_initial::Migration)]
    }
}
