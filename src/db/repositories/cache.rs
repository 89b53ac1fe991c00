use crate::db::migrator::{cache_indexes, cache_table, drop_cache_table};
use crate::entities::{cache_entries, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

pub struct CacheRepository {
    conn: DatabaseConnection,
}

impl CacheRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Returns the payload stored under `key` unless it is older than `max_age`.
    /// Stale entries are deleted on the way out.
    pub async fn get(
        &self,
        key: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<serde_json::Value>> {
        let Some(entry) = CacheEntries::find()
            .filter(cache_entries::Column::Key.eq(key))
            .one(&self.conn)
            .await?
        else {
            return Ok(None);
        };

        let age_ms = chrono::Utc::now().timestamp_millis() - entry.timestamp;
        if age_ms > max_age.num_milliseconds() {
            CacheEntries::delete_many()
                .filter(cache_entries::Column::Key.eq(key))
                .exec(&self.conn)
                .await?;
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&entry.data)?))
    }

    pub async fn set(&self, key: &str, data: &serde_json::Value) -> Result<()> {
        self.set_at(key, data, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// Upserts with an explicit write time in epoch milliseconds.
    pub async fn set_at(&self, key: &str, data: &serde_json::Value, timestamp: i64) -> Result<()> {
        let active_model = cache_entries::ActiveModel {
            key: Set(key.to_string()),
            data: Set(serde_json::to_string(data)?),
            timestamp: Set(timestamp),
            ..Default::default()
        };

        CacheEntries::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(cache_entries::Column::Key)
                    .update_columns([
                        cache_entries::Column::Data,
                        cache_entries::Column::Timestamp,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(CacheEntries::find().count(&self.conn).await?)
    }

    /// Drops the table and rebuilds it with its unique key and timestamp indexes.
    pub async fn recreate(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();

        self.conn.execute(backend.build(&drop_cache_table())).await?;
        self.conn.execute(backend.build(&cache_table())).await?;
        for index in cache_indexes() {
            self.conn.execute(backend.build(&index)).await?;
        }

        Ok(())
    }
}
