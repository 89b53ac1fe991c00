use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::submission::NewSubmission;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Every pooled connection to an in-memory SQLite database sees its own database.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    fn cache_repo(&self) -> repositories::cache::CacheRepository {
        repositories::cache::CacheRepository::new(self.conn.clone())
    }

    fn submission_repo(&self) -> repositories::submission::SubmissionRepository {
        repositories::submission::SubmissionRepository::new(self.conn.clone())
    }

    fn stats_repo(&self) -> repositories::stats::StatsRepository {
        repositories::stats::StatsRepository::new(self.conn.clone())
    }

    pub async fn get_cached(
        &self,
        key: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<serde_json::Value>> {
        self.cache_repo().get(key, max_age).await
    }

    pub async fn set_cached(&self, key: &str, data: &serde_json::Value) -> Result<()> {
        self.cache_repo().set(key, data).await
    }

    pub async fn cache_entry_count(&self) -> Result<u64> {
        self.cache_repo().count().await
    }

    pub async fn recreate_cache(&self) -> Result<()> {
        self.cache_repo().recreate().await
    }

    pub async fn add_submission(&self, submission: NewSubmission) -> Result<i32> {
        self.submission_repo().add(submission).await
    }

    pub async fn get_counter(&self, kind: &str) -> Result<i64> {
        self.stats_repo().get_or_init(kind).await
    }

    pub async fn increment_counter(&self, kind: &str) -> Result<i64> {
        self.stats_repo().increment(kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;
    use serde_json::json;

    async fn memory_store() -> Store {
        Store::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_cache_set_then_get() {
        let store = memory_store().await;
        let payload = json!({ "pizzerias": [{ "id": "a" }], "totalResults": 1 });

        store.set_cached("complete:napolitana:rosario", &payload).await.unwrap();

        let cached = store
            .get_cached("complete:napolitana:rosario", chrono::Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(cached, Some(payload));
    }

    #[tokio::test]
    async fn test_cache_set_overwrites_existing_key() {
        let store = memory_store().await;

        store.set_cached("k", &json!(1)).await.unwrap();
        store.set_cached("k", &json!(2)).await.unwrap();

        assert_eq!(store.cache_entry_count().await.unwrap(), 1);
        assert_eq!(
            store.get_cached("k", chrono::Duration::hours(1)).await.unwrap(),
            Some(json!(2))
        );
    }

    #[tokio::test]
    async fn test_expired_entry_is_deleted_on_read() {
        let store = memory_store().await;
        let two_hours_ago =
            chrono::Utc::now().timestamp_millis() - chrono::Duration::hours(2).num_milliseconds();

        store
            .cache_repo()
            .set_at("page:napolitana:rosario:first", &json!([1, 2]), two_hours_ago)
            .await
            .unwrap();
        assert_eq!(store.cache_entry_count().await.unwrap(), 1);

        let cached = store
            .get_cached("page:napolitana:rosario:first", chrono::Duration::hours(1))
            .await
            .unwrap();
        assert!(cached.is_none());
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recreate_cache_empties_table() {
        let store = memory_store().await;
        store.set_cached("a", &json!("x")).await.unwrap();
        store.set_cached("b", &json!("y")).await.unwrap();

        store.recreate_cache().await.unwrap();
        assert_eq!(store.cache_entry_count().await.unwrap(), 0);

        store.set_cached("a", &json!("z")).await.unwrap();
        store.set_cached("a", &json!("w")).await.unwrap();
        assert_eq!(store.cache_entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_visit_counter() {
        let store = memory_store().await;

        assert_eq!(store.get_counter("visits").await.unwrap(), 0);
        assert_eq!(store.get_counter("visits").await.unwrap(), 0);
        assert_eq!(store.increment_counter("visits").await.unwrap(), 1);
        assert_eq!(store.increment_counter("visits").await.unwrap(), 2);
        assert_eq!(store.get_counter("visits").await.unwrap(), 2);

        assert_eq!(store.increment_counter("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_submission() {
        let store = memory_store().await;

        let id = store
            .add_submission(NewSubmission {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                message: "Falta una pizzería".to_string(),
                phone: None,
                city: Some("Rosario".to_string()),
                ip_address: "203.0.113.9".to_string(),
                user_agent: "test".to_string(),
                payload: json!({ "name": "Ana" }),
                submitted_at: chrono::Utc::now().to_rfc3339(),
            })
            .await
            .unwrap();
        assert!(id > 0);

        let recent = crate::entities::prelude::Submissions::find()
            .all(&store.conn)
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].city.as_deref(), Some("Rosario"));
    }
}
