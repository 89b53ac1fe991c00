use anyhow::{Result, anyhow};

use crate::db::Store;

pub const VISITS_COUNTER: &str = "visits";

/// Site-wide page visit counter.
pub struct VisitCounter {
    store: Option<Store>,
}

impl VisitCounter {
    #[must_use]
    pub const fn new(store: Option<Store>) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&Store> {
        self.store
            .as_ref()
            .ok_or_else(|| anyhow!("visit counter database is not available"))
    }

    /// Current count; the counter is created at zero on first read.
    pub async fn current(&self) -> Result<i64> {
        self.store()?.get_counter(VISITS_COUNTER).await
    }

    pub async fn record(&self) -> Result<i64> {
        let count = self.store()?.increment_counter(VISITS_COUNTER).await?;
        metrics::counter!("site_visits_total").increment(1);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counter_flow() {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let counter = VisitCounter::new(Some(store));

        assert_eq!(counter.current().await.unwrap(), 0);
        assert_eq!(counter.record().await.unwrap(), 1);
        assert_eq!(counter.record().await.unwrap(), 2);
        assert_eq!(counter.current().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_without_database() {
        let counter = VisitCounter::new(None);
        assert!(!counter.is_available());
        assert!(counter.current().await.is_err());
        assert!(counter.record().await.is_err());
    }
}
