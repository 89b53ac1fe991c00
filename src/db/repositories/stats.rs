use crate::entities::{prelude::*, site_stats};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};

pub struct StatsRepository {
    conn: DatabaseConnection,
}

impl StatsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Current value of counter `kind`, creating it at zero when absent.
    pub async fn get_or_init(&self, kind: &str) -> Result<i64> {
        if let Some(row) = SiteStats::find_by_id(kind.to_string())
            .one(&self.conn)
            .await?
        {
            return Ok(row.count);
        }

        let active_model = site_stats::ActiveModel {
            kind: Set(kind.to_string()),
            count: Set(0),
            last_updated: Set(chrono::Utc::now().to_rfc3339()),
        };

        match SiteStats::insert(active_model)
            .on_conflict(
                OnConflict::column(site_stats::Column::Kind)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await
        {
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(SiteStats::find_by_id(kind.to_string())
            .one(&self.conn)
            .await?
            .map_or(0, |row| row.count))
    }

    /// Adds one to counter `kind` (creating it at one) and returns the new value.
    pub async fn increment(&self, kind: &str) -> Result<i64> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = site_stats::ActiveModel {
            kind: Set(kind.to_string()),
            count: Set(1),
            last_updated: Set(now.clone()),
        };

        SiteStats::insert(active_model)
            .on_conflict(
                OnConflict::column(site_stats::Column::Kind)
                    .value(
                        site_stats::Column::Count,
                        Expr::col((site_stats::Entity, site_stats::Column::Count)).add(1),
                    )
                    .value(site_stats::Column::LastUpdated, now)
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(SiteStats::find_by_id(kind.to_string())
            .one(&self.conn)
            .await?
            .map_or(1, |row| row.count))
    }
}
