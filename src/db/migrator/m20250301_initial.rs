use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(cache_table()).await?;
        for index in cache_indexes() {
            manager.create_index(index).await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Submissions::Name).string().not_null())
                    .col(ColumnDef::new(Submissions::Email).string().not_null())
                    .col(ColumnDef::new(Submissions::Message).text().not_null())
                    .col(ColumnDef::new(Submissions::Phone).string())
                    .col(ColumnDef::new(Submissions::City).string())
                    .col(ColumnDef::new(Submissions::IpAddress).string().not_null())
                    .col(ColumnDef::new(Submissions::UserAgent).string().not_null())
                    .col(ColumnDef::new(Submissions::Payload).text().not_null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SiteStats::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteStats::Kind)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SiteStats::Count)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SiteStats::LastUpdated).string().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteStats::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CacheEntries::Table).to_owned())
            .await
    }
}

/// Shared with the admin cache reset, which rebuilds the table from scratch.
pub fn cache_table() -> TableCreateStatement {
    Table::create()
        .table(CacheEntries::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(CacheEntries::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(CacheEntries::Key).string().not_null())
        .col(ColumnDef::new(CacheEntries::Data).text().not_null())
        .col(
            ColumnDef::new(CacheEntries::Timestamp)
                .big_integer()
                .not_null(),
        )
        .to_owned()
}

pub fn cache_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_cache_entries_key")
            .table(CacheEntries::Table)
            .col(CacheEntries::Key)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_cache_entries_timestamp")
            .table(CacheEntries::Table)
            .col(CacheEntries::Timestamp)
            .if_not_exists()
            .to_owned(),
    ]
}

pub fn drop_cache_table() -> TableDropStatement {
    Table::drop()
        .table(CacheEntries::Table)
        .if_exists()
        .to_owned()
}

#[derive(DeriveIden)]
enum CacheEntries {
    Table,
    Id,
    Key,
    Data,
    Timestamp,
}

#[derive(DeriveIden)]
enum Submissions {
    Table,
    Id,
    Name,
    Email,
    Message,
    Phone,
    City,
    IpAddress,
    UserAgent,
    Payload,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum SiteStats {
    Table,
    Kind,
    Count,
    LastUpdated,
}
