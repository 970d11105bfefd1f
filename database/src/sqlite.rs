use crate::ListingStore;
use async_trait::async_trait;
use jobscout_core::{ScoredListing, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

// 8 binds per row; stays under SQLite's default 999-parameter limit.
const ROWS_PER_INSERT: usize = 100;

/// Local `jobs` table, for running without a hosted database.
#[derive(Debug)]
pub struct SqliteStore {
    connection_string: String,
    pool: Option<SqlitePool>,
}

impl SqliteStore {
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            pool: None,
        }
    }

    pub async fn connect(&mut self) -> Result<(), StorageError> {
        let options = SqliteConnectOptions::from_str(&self.connection_string)
            .map_err(|e| StorageError::ConnectionFailed {
                reason: e.to_string(),
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed {
                reason: e.to_string(),
            })?;

        info!("Connected to {}", self.connection_string);
        self.pool = Some(pool);
        Ok(())
    }

    pub async fn run_migrations(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| StorageError::MigrationFailed {
                migration: e.to_string(),
            })
    }

    fn pool(&self) -> Result<&SqlitePool, StorageError> {
        self.pool.as_ref().ok_or_else(|| StorageError::ConnectionFailed {
            reason: "database is not connected".to_string(),
        })
    }
}

#[async_trait]
impl ListingStore for SqliteStore {
    async fn insert_listings(&self, listings: &[ScoredListing]) -> Result<usize, StorageError> {
        if listings.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool()?.begin().await?;
        let mut inserted = 0;

        for chunk in listings.chunks(ROWS_PER_INSERT) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO jobs (title, company, link, description, location, source, created_at, fit_score) ",
            );
            builder.push_values(chunk, |mut row, scored| {
                let listing = &scored.listing;
                row.push_bind(listing.title.clone())
                    .push_bind(listing.company.clone())
                    .push_bind(listing.link.clone())
                    .push_bind(listing.excerpt.clone())
                    .push_bind(listing.location.clone())
                    .push_bind(listing.source.clone())
                    .push_bind(listing.created_at)
                    .push_bind(i64::from(scored.fit_score));
            });

            let result = builder.build().execute(&mut *tx).await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        debug!("Committed {} rows to the jobs table", inserted);

        Ok(inserted)
    }
}

#[cfg(test)]
impl SqliteStore {
    pub(crate) async fn count_listings(&self) -> Result<i64, StorageError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs")
            .fetch_one(self.pool()?)
            .await?;
        Ok(count)
    }

    pub(crate) async fn recent_listings(
        &self,
        limit: i64,
    ) -> Result<Vec<ScoredListing>, StorageError> {
        use sqlx::Row;

        let rows = sqlx::query(
            "SELECT title, company, link, description, location, source, created_at, fit_score \
             FROM jobs ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool()?)
        .await?;

        rows.iter()
            .map(|row| -> Result<ScoredListing, StorageError> {
                let fit_score: i64 = row.try_get("fit_score")?;
                let created_at: chrono::DateTime<chrono::Utc> = row.try_get("created_at")?;
                Ok(ScoredListing::new(
                    jobscout_core::JobListing {
                        title: row.try_get("title")?,
                        company: row.try_get("company")?,
                        link: row.try_get("link")?,
                        excerpt: row.try_get("description")?,
                        location: row.try_get("location")?,
                        source: row.try_get("source")?,
                        created_at,
                    },
                    u8::try_from(fit_score).unwrap_or(u8::MAX),
                ))
            })
            .collect()
    }
}
