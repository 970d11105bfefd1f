pub mod postgrest;
pub mod sqlite;


pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use jobscout_core::{CoreError, ScoredListing, StorageConfig, StorageError};
use std::sync::Arc;

/// Destination table for accepted listings.
pub const JOBS_TABLE: &str = "jobs";

#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Inserts the whole batch in one call and returns the number of rows accepted.
    /// On error no row of the batch is considered saved.
    async fn insert_listings(&self, listings: &[ScoredListing]) -> Result<usize, StorageError>;
}

/// Opens the backend selected by the configuration. SQLite databases are
/// created and migrated on first use.
pub async fn open_store(storage: &StorageConfig) -> Result<Arc<dyn ListingStore>, CoreError> {
    match storage {
        StorageConfig::Postgrest { url, anon_key } => {
            let store = PostgrestStore::new(url.clone(), anon_key.clone())?;
            Ok(Arc::new(store))
        }
        StorageConfig::Sqlite { url } => {
            let mut store = SqliteStore::new(url.clone());
            store.connect().await?;
            store.run_migrations().await?;
            Ok(Arc::new(store))
        }
    }
}
