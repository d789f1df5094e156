#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a store feature: `memory` or `sqlite`.");

use souq_types::domain::category::Category;
use souq_types::domain::shipping_zone::{ShippingZone, ZoneKey};
use souq_types::ports::reference_store::{
    CommitSummary, ReferenceStore, SchemaReport, SeedBatch, StoreError,
};
use std::time::Duration;

#[cfg(feature = "memory")]
pub mod memory;
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Store selected at compile time. SQLite wins when both features are on;
/// the in-memory adapter then stays available for tests only.
pub struct Store {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    memory: memory::InMemoryStore,
    #[cfg(feature = "sqlite")]
    sqlite: sqlite::SqliteStore,
}

pub async fn build_store(database_url: &str, probe_timeout: Duration) -> Result<Store, StoreError> {
    Store::build_store(database_url, probe_timeout).await
}

impl Store {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_store(database_url: &str, _: Duration) -> Result<Self, StoreError> {
        if !database_url.starts_with("memory:") {
            return Err(StoreError::InvalidDescriptor(format!(
                "in-memory build expects a `memory:` url, got `{database_url}`"
            )));
        }
        Ok(Self {
            memory: crate::memory::InMemoryStore::new(),
        })
    }

    #[cfg(feature = "sqlite")]
    pub async fn build_store(database_url: &str, probe_timeout: Duration) -> Result<Self, StoreError> {
        let sqlite = sqlite::SqliteStore::connect(database_url, probe_timeout).await?;
        Ok(Self { sqlite })
    }

    #[cfg(feature = "sqlite")]
    fn backend(&self) -> &dyn ReferenceStore {
        &self.sqlite
    }

    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    fn backend(&self) -> &dyn ReferenceStore {
        &self.memory
    }
}

#[async_trait::async_trait]
impl ReferenceStore for Store {
    async fn ping(&self) -> Result<(), StoreError> {
        self.backend().ping().await
    }

    async fn ensure_schema(&self) -> Result<SchemaReport, StoreError> {
        self.backend().ensure_schema().await
    }

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        self.backend().find_category(name).await
    }

    async fn find_shipping_zone(&self, key: &ZoneKey) -> Result<Option<ShippingZone>, StoreError> {
        self.backend().find_shipping_zone(key).await
    }

    async fn commit(&self, batch: SeedBatch) -> Result<CommitSummary, StoreError> {
        self.backend().commit(batch).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.backend().list_categories().await
    }

    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, StoreError> {
        self.backend().list_shipping_zones().await
    }
}
