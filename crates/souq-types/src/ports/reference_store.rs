use async_trait::async_trait;
use std::time::Duration;

use crate::domain::category::Category;
use crate::domain::shipping_zone::{ShippingZone, ZoneKey};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("invalid connection descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("data store unreachable: {0}")]
    Unreachable(String),

    #[error("data store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("db error: {0}")]
    DbError(String),
}

/// Rows staged by one seeding run, written by a single `commit`.
#[derive(Debug, Clone, Default)]
pub struct SeedBatch {
    pub categories: Vec<Category>,
    pub shipping_zones: Vec<ShippingZone>,
}

impl SeedBatch {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.shipping_zones.is_empty()
    }
}

/// Rows a commit actually wrote. Lower than the batch size when another
/// writer inserted the same natural key first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub categories_inserted: usize,
    pub shipping_zones_inserted: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub created: Vec<String>,
    pub existing: Vec<String>,
}

#[async_trait]
pub trait ReferenceStore: Send + Sync + 'static {
    /// Trivial round trip proving the store answers.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create-if-missing for every schema object. Never drops or alters.
    async fn ensure_schema(&self) -> Result<SchemaReport, StoreError>;

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError>;
    async fn find_shipping_zone(&self, key: &ZoneKey) -> Result<Option<ShippingZone>, StoreError>;

    /// Writes the batch atomically, skipping rows whose natural key already exists.
    async fn commit(&self, batch: SeedBatch) -> Result<CommitSummary, StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, StoreError>;
}
