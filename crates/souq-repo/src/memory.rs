use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use souq_types::domain::category::Category;
use souq_types::domain::shipping_zone::{ShippingZone, ZoneKey};
use souq_types::ports::reference_store::{
    CommitSummary, ReferenceStore, SchemaReport, SeedBatch, StoreError,
};
use std::sync::Arc;

use crate::schema;

#[derive(Clone)]
pub struct InMemoryStore {
    pub tables: Arc<DashSet<&'static str>>,
    pub categories: Arc<DashMap<String, Category>>,
    pub shipping_zones: Arc<DashMap<ZoneKey, ShippingZone>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(DashSet::new()),
            categories: Arc::new(DashMap::new()),
            shipping_zones: Arc::new(DashMap::new()),
        }
    }

    fn require_table(&self, name: &str) -> Result<(), StoreError> {
        if self.tables.contains(name) {
            Ok(())
        } else {
            Err(StoreError::DbError(format!("no such table: {name}")))
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReferenceStore for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<SchemaReport, StoreError> {
        let mut report = SchemaReport::default();
        for name in schema::table_names() {
            if self.tables.insert(name) {
                report.created.push(name.to_string());
            } else {
                report.existing.push(name.to_string());
            }
        }
        Ok(report)
    }

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        self.require_table("categories")?;
        Ok(self.categories.get(name).map(|r| r.clone()))
    }

    async fn find_shipping_zone(&self, key: &ZoneKey) -> Result<Option<ShippingZone>, StoreError> {
        self.require_table("uae_shipping_zones")?;
        Ok(self.shipping_zones.get(key).map(|r| r.clone()))
    }

    async fn commit(&self, batch: SeedBatch) -> Result<CommitSummary, StoreError> {
        self.require_table("categories")?;
        self.require_table("uae_shipping_zones")?;

        let mut summary = CommitSummary::default();
        for category in batch.categories {
            if let Entry::Vacant(slot) = self.categories.entry(category.name.clone()) {
                slot.insert(category);
                summary.categories_inserted += 1;
            }
        }
        for zone in batch.shipping_zones {
            if let Entry::Vacant(slot) = self.shipping_zones.entry(zone.key()) {
                slot.insert(zone);
                summary.shipping_zones_inserted += 1;
            }
        }
        Ok(summary)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.require_table("categories")?;
        let mut rows: Vec<Category> = self.categories.iter().map(|kv| kv.value().clone()).collect();
        rows.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, StoreError> {
        self.require_table("uae_shipping_zones")?;
        let mut rows: Vec<ShippingZone> = self
            .shipping_zones
            .iter()
            .map(|kv| kv.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            (&a.emirate, &a.city, &a.area).cmp(&(&b.emirate, &b.city, &b.area))
        });
        Ok(rows)
    }
}
