use crate::errors::BootstrapError;
use souq_types::domain::category::Category;
use souq_types::domain::seed::SeedCatalog;
use souq_types::domain::shipping_zone::ShippingZone;
use souq_types::ports::reference_store::{ReferenceStore, SchemaReport, SeedBatch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOutcome {
    pub inserted: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: TableOutcome,
    pub shipping_zones: TableOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub schema: SchemaReport,
    pub seeds: SeedReport,
}

/// Runs the bootstrap stages against one store. Each stage maps store
/// failures into its own `BootstrapError` variant.
pub struct BootstrapService<S: ReferenceStore> {
    store: S,
}

impl<S: ReferenceStore> BootstrapService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn probe(&self) -> Result<(), BootstrapError> {
        self.store
            .ping()
            .await
            .map_err(BootstrapError::Connectivity)?;
        tracing::info!("database connection successful");
        Ok(())
    }

    pub async fn ensure_schema(&self) -> Result<SchemaReport, BootstrapError> {
        let report = self
            .store
            .ensure_schema()
            .await
            .map_err(BootstrapError::Schema)?;
        tracing::info!(
            created = report.created.len(),
            existing = report.existing.len(),
            "database tables ready"
        );
        Ok(report)
    }

    /// Looks up every seed by natural key and commits the missing ones as a
    /// single batch. Safe to repeat.
    pub async fn seed(&self, catalog: &SeedCatalog) -> Result<SeedReport, BootstrapError> {
        let mut batch = SeedBatch::default();

        for seed in &catalog.categories {
            let existing = self
                .store
                .find_category(seed.natural_key())
                .await
                .map_err(BootstrapError::Seeding)?;
            match existing {
                Some(_) => tracing::debug!(category = %seed.name, "category present"),
                None => batch.categories.push(Category::from_seed(seed)),
            }
        }

        for seed in &catalog.shipping_zones {
            let key = seed.natural_key();
            let existing = self
                .store
                .find_shipping_zone(&key)
                .await
                .map_err(BootstrapError::Seeding)?;
            match existing {
                Some(_) => tracing::debug!(zone = %key, "shipping zone present"),
                None => batch.shipping_zones.push(ShippingZone::from_seed(seed)),
            }
        }

        let summary = if batch.is_empty() {
            Default::default()
        } else {
            self.store
                .commit(batch)
                .await
                .map_err(BootstrapError::Seeding)?
        };

        let report = SeedReport {
            categories: TableOutcome {
                inserted: summary.categories_inserted,
                skipped: catalog.categories.len().saturating_sub(summary.categories_inserted),
            },
            shipping_zones: TableOutcome {
                inserted: summary.shipping_zones_inserted,
                skipped: catalog.shipping_zones.len().saturating_sub(summary.shipping_zones_inserted),
            },
        };
        tracing::info!(
            categories_inserted = report.categories.inserted,
            categories_skipped = report.categories.skipped,
            zones_inserted = report.shipping_zones.inserted,
            zones_skipped = report.shipping_zones.skipped,
            "reference data seeded"
        );
        Ok(report)
    }

    /// Probe, then schema, then seed. Stops at the first failure.
    pub async fn run(&self, catalog: &SeedCatalog) -> Result<InitReport, BootstrapError> {
        self.probe().await?;
        let schema = self.ensure_schema().await?;
        let seeds = self.seed(catalog).await?;
        Ok(InitReport { schema, seeds })
    }
}
