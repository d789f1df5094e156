use async_trait::async_trait;
use souq_hex::application::bootstrap_service::BootstrapService;
use souq_hex::catalog::default_catalog;
use souq_hex::errors::{BootstrapError, Stage};
use souq_repo::memory::InMemoryStore;
use souq_types::domain::category::Category;
use souq_types::domain::shipping_zone::{ShippingZone, ZoneKey};
use souq_types::ports::reference_store::{
    CommitSummary, ReferenceStore, SchemaReport, SeedBatch, StoreError,
};
use std::sync::{Arc, Mutex};

/// Wraps the in-memory store, records which operations ran and fails the
/// one named in `fail_on`.
#[derive(Clone)]
struct ScriptedStore {
    inner: InMemoryStore,
    fail_on: Option<&'static str>,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl ScriptedStore {
    fn new(fail_on: Option<&'static str>) -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_on,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn record(&self, op: &'static str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        if self.fail_on == Some(op) {
            return Err(StoreError::Unreachable(format!("{op} refused")));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceStore for ScriptedStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.record("ping")?;
        self.inner.ping().await
    }

    async fn ensure_schema(&self) -> Result<SchemaReport, StoreError> {
        self.record("ensure_schema")?;
        self.inner.ensure_schema().await
    }

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        self.record("find_category")?;
        self.inner.find_category(name).await
    }

    async fn find_shipping_zone(&self, key: &ZoneKey) -> Result<Option<ShippingZone>, StoreError> {
        self.record("find_shipping_zone")?;
        self.inner.find_shipping_zone(key).await
    }

    async fn commit(&self, batch: SeedBatch) -> Result<CommitSummary, StoreError> {
        self.record("commit")?;
        self.inner.commit(batch).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.inner.list_categories().await
    }

    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, StoreError> {
        self.inner.list_shipping_zones().await
    }
}

#[tokio::test]
async fn failed_probe_stops_before_schema_and_seeding() {
    let store = ScriptedStore::new(Some("ping"));
    let svc = BootstrapService::new(store.clone());

    let err = svc.run(&default_catalog().unwrap()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::Connectivity(_)));
    assert_eq!(err.stage(), Stage::Connectivity);
    assert_eq!(store.calls(), vec!["ping"]);
}

#[tokio::test]
async fn failed_schema_stops_before_seeding() {
    let store = ScriptedStore::new(Some("ensure_schema"));
    let svc = BootstrapService::new(store.clone());

    let err = svc.run(&default_catalog().unwrap()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::Schema(_)));
    assert_eq!(store.calls(), vec!["ping", "ensure_schema"]);
}

#[tokio::test]
async fn failed_commit_is_a_seeding_error() {
    let store = ScriptedStore::new(Some("commit"));
    let svc = BootstrapService::new(store.clone());

    let err = svc.run(&default_catalog().unwrap()).await.unwrap_err();
    assert!(matches!(err, BootstrapError::Seeding(_)));
    assert_eq!(err.exit_code(), 5);
    assert!(svc.store().list_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn stages_run_in_order_and_commit_once() {
    let store = ScriptedStore::new(None);
    let svc = BootstrapService::new(store.clone());

    svc.run(&default_catalog().unwrap()).await.unwrap();
    let calls = store.calls();
    assert_eq!(&calls[..2], &["ping", "ensure_schema"]);
    assert_eq!(calls.iter().filter(|c| **c == "commit").count(), 1);
    assert_eq!(calls.last(), Some(&"commit"));
}

#[tokio::test]
async fn rerun_on_seeded_store_skips_commit() {
    let store = ScriptedStore::new(None);
    let svc = BootstrapService::new(store.clone());
    let catalog = default_catalog().unwrap();

    svc.run(&catalog).await.unwrap();
    let report = svc.run(&catalog).await.unwrap();

    assert_eq!(report.seeds.categories.inserted, 0);
    assert_eq!(report.seeds.shipping_zones.inserted, 0);
    assert_eq!(report.schema.created.len(), 0);
    assert_eq!(store.calls().iter().filter(|c| **c == "commit").count(), 1);
}
