use async_trait::async_trait;
use chrono::{DateTime, Utc};
use souq_types::domain::category::Category;
use souq_types::domain::shipping_zone::{DeliveryZone, ShippingZone, ZoneKey};
use souq_types::ports::reference_store::{
    CommitSummary, ReferenceStore, SchemaReport, SeedBatch, StoreError,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::schema::SCHEMA;

pub struct SqliteStore {
    pool: SqlitePool,
    probe_timeout: Duration,
}

#[derive(FromRow)]
struct DbCategory {
    id: String,
    name: String,
    parent_id: Option<String>,
    icon_url: Option<String>,
    is_active: bool,
    sort_order: i64,
    created_at: String,
}

#[derive(FromRow)]
struct DbShippingZone {
    id: String,
    emirate: String,
    city: String,
    area: String,
    postal_code: Option<String>,
    delivery_zone: String,
    standard_delivery_days: i64,
    express_delivery_available: bool,
    cod_available: bool,
    shipping_cost_fils: i64,
    is_active: bool,
    created_at: String,
}

fn db_err(e: impl ToString) -> StoreError {
    StoreError::DbError(e.to_string())
}

fn parse_uuid(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(db_err)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(db_err)?
        .with_timezone(&Utc))
}

impl DbCategory {
    fn into_category(self) -> Result<Category, StoreError> {
        Ok(Category {
            id: parse_uuid(&self.id)?,
            name: self.name,
            parent_id: self.parent_id.as_deref().map(parse_uuid).transpose()?,
            icon_url: self.icon_url,
            is_active: self.is_active,
            sort_order: self.sort_order,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl DbShippingZone {
    fn into_zone(self) -> Result<ShippingZone, StoreError> {
        let delivery_zone = DeliveryZone::from_label(&self.delivery_zone).ok_or_else(|| {
            StoreError::DbError(format!("unknown delivery zone `{}`", self.delivery_zone))
        })?;
        Ok(ShippingZone {
            id: parse_uuid(&self.id)?,
            emirate: self.emirate,
            city: self.city,
            area: self.area,
            postal_code: self.postal_code,
            delivery_zone,
            standard_delivery_days: self.standard_delivery_days,
            express_delivery_available: self.express_delivery_available,
            cod_available: self.cod_available,
            shipping_cost_fils: self.shipping_cost_fils,
            is_active: self.is_active,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

const CATEGORY_COLUMNS: &str = "id, name, parent_id, icon_url, is_active, sort_order, created_at";
const ZONE_COLUMNS: &str = "id, emirate, city, area, postal_code, delivery_zone, standard_delivery_days, \
     express_delivery_available, cod_available, shipping_cost_fils, is_active, created_at";

/// Runs `fut`, mapping a connect-phase failure to `Unreachable` and an elapsed
/// deadline to `Timeout`.
async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StoreError::Unreachable(e.to_string())),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// Creates missing tables and natural-key indexes on a connection that
/// already holds the write lock.
async fn apply_schema(conn: &mut SqliteConnection) -> Result<SchemaReport, StoreError> {
    let mut report = SchemaReport::default();

    for object in SCHEMA {
        let present: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(object.name)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;

        if present > 0 {
            report.existing.push(object.name.to_string());
        } else {
            sqlx::query(object.ddl)
                .execute(&mut *conn)
                .await
                .map_err(|e| StoreError::DbError(format!("creating {}: {e}", object.name)))?;
            tracing::debug!(table = object.name, "created table");
            report.created.push(object.name.to_string());
        }

        if let Some(index) = object.natural_key {
            sqlx::query(index).execute(&mut *conn).await.map_err(|e| {
                StoreError::DbError(format!("indexing {} natural key: {e}", object.name))
            })?;
        }
    }

    Ok(report)
}

impl SqliteStore {
    /// Opens the pool without touching the schema. `probe_timeout` bounds the
    /// connect here and every later `ping`.
    pub async fn connect(database_url: &str, probe_timeout: Duration) -> Result<Self, StoreError> {
        if !database_url.starts_with("sqlite:") {
            return Err(StoreError::InvalidDescriptor(format!(
                "expected a `sqlite:` url, got `{database_url}`"
            )));
        }

        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if !in_memory {
                let path = path.split('?').next().unwrap_or(path);
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await.map_err(|e| {
                            StoreError::Unreachable(format!("{}: {e}", parent.display()))
                        })?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::InvalidDescriptor(e.to_string()))?
            .create_if_missing(true);

        // Every pooled connection to `:memory:` is a separate database.
        let max_connections = if in_memory { 1 } else { 4 };
        let pool = bounded(
            probe_timeout,
            SqlitePoolOptions::new()
                .max_connections(max_connections)
                .acquire_timeout(probe_timeout)
                .connect_with(options),
        )
        .await?;

        tracing::debug!(url = %database_url, "sqlite pool opened");
        Ok(Self {
            pool,
            probe_timeout,
        })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReferenceStore for SqliteStore {
    async fn ping(&self) -> Result<(), StoreError> {
        let one: i64 = bounded(
            self.probe_timeout,
            sqlx::query_scalar("SELECT 1").fetch_one(&self.pool),
        )
        .await?;
        if one != 1 {
            return Err(StoreError::Unreachable(format!(
                "round trip returned {one}, expected 1"
            )));
        }
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<SchemaReport, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        // A deferred reader fails with SQLITE_BUSY when it later upgrades to a
        // writer; take the write lock before reading sqlite_master.
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;

        match apply_schema(&mut conn).await {
            Ok(report) => {
                if let Err(e) = sqlx::query("COMMIT").execute(&mut *conn).await {
                    let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                    return Err(db_err(e));
                }
                Ok(report)
            }
            Err(e) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(e)
            }
        }
    }

    async fn find_category(&self, name: &str) -> Result<Option<Category>, StoreError> {
        let row: Option<DbCategory> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(|r| r.into_category()).transpose()
    }

    async fn find_shipping_zone(&self, key: &ZoneKey) -> Result<Option<ShippingZone>, StoreError> {
        let row: Option<DbShippingZone> = sqlx::query_as(&format!(
            "SELECT {ZONE_COLUMNS} FROM uae_shipping_zones WHERE emirate = ? AND city = ? AND area = ?"
        ))
        .bind(&key.emirate)
        .bind(&key.city)
        .bind(&key.area)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.map(|r| r.into_zone()).transpose()
    }

    async fn commit(&self, batch: SeedBatch) -> Result<CommitSummary, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut summary = CommitSummary::default();

        for category in &batch.categories {
            let res = sqlx::query(&format!(
                "INSERT INTO categories ({CATEGORY_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(name) DO NOTHING"
            ))
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(category.parent_id.map(|id| id.to_string()))
            .bind(&category.icon_url)
            .bind(category.is_active)
            .bind(category.sort_order)
            .bind(category.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
            summary.categories_inserted += res.rows_affected() as usize;
        }

        for zone in &batch.shipping_zones {
            let res = sqlx::query(&format!(
                "INSERT INTO uae_shipping_zones ({ZONE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                 ON CONFLICT(emirate, city, area) DO NOTHING"
            ))
            .bind(zone.id.to_string())
            .bind(&zone.emirate)
            .bind(&zone.city)
            .bind(&zone.area)
            .bind(&zone.postal_code)
            .bind(zone.delivery_zone.label())
            .bind(zone.standard_delivery_days)
            .bind(zone.express_delivery_available)
            .bind(zone.cod_available)
            .bind(zone.shipping_cost_fils)
            .bind(zone.is_active)
            .bind(zone.created_at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
            summary.shipping_zones_inserted += res.rows_affected() as usize;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(summary)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<DbCategory> = sqlx::query_as(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY sort_order, name"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|r| r.into_category())
            .collect::<Result<Vec<_>, _>>()
    }

    async fn list_shipping_zones(&self) -> Result<Vec<ShippingZone>, StoreError> {
        let rows: Vec<DbShippingZone> = sqlx::query_as(&format!(
            "SELECT {ZONE_COLUMNS} FROM uae_shipping_zones ORDER BY emirate, city, area"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|r| r.into_zone())
            .collect::<Result<Vec<_>, _>>()
    }
}
