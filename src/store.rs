//! Data access for drugs: the `DrugStore` seam and its PostgreSQL implementation.

use crate::error::AppError;
use crate::model::{Drug, DrugCreate, DrugFilter, DrugRow, DrugUpdate, Page};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

/// CRUD over drug records. Every method is a single statement against the backing store.
#[async_trait]
pub trait DrugStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Drug>, AppError>;

    /// Filtered list, ordered by name ascending, paginated after filtering.
    async fn list(&self, filter: &DrugFilter, page: Page) -> Result<Vec<Drug>, AppError>;

    /// Distinct categories.
    async fn categories(&self) -> Result<Vec<String>, AppError>;

    /// Insert, or return the existing row unchanged when `drug.id` is already taken.
    async fn create(&self, drug: DrugCreate) -> Result<Drug, AppError>;

    /// Apply present fields and bump `updated_at`. `None` if no such id.
    async fn update(&self, id: &str, changes: &DrugUpdate) -> Result<Option<Drug>, AppError>;

    /// Whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Round-trip to the backing store.
    async fn ping(&self) -> Result<(), AppError>;
}

/// Client-supplied id, or a fresh UUID when absent or blank.
pub fn resolve_id(requested: Option<&str>) -> String {
    match requested {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    }
}

#[derive(Clone)]
pub struct PgDrugStore {
    pool: PgPool,
}

impl PgDrugStore {
    pub fn new(pool: PgPool) -> Self {
        PgDrugStore { pool }
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Drug>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = q.query_as::<DrugRow>().fetch_optional(&self.pool).await?;
        Ok(row.map(Drug::from))
    }

    async fn fetch_all(&self, q: &QueryBuf) -> Result<Vec<Drug>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = q.query_as::<DrugRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Drug::from).collect())
    }
}

#[async_trait]
impl DrugStore for PgDrugStore {
    async fn get(&self, id: &str) -> Result<Option<Drug>, AppError> {
        self.fetch_optional(&sql::select_by_id(id)).await
    }

    async fn list(&self, filter: &DrugFilter, page: Page) -> Result<Vec<Drug>, AppError> {
        self.fetch_all(&sql::select_list(filter, page)).await
    }

    async fn categories(&self) -> Result<Vec<String>, AppError> {
        let q = sql::select_categories();
        tracing::debug!(sql = %q.sql, "query");
        let rows = q.query_as::<(String,)>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    async fn create(&self, drug: DrugCreate) -> Result<Drug, AppError> {
        let id = resolve_id(drug.id.as_deref());
        if let Some(created) = self.fetch_optional(&sql::insert(&id, &drug, Utc::now())).await? {
            tracing::info!(id = %created.id, "drug created");
            return Ok(created);
        }
        // Conflict on id: the stored row is the answer.
        tracing::debug!(id = %id, "drug exists, returning stored row");
        self.get(&id)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, id: &str, changes: &DrugUpdate) -> Result<Option<Drug>, AppError> {
        let updated = self.fetch_optional(&sql::update(id, changes, Utc::now())).await?;
        if updated.is_some() {
            tracing::info!(id = %id, touch_only = changes.is_empty(), "drug updated");
        }
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let q = sql::delete(id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let removed = q.query_as::<(String,)>().fetch_optional(&self.pool).await?;
        if removed.is_some() {
            tracing::info!(id = %id, "drug deleted");
        }
        Ok(removed.is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let q = sql::count();
        let (n,) = q.query_as::<(i64,)>().fetch_one(&self.pool).await?;
        Ok(n)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
