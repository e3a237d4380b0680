//! Queries for the `visit_records` table and the Postgres-backed [`VisitStore`].

use chrono::{DateTime, Utc};
use fogmap_grid::{VisitRecord, VisitStore};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `visit_records` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitRecordRow {
    pub id: i64,
    pub owner_id: String,
    /// Nullable in the schema; listing queries filter NULLs out.
    pub coordinate: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitRecordRow> for VisitRecord {
    fn from(row: VisitRecordRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            // An empty coordinate is treated as malformed and skipped when
            // the explored set is derived.
            coordinate: row.coordinate.unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VISIT_COLUMNS: &str = "id, owner_id, coordinate, created_at, updated_at";

/// Fetch the visit an owner recorded at exactly `coordinate`, if any.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn find_visit(
    pool: &PgPool,
    owner_id: &str,
    coordinate: &str,
) -> Result<Option<VisitRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitRecordRow>(&format!(
        "SELECT {VISIT_COLUMNS} FROM visit_records \
         WHERE owner_id = $1 AND coordinate = $2"
    ))
    .bind(owner_id)
    .bind(coordinate)
    .fetch_optional(pool)
    .await
}

/// Bump `updated_at` on an existing visit.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no visit has `id`, or [`DbError::Sqlx`]
/// if the query fails.
pub async fn touch_visit(pool: &PgPool, id: i64) -> Result<VisitRecordRow, DbError> {
    sqlx::query_as::<_, VisitRecordRow>(&format!(
        "UPDATE visit_records SET updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {VISIT_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Insert a visit, or bump `updated_at` if the `(owner_id, coordinate)` pair
/// already exists.
///
/// Returns the row and whether it was newly inserted. The conflict clause
/// makes concurrent first visits to the same coordinate safe.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn create_or_touch_visit(
    pool: &PgPool,
    owner_id: &str,
    coordinate: &str,
) -> Result<(VisitRecordRow, bool), sqlx::Error> {
    #[derive(sqlx::FromRow)]
    struct UpsertRow {
        #[sqlx(flatten)]
        visit: VisitRecordRow,
        is_new: bool,
    }

    let row = sqlx::query_as::<_, UpsertRow>(&format!(
        "INSERT INTO visit_records (owner_id, coordinate) \
         VALUES ($1, $2) \
         ON CONFLICT (owner_id, coordinate) DO UPDATE SET updated_at = NOW() \
         RETURNING {VISIT_COLUMNS}, (xmax = 0) AS is_new"
    ))
    .bind(owner_id)
    .bind(coordinate)
    .fetch_one(pool)
    .await?;

    Ok((row.visit, row.is_new))
}

/// All visits for an owner that carry a coordinate, oldest first.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn list_visits_for_owner(
    pool: &PgPool,
    owner_id: &str,
) -> Result<Vec<VisitRecordRow>, sqlx::Error> {
    sqlx::query_as::<_, VisitRecordRow>(&format!(
        "SELECT {VISIT_COLUMNS} FROM visit_records \
         WHERE owner_id = $1 AND coordinate IS NOT NULL \
         ORDER BY created_at, id"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

// ---------------------------------------------------------------------------
// VisitStore
// ---------------------------------------------------------------------------

/// [`VisitStore`] backed by the `visit_records` table.
#[derive(Debug, Clone)]
pub struct PgVisitStore {
    pool: PgPool,
}

impl PgVisitStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl VisitStore for PgVisitStore {
    type Error = DbError;

    async fn find_visit(
        &self,
        owner_id: &str,
        coordinate: &str,
    ) -> Result<Option<VisitRecord>, DbError> {
        Ok(find_visit(&self.pool, owner_id, coordinate)
            .await?
            .map(VisitRecord::from))
    }

    async fn touch_visit(&self, id: i64) -> Result<VisitRecord, DbError> {
        touch_visit(&self.pool, id).await.map(VisitRecord::from)
    }

    async fn create_visit(
        &self,
        owner_id: &str,
        coordinate: &str,
    ) -> Result<(VisitRecord, bool), DbError> {
        let (row, is_new) = create_or_touch_visit(&self.pool, owner_id, coordinate).await?;
        Ok((row.into(), is_new))
    }

    async fn list_visits(&self, owner_id: &str) -> Result<Vec<VisitRecord>, DbError> {
        Ok(list_visits_for_owner(&self.pool, owner_id)
            .await?
            .into_iter()
            .map(VisitRecord::from)
            .collect())
    }
}
