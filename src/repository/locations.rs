//! Locations repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::LocationKind,
    models::location::{Location, LocationShort},
};

#[derive(Clone)]
pub struct LocationsRepository {
    pool: Pool<Postgres>,
}

impl LocationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get location by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Location> {
        sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location with id {} not found", id)))
    }

    /// Case-insensitive lookup by name, used to reject duplicates
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location)
    }

    /// The location a user is currently incharge of, if any. An optional
    /// exclusion lets reassignment to the same location pass.
    pub async fn find_by_incharge(
        &self,
        incharge_id: i32,
        exclude_location: Option<i32>,
    ) -> AppResult<Option<Location>> {
        let location = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE incharge_id = $1 AND ($2::int IS NULL OR id != $2)",
        )
        .bind(incharge_id)
        .bind(exclude_location)
        .fetch_optional(&self.pool)
        .await?;
        Ok(location)
    }

    /// List locations, optionally filtered by kind
    pub async fn list(&self, kind: Option<LocationKind>) -> AppResult<Vec<Location>> {
        let rows = sqlx::query_as::<_, Location>(
            "SELECT * FROM locations WHERE ($1::text IS NULL OR kind = $1) ORDER BY name",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create location
    pub async fn create(
        &self,
        name: &str,
        kind: LocationKind,
        incharge_id: Option<i32>,
    ) -> AppResult<Location> {
        let row = sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (name, kind, incharge_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(kind)
        .bind(incharge_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Location with name {} already exists", name))
            }
            _ => AppError::Database(e),
        })?;
        Ok(row)
    }

    /// Replace (or clear) the incharge of a location
    pub async fn set_incharge(&self, id: i32, incharge_id: Option<i32>) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(
            "UPDATE locations SET incharge_id = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(incharge_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location with id {} not found", id)))
    }

    /// Short representation for populated references
    pub async fn get_short(&self, id: i32) -> AppResult<LocationShort> {
        sqlx::query_as::<_, LocationShort>("SELECT id, name, kind FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location with id {} not found", id)))
    }
}
