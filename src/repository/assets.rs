//! Individual assets repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::asset::{AssetQuery, AssetShort, CreateAsset, IndividualAsset, UpdateAsset},
};

#[derive(Clone)]
pub struct AssetsRepository {
    pool: Pool<Postgres>,
}

impl AssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get asset by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<IndividualAsset> {
        sqlx::query_as::<_, IndividualAsset>("SELECT * FROM individual_assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset with id {} not found", id)))
    }

    /// Resolve a set of asset ids. Returns however many exist; the caller
    /// compares the count against the request.
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<IndividualAsset>> {
        let rows = sqlx::query_as::<_, IndividualAsset>(
            "SELECT * FROM individual_assets WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List assets with optional type/location/status filters
    pub async fn list(&self, query: &AssetQuery) -> AppResult<(Vec<IndividualAsset>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * limit;

        let rows = sqlx::query_as::<_, IndividualAsset>(
            r#"
            SELECT * FROM individual_assets
            WHERE ($1::int IS NULL OR asset_type_id = $1)
              AND ($2::int IS NULL OR location_id = $2)
              AND ($3::text IS NULL OR status = $3)
            ORDER BY serial_number
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(query.asset_type_id)
        .bind(query.location_id)
        .bind(query.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM individual_assets
            WHERE ($1::int IS NULL OR asset_type_id = $1)
              AND ($2::int IS NULL OR location_id = $2)
              AND ($3::text IS NULL OR status = $3)
            "#,
        )
        .bind(query.asset_type_id)
        .bind(query.location_id)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Create an individual asset
    pub async fn create(&self, data: &CreateAsset) -> AppResult<IndividualAsset> {
        let row = sqlx::query_as::<_, IndividualAsset>(
            r#"
            INSERT INTO individual_assets
                (asset_type_id, location_id, serial_number, status, purchased_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.asset_type_id)
        .bind(data.location_id)
        .bind(&data.serial_number)
        .bind(data.status)
        .bind(data.purchased_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!(
                    "Serial number {} already exists",
                    data.serial_number
                ))
            }
            _ => AppError::Database(e),
        })?;
        Ok(row)
    }

    /// Update the mutable fields of an asset. Status and location are not
    /// reachable from here; they change only inside a movement transaction.
    pub async fn update(&self, id: i32, data: &UpdateAsset) -> AppResult<IndividualAsset> {
        sqlx::query_as::<_, IndividualAsset>(
            r#"
            UPDATE individual_assets SET
                serial_number = COALESCE($2, serial_number),
                purchased_date = COALESCE($3, purchased_date)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.serial_number)
        .bind(data.purchased_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset with id {} not found", id)))
    }

    /// Delete an asset
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM individual_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Asset with id {} not found", id)));
        }
        Ok(())
    }

    /// Count non-discarded units of a type at a location (low-stock input)
    pub async fn count_at_location(
        &self,
        asset_type_id: i32,
        location_id: i32,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM individual_assets
            WHERE asset_type_id = $1 AND location_id = $2 AND status != 'discarded'
            "#,
        )
        .bind(asset_type_id)
        .bind(location_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Short representations, ordered by serial number
    pub async fn get_shorts(&self, ids: &[i32]) -> AppResult<Vec<AssetShort>> {
        let rows = sqlx::query_as::<_, AssetShort>(
            r#"
            SELECT id, serial_number, status FROM individual_assets
            WHERE id = ANY($1)
            ORDER BY serial_number
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
