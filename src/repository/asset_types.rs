//! Asset type repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::asset_type::{AssetType, AssetTypeShort, CreateAssetType, UpdateAssetType},
};

#[derive(Clone)]
pub struct AssetTypesRepository {
    pool: Pool<Postgres>,
}

impl AssetTypesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all asset types
    pub async fn list(&self) -> AppResult<Vec<AssetType>> {
        let rows = sqlx::query_as::<_, AssetType>("SELECT * FROM asset_types ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get asset type by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<AssetType> {
        sqlx::query_as::<_, AssetType>("SELECT * FROM asset_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset type with id {} not found", id)))
    }

    /// Get a set of asset types by id
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<AssetType>> {
        let rows = sqlx::query_as::<_, AssetType>(
            "SELECT * FROM asset_types WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create asset type
    pub async fn create(&self, data: &CreateAssetType) -> AppResult<AssetType> {
        let row = sqlx::query_as::<_, AssetType>(
            r#"
            INSERT INTO asset_types
                (name, configuration, rate, total_quantity_bought, total_cost,
                 bill_no, dpr_no, min_quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.configuration)
        .bind(data.rate)
        .bind(data.total_quantity_bought)
        .bind(data.total_cost)
        .bind(&data.bill_no)
        .bind(&data.dpr_no)
        .bind(data.min_quantity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update asset type
    pub async fn update(&self, id: i32, data: &UpdateAssetType) -> AppResult<AssetType> {
        sqlx::query_as::<_, AssetType>(
            r#"
            UPDATE asset_types SET
                name = COALESCE($2, name),
                configuration = COALESCE($3, configuration),
                rate = COALESCE($4, rate),
                total_quantity_bought = COALESCE($5, total_quantity_bought),
                total_cost = COALESCE($6, total_cost),
                bill_no = COALESCE($7, bill_no),
                dpr_no = COALESCE($8, dpr_no),
                min_quantity = COALESCE($9, min_quantity)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.configuration)
        .bind(data.rate)
        .bind(data.total_quantity_bought)
        .bind(data.total_cost)
        .bind(&data.bill_no)
        .bind(&data.dpr_no)
        .bind(data.min_quantity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset type with id {} not found", id)))
    }

    /// Delete asset type. Blocked by the foreign key while individual
    /// assets still reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM asset_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    AppError::Conflict(
                        "Asset type is still referenced by individual assets".to_string(),
                    )
                }
                _ => AppError::Database(e),
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Asset type with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Short representation
    pub async fn get_short(&self, id: i32) -> AppResult<AssetTypeShort> {
        sqlx::query_as::<_, AssetTypeShort>(
            "SELECT id, name, configuration FROM asset_types WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset type with id {} not found", id)))
    }
}
