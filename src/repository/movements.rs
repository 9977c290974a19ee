//! Movements repository: the atomic transfer phase and audit queries

use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::{ActionType, AssetStatus, IssueStatus},
    models::movement::{Movement, MovementQuery},
};

/// Everything the atomic phase needs, validated beforehand by the service.
pub struct TransferWrite {
    pub asset_ids: Vec<i32>,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub action: ActionType,
    pub new_status: AssetStatus,
    pub done_by: i32,
    pub remark: Option<String>,
    pub issue_ids: Vec<i32>,
}

#[derive(FromRow)]
struct LockedAsset {
    id: i32,
    location_id: i32,
    status: AssetStatus,
}

#[derive(FromRow)]
struct LockedIssue {
    id: i32,
    status: IssueStatus,
}

#[derive(Clone)]
pub struct MovementsRepository {
    pool: Pool<Postgres>,
}

impl MovementsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Execute the write phase of a transfer as one transaction: lock and
    /// re-verify the rows the pre-validation saw, update the assets, insert
    /// the movement record, and advance the linked issues. Either all three
    /// effects commit or none do.
    pub async fn execute_transfer(&self, write: &TransferWrite) -> AppResult<Movement> {
        let mut tx = self.pool.begin().await?;

        // Re-read under row locks. A concurrent transfer that slipped in
        // between validation and here surfaces as a retryable conflict, not
        // as a silently corrupted status/location pair.
        let assets = sqlx::query_as::<_, LockedAsset>(
            "SELECT id, location_id, status FROM individual_assets WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(&write.asset_ids)
        .fetch_all(&mut *tx)
        .await?;

        if assets.len() != write.asset_ids.len() {
            return Err(AppError::Conflict(
                "Some assets no longer exist, please retry".to_string(),
            ));
        }
        for asset in &assets {
            if asset.location_id != write.from_location_id
                || asset.status == AssetStatus::Discarded
            {
                return Err(AppError::Conflict(format!(
                    "Asset {} was moved concurrently, please retry",
                    asset.id
                )));
            }
        }

        let issues = sqlx::query_as::<_, LockedIssue>(
            "SELECT id, status FROM issues WHERE id = ANY($1) FOR UPDATE",
        )
        .bind(&write.issue_ids)
        .fetch_all(&mut *tx)
        .await?;

        if issues.len() != write.issue_ids.len() {
            return Err(AppError::Conflict(
                "Some issues no longer exist, please retry".to_string(),
            ));
        }
        for issue in &issues {
            if issue.status != IssueStatus::Created {
                return Err(AppError::Conflict(format!(
                    "Issue {} was updated concurrently, please retry",
                    issue.id
                )));
            }
        }

        sqlx::query(
            "UPDATE individual_assets SET location_id = $2, status = $3 WHERE id = ANY($1)",
        )
        .bind(&write.asset_ids)
        .bind(write.to_location_id)
        .bind(write.new_status)
        .execute(&mut *tx)
        .await?;

        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO movements
                (asset_ids, from_location_id, to_location_id, action, done_by, remark, issue_ids, moved_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(&write.asset_ids)
        .bind(write.from_location_id)
        .bind(write.to_location_id)
        .bind(write.action)
        .bind(write.done_by)
        .bind(&write.remark)
        .bind(&write.issue_ids)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE issues SET status = 'inProgress' WHERE id = ANY($1)")
            .bind(&write.issue_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(movement)
    }

    /// Get movement by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Movement> {
        sqlx::query_as::<_, Movement>("SELECT * FROM movements WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Movement with id {} not found", id)))
    }

    /// List movements with filters, newest first. `visible_location`
    /// narrows the result to movements touching that location (labIncharge
    /// visibility).
    pub async fn list(
        &self,
        query: &MovementQuery,
        visible_location: Option<i32>,
    ) -> AppResult<(Vec<Movement>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * limit;

        let rows = sqlx::query_as::<_, Movement>(
            r#"
            SELECT * FROM movements
            WHERE ($1::int IS NULL OR from_location_id = $1)
              AND ($2::int IS NULL OR to_location_id = $2)
              AND ($3::text IS NULL OR action = $3)
              AND ($4::int IS NULL OR done_by = $4)
              AND ($5::timestamptz IS NULL OR moved_at >= $5)
              AND ($6::timestamptz IS NULL OR moved_at <= $6)
              AND ($7::int IS NULL OR from_location_id = $7 OR to_location_id = $7)
            ORDER BY moved_at DESC
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(query.from_location_id)
        .bind(query.to_location_id)
        .bind(query.action)
        .bind(query.done_by)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(visible_location)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM movements
            WHERE ($1::int IS NULL OR from_location_id = $1)
              AND ($2::int IS NULL OR to_location_id = $2)
              AND ($3::text IS NULL OR action = $3)
              AND ($4::int IS NULL OR done_by = $4)
              AND ($5::timestamptz IS NULL OR moved_at >= $5)
              AND ($6::timestamptz IS NULL OR moved_at <= $6)
              AND ($7::int IS NULL OR from_location_id = $7 OR to_location_id = $7)
            "#,
        )
        .bind(query.from_location_id)
        .bind(query.to_location_id)
        .bind(query.action)
        .bind(query.done_by)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(visible_location)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// All movements that ever touched one asset, newest first
    pub async fn list_for_asset(&self, asset_id: i32) -> AppResult<Vec<Movement>> {
        let rows = sqlx::query_as::<_, Movement>(
            "SELECT * FROM movements WHERE $1 = ANY(asset_ids) ORDER BY moved_at DESC",
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Movements into/out of one location, newest first, capped at 100
    pub async fn list_for_location(
        &self,
        location_id: i32,
        inward: bool,
        outward: bool,
    ) -> AppResult<Vec<Movement>> {
        let rows = sqlx::query_as::<_, Movement>(
            r#"
            SELECT * FROM movements
            WHERE ($2 AND to_location_id = $1) OR ($3 AND from_location_id = $1)
            ORDER BY moved_at DESC
            LIMIT 100
            "#,
        )
        .bind(location_id)
        .bind(inward)
        .bind(outward)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
