//! Issues repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::enums::IssueStatus,
    models::issue::{CreateIssue, Issue, IssueQuery, IssueShort},
};

#[derive(Clone)]
pub struct IssuesRepository {
    pool: Pool<Postgres>,
}

impl IssuesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get issue by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Issue> {
        sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue with id {} not found", id)))
    }

    /// Resolve a set of issue ids; caller compares counts
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Issue>> {
        let rows = sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// List issues with optional location/status filters, newest first
    pub async fn list(&self, query: &IssueQuery) -> AppResult<(Vec<Issue>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = (page - 1) * limit;

        let rows = sqlx::query_as::<_, Issue>(
            r#"
            SELECT * FROM issues
            WHERE ($1::int IS NULL OR location_id = $1)
              AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.location_id)
        .bind(query.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM issues
            WHERE ($1::int IS NULL OR location_id = $1)
              AND ($2::text IS NULL OR status = $2)
            "#,
        )
        .bind(query.location_id)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows, total))
    }

    /// Create an issue; status always starts at `created`
    pub async fn create(&self, data: &CreateIssue, created_by: i32) -> AppResult<Issue> {
        let row = sqlx::query_as::<_, Issue>(
            r#"
            INSERT INTO issues (location_id, asset_ids, created_by, title, reason, photo_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'created')
            RETURNING *
            "#,
        )
        .bind(data.location_id)
        .bind(&data.asset_ids)
        .bind(created_by)
        .bind(&data.title)
        .bind(&data.reason)
        .bind(&data.photo_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Apply a manual status transition. The current status is re-read under
    /// a row lock inside the transaction so a racing transfer commit cannot
    /// interleave with the check.
    pub async fn update_status(&self, id: i32, next: IssueStatus) -> AppResult<Issue> {
        let mut tx = self.pool.begin().await?;

        let issue = sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Issue with id {} not found", id)))?;

        if !issue.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Invalid status transition: {} -> {}",
                issue.status, next
            )));
        }

        let updated = sqlx::query_as::<_, Issue>(
            "UPDATE issues SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Short representations for populated references
    pub async fn get_shorts(&self, ids: &[i32]) -> AppResult<Vec<IssueShort>> {
        let rows = sqlx::query_as::<_, IssueShort>(
            "SELECT id, title, status FROM issues WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
