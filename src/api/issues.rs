//! Issue (fault report) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::issue::{CreateIssue, Issue, IssueDetails, IssueQuery, UpdateIssueStatus},
};

use super::AuthenticatedUser;

/// Paginated issue list response
#[derive(Serialize, ToSchema)]
pub struct IssueListResponse {
    pub items: Vec<IssueDetails>,
    pub total: i64,
}

/// List issues, newest first
#[utoipa::path(
    get,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(IssueQuery),
    responses(
        (status = 200, description = "Issues", body = IssueListResponse)
    )
)]
pub async fn list_issues(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<IssueQuery>,
) -> AppResult<Json<IssueListResponse>> {
    let (items, total) = state.services.issues.list(&query).await?;
    Ok(Json(IssueListResponse { items, total }))
}

/// Get one issue with its references
#[utoipa::path(
    get,
    path = "/issues/{id}",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Issue ID")),
    responses(
        (status = 200, description = "Issue", body = IssueDetails),
        (status = 404, description = "Issue not found")
    )
)]
pub async fn get_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<IssueDetails>> {
    let issue = state.services.issues.get_by_id(id).await?;
    Ok(Json(issue))
}

/// Report a fault against assets at a location
#[utoipa::path(
    post,
    path = "/issues",
    tag = "issues",
    security(("bearer_auth" = [])),
    request_body = CreateIssue,
    responses(
        (status = 201, description = "Issue created", body = Issue),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Assets do not belong to the location")
    )
)]
pub async fn create_issue(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateIssue>,
) -> AppResult<(StatusCode, Json<Issue>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let issue = state.services.issues.create(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

/// Apply a manual status transition to an issue
#[utoipa::path(
    put,
    path = "/issues/{id}/status",
    tag = "issues",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Issue ID")),
    request_body = UpdateIssueStatus,
    responses(
        (status = 200, description = "Status updated", body = Issue),
        (status = 404, description = "Issue not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_issue_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateIssueStatus>,
) -> AppResult<Json<Issue>> {
    let issue = state
        .services
        .issues
        .update_status(&claims, id, request.status)
        .await?;
    Ok(Json(issue))
}
