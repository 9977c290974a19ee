//! Movement (transfer/discard) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::movement::{CreateMovement, MovementDetails, MovementQuery, MovementResult},
};

use super::AuthenticatedUser;

/// Paginated movement list response
#[derive(Serialize, ToSchema)]
pub struct MovementListResponse {
    pub items: Vec<MovementDetails>,
    pub total: i64,
}

/// Execute a transfer or discard.
///
/// All business rules are checked before anything is written; on success the
/// assets, the movement record and the linked issues change in one
/// transaction. The response may carry a low-stock warning when the source
/// is a stock-keeping location.
#[utoipa::path(
    post,
    path = "/movements",
    tag = "movements",
    security(("bearer_auth" = [])),
    request_body = CreateMovement,
    responses(
        (status = 201, description = "Movement executed", body = MovementResult),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not permitted"),
        (status = 404, description = "Referenced row not found"),
        (status = 409, description = "Concurrent movement conflict, retry"),
        (status = 422, description = "Business rule violated")
    )
)]
pub async fn create_movement(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateMovement>,
) -> AppResult<(StatusCode, Json<MovementResult>)> {
    let result = state.services.transfers.execute(&claims, request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// List movements visible to the caller
#[utoipa::path(
    get,
    path = "/movements",
    tag = "movements",
    security(("bearer_auth" = [])),
    params(MovementQuery),
    responses(
        (status = 200, description = "Movements", body = MovementListResponse),
        (status = 403, description = "Not permitted")
    )
)]
pub async fn list_movements(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<MovementListResponse>> {
    let (items, total) = state.services.transfers.list(&claims, &query).await?;
    Ok(Json(MovementListResponse { items, total }))
}

/// Get one movement
#[utoipa::path(
    get,
    path = "/movements/{id}",
    tag = "movements",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Movement ID")),
    responses(
        (status = 200, description = "Movement", body = MovementDetails),
        (status = 403, description = "Not permitted"),
        (status = 404, description = "Movement not found")
    )
)]
pub async fn get_movement(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MovementDetails>> {
    let movement = state.services.transfers.get_by_id(&claims, id).await?;
    Ok(Json(movement))
}
