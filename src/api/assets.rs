//! Individual asset endpoints

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
    models::asset::{AssetDetails, AssetQuery, CreateAsset, IndividualAsset, UpdateAsset},
    models::movement::MovementDetails,
};

use super::AuthenticatedUser;

/// Paginated asset list response
#[derive(Serialize, ToSchema)]
pub struct AssetListResponse {
    pub items: Vec<AssetDetails>,
    pub total: i64,
}

/// List assets with optional filters
#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(AssetQuery),
    responses(
        (status = 200, description = "Assets", body = AssetListResponse)
    )
)]
pub async fn list_assets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AssetQuery>,
) -> AppResult<Json<AssetListResponse>> {
    let (items, total) = state.services.catalog.list_assets(&query).await?;
    Ok(Json(AssetListResponse { items, total }))
}

/// Get one asset with its type and location
#[utoipa::path(
    get,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset", body = AssetDetails),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn get_asset(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AssetDetails>> {
    let asset = state.services.catalog.get_asset(id).await?;
    Ok(Json(asset))
}

/// Register an individual asset at a location
#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = CreateAsset,
    responses(
        (status = 201, description = "Asset created", body = IndividualAsset),
        (status = 400, description = "Status does not match the location kind"),
        (status = 409, description = "Serial number already exists")
    )
)]
pub async fn create_asset(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAsset>,
) -> AppResult<(StatusCode, Json<IndividualAsset>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let asset = state.services.catalog.create_asset(&claims, &request).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Update an asset's serial number or purchase date
#[utoipa::path(
    put,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    request_body = UpdateAsset,
    responses(
        (status = 200, description = "Asset updated", body = IndividualAsset),
        (status = 404, description = "Asset not found"),
        (status = 422, description = "Status and location cannot be edited directly")
    )
)]
pub async fn update_asset(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAsset>,
) -> AppResult<Json<IndividualAsset>> {
    let asset = state
        .services
        .catalog
        .update_asset(&claims, id, &request)
        .await?;
    Ok(Json(asset))
}

/// Delete an asset
#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 204, description = "Asset deleted"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn delete_asset(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_asset(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Movement history of one asset, newest first
#[utoipa::path(
    get,
    path = "/assets/{id}/movements",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Movement history", body = Vec<MovementDetails>),
        (status = 403, description = "Not permitted"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn asset_movements(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<MovementDetails>>> {
    let movements = state.services.transfers.asset_history(&claims, id).await?;
    Ok(Json(movements))
}
