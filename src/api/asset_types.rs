//! Asset type catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::asset_type::{AssetType, CreateAssetType, UpdateAssetType},
};

use super::AuthenticatedUser;

/// Asset type list response
#[derive(Serialize, ToSchema)]
pub struct AssetTypeListResponse {
    pub items: Vec<AssetType>,
    pub total: usize,
}

/// List all asset types
#[utoipa::path(
    get,
    path = "/asset-types",
    tag = "asset-types",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Asset types", body = AssetTypeListResponse)
    )
)]
pub async fn list_asset_types(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<AssetTypeListResponse>> {
    let items = state.services.catalog.list_asset_types().await?;
    let total = items.len();
    Ok(Json(AssetTypeListResponse { items, total }))
}

/// Get one asset type
#[utoipa::path(
    get,
    path = "/asset-types/{id}",
    tag = "asset-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset type ID")),
    responses(
        (status = 200, description = "Asset type", body = AssetType),
        (status = 404, description = "Asset type not found")
    )
)]
pub async fn get_asset_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AssetType>> {
    let asset_type = state.services.catalog.get_asset_type(id).await?;
    Ok(Json(asset_type))
}

/// Create an asset type
#[utoipa::path(
    post,
    path = "/asset-types",
    tag = "asset-types",
    security(("bearer_auth" = [])),
    request_body = CreateAssetType,
    responses(
        (status = 201, description = "Asset type created", body = AssetType),
        (status = 400, description = "Invalid request"),
        (status = 403, description = "Not permitted")
    )
)]
pub async fn create_asset_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateAssetType>,
) -> AppResult<(StatusCode, Json<AssetType>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let asset_type = state
        .services
        .catalog
        .create_asset_type(&claims, &request)
        .await?;
    Ok((StatusCode::CREATED, Json(asset_type)))
}

/// Update an asset type
#[utoipa::path(
    put,
    path = "/asset-types/{id}",
    tag = "asset-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset type ID")),
    request_body = UpdateAssetType,
    responses(
        (status = 200, description = "Asset type updated", body = AssetType),
        (status = 404, description = "Asset type not found")
    )
)]
pub async fn update_asset_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateAssetType>,
) -> AppResult<Json<AssetType>> {
    let asset_type = state
        .services
        .catalog
        .update_asset_type(&claims, id, &request)
        .await?;
    Ok(Json(asset_type))
}

/// Delete an asset type
#[utoipa::path(
    delete,
    path = "/asset-types/{id}",
    tag = "asset-types",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset type ID")),
    responses(
        (status = 204, description = "Asset type deleted"),
        (status = 404, description = "Asset type not found"),
        (status = 409, description = "Asset type still referenced")
    )
)]
pub async fn delete_asset_type(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_asset_type(&claims, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
