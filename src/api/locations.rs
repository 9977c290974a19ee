//! Location endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::location::{AssignIncharge, CreateLocation, LocationDetails, LocationQuery},
    models::movement::{LocationMovementQuery, MovementDetails, MovementDirection},
};

use super::AuthenticatedUser;

/// List locations, optionally filtered by kind
#[utoipa::path(
    get,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(LocationQuery),
    responses(
        (status = 200, description = "Locations", body = Vec<LocationDetails>)
    )
)]
pub async fn list_locations(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<Vec<LocationDetails>>> {
    let locations = state.services.locations.list(query.kind).await?;
    Ok(Json(locations))
}

/// Get one location with its incharge
#[utoipa::path(
    get,
    path = "/locations/{id}",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Location", body = LocationDetails),
        (status = 404, description = "Location not found")
    )
)]
pub async fn get_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LocationDetails>> {
    let location = state.services.locations.get_by_id(id).await?;
    Ok(Json(location))
}

/// Create a location
#[utoipa::path(
    post,
    path = "/locations",
    tag = "locations",
    security(("bearer_auth" = [])),
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location created", body = LocationDetails),
        (status = 403, description = "Not permitted"),
        (status = 409, description = "Name already taken or incharge already assigned")
    )
)]
pub async fn create_location(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<LocationDetails>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let location = state.services.locations.create(&claims, &request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// Assign or replace the incharge of a location
#[utoipa::path(
    put,
    path = "/locations/{id}/incharge",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    request_body = AssignIncharge,
    responses(
        (status = 200, description = "Incharge assigned", body = LocationDetails),
        (status = 404, description = "Location or user not found"),
        (status = 409, description = "Incharge already assigned elsewhere")
    )
)]
pub async fn assign_incharge(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<AssignIncharge>,
) -> AppResult<Json<LocationDetails>> {
    let location = state
        .services
        .locations
        .assign_incharge(&claims, id, request.incharge_id)
        .await?;
    Ok(Json(location))
}

/// Remove the incharge of a location
#[utoipa::path(
    delete,
    path = "/locations/{id}/incharge",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Location ID")),
    responses(
        (status = 200, description = "Incharge removed", body = LocationDetails),
        (status = 404, description = "Location not found")
    )
)]
pub async fn remove_incharge(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<LocationDetails>> {
    let location = state.services.locations.remove_incharge(&claims, id).await?;
    Ok(Json(location))
}

/// Movements into and out of one location
#[utoipa::path(
    get,
    path = "/locations/{id}/movements",
    tag = "locations",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Location ID"),
        LocationMovementQuery
    ),
    responses(
        (status = 200, description = "Movements", body = Vec<MovementDetails>),
        (status = 403, description = "Not permitted"),
        (status = 404, description = "Location not found")
    )
)]
pub async fn location_movements(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Query(query): Query<LocationMovementQuery>,
) -> AppResult<Json<Vec<MovementDetails>>> {
    let direction = query.direction.unwrap_or(MovementDirection::All);
    let movements = state
        .services
        .transfers
        .location_movements(&claims, id, direction)
        .await?;
    Ok(Json(movements))
}
