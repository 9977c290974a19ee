//! Individual asset model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::asset_type::AssetTypeShort;
use super::enums::AssetStatus;
use super::location::LocationShort;

/// Individual (serialized) asset model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct IndividualAsset {
    pub id: i32,
    pub asset_type_id: i32,
    pub location_id: i32,
    pub serial_number: String,
    pub status: AssetStatus,
    pub purchased_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Short asset representation for populated references
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssetShort {
    pub id: i32,
    pub serial_number: String,
    pub status: AssetStatus,
}

/// Asset with its type and location populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssetDetails {
    pub id: i32,
    pub serial_number: String,
    pub status: AssetStatus,
    pub purchased_date: Option<NaiveDate>,
    pub asset_type: AssetTypeShort,
    pub location: LocationShort,
    pub created_at: DateTime<Utc>,
}

/// Create asset request. The status must match the resting status of the
/// target location's kind; intake of already-discarded hardware goes
/// straight to a scrap location.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAsset {
    pub asset_type_id: i32,
    pub location_id: i32,
    #[validate(length(min = 1, message = "Serial number is required"))]
    pub serial_number: String,
    pub status: AssetStatus,
    pub purchased_date: Option<NaiveDate>,
}

/// Update asset request. Status and location are deliberately absent and
/// unknown fields are rejected: those two fields change only through the
/// movement subsystem.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAsset {
    pub serial_number: Option<String>,
    pub purchased_date: Option<NaiveDate>,
}

/// Asset list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct AssetQuery {
    pub asset_type_id: Option<i32>,
    pub location_id: Option<i32>,
    pub status: Option<AssetStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
