//! Movement (transfer/discard audit record) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::asset::AssetShort;
use super::enums::ActionType;
use super::issue::IssueShort;
use super::location::LocationShort;
use super::user::UserShort;

/// Movement audit record from database. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Movement {
    pub id: i32,
    pub asset_ids: Vec<i32>,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub action: ActionType,
    pub done_by: i32,
    pub remark: Option<String>,
    pub issue_ids: Vec<i32>,
    pub moved_at: DateTime<Utc>,
}

/// Movement with all references populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MovementDetails {
    pub id: i32,
    pub assets: Vec<AssetShort>,
    pub from_location: LocationShort,
    pub to_location: LocationShort,
    pub action: ActionType,
    pub done_by: UserShort,
    pub remark: Option<String>,
    pub issues: Vec<IssueShort>,
    pub moved_at: DateTime<Utc>,
}

/// Transfer/discard request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateMovement {
    pub asset_ids: Vec<i32>,
    pub from_location_id: i32,
    pub to_location_id: i32,
    pub action: ActionType,
    pub remark: Option<String>,
    /// Issues justifying this movement; every moved asset must be covered
    /// by at least one of them
    pub issue_ids: Vec<i32>,
}

/// One asset type that has fallen to or below its minimum at a location
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LowStockItem {
    pub asset_type_id: i32,
    pub name: String,
    pub configuration: String,
    pub current_quantity: i64,
    pub min_quantity: i32,
    pub deficit: i64,
}

/// Low-stock warning attached to a successful transfer response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LowStockWarning {
    pub message: String,
    pub items: Vec<LowStockItem>,
}

/// Result of a successful transfer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MovementResult {
    pub movement: MovementDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_warning: Option<LowStockWarning>,
}

/// Movement list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct MovementQuery {
    pub from_location_id: Option<i32>,
    pub to_location_id: Option<i32>,
    pub action: Option<ActionType>,
    pub done_by: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Direction filter for per-location movement history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MovementDirection {
    Inward,
    Outward,
    All,
}

/// Per-location movement history query
#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationMovementQuery {
    pub direction: Option<MovementDirection>,
}
