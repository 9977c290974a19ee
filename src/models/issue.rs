//! Issue (fault report) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::asset::AssetShort;
use super::enums::IssueStatus;
use super::location::LocationShort;
use super::user::UserShort;

/// Issue model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Issue {
    pub id: i32,
    pub location_id: i32,
    /// Assets this fault report covers; all must reside at `location_id`
    pub asset_ids: Vec<i32>,
    pub created_by: i32,
    pub title: String,
    pub reason: String,
    pub photo_url: Option<String>,
    pub status: IssueStatus,
    pub created_at: DateTime<Utc>,
}

/// Short issue representation for populated references
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct IssueShort {
    pub id: i32,
    pub title: String,
    pub status: IssueStatus,
}

/// Issue with its references populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IssueDetails {
    pub id: i32,
    pub title: String,
    pub reason: String,
    pub photo_url: Option<String>,
    pub status: IssueStatus,
    pub location: LocationShort,
    pub assets: Vec<AssetShort>,
    pub created_by: UserShort,
    pub created_at: DateTime<Utc>,
}

/// Create issue request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIssue {
    pub location_id: i32,
    #[validate(length(min = 1, message = "At least one asset is required"))]
    pub asset_ids: Vec<i32>,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Reason is required"))]
    pub reason: String,
    pub photo_url: Option<String>,
}

/// Manual status update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIssueStatus {
    pub status: IssueStatus,
}

/// Issue list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct IssueQuery {
    pub location_id: Option<i32>,
    pub status: Option<IssueStatus>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}
