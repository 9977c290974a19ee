//! Location model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::LocationKind;
use super::user::UserShort;

/// Location model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub kind: LocationKind,
    /// User assigned as incharge of this location (one-to-one)
    pub incharge_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Short location representation for populated references
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LocationShort {
    pub id: i32,
    pub name: String,
    pub kind: LocationKind,
}

/// Location with its incharge populated
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDetails {
    pub id: i32,
    pub name: String,
    pub kind: LocationKind,
    pub incharge: Option<UserShort>,
    pub created_at: DateTime<Utc>,
}

/// Create location request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLocation {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub kind: LocationKind,
    pub incharge_id: Option<i32>,
}

/// Location list query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct LocationQuery {
    pub kind: Option<LocationKind>,
}

/// Assign incharge request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignIncharge {
    pub incharge_id: i32,
}
