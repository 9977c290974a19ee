//! Asset type (catalog entry) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Asset type model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssetType {
    pub id: i32,
    pub name: String,
    /// Hardware/spec descriptor, e.g. "i5 / 8GB / 512GB SSD"
    pub configuration: String,
    pub rate: Option<Decimal>,
    /// Units taken by this department, not the full purchase order
    pub total_quantity_bought: Option<i32>,
    pub total_cost: Option<Decimal>,
    pub bill_no: Option<String>,
    pub dpr_no: Option<String>,
    /// Low-stock threshold; None or 0 disables the warning for this type
    pub min_quantity: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Short asset type representation for populated references
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssetTypeShort {
    pub id: i32,
    pub name: String,
    pub configuration: String,
}

/// Create asset type request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssetType {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Configuration is required"))]
    pub configuration: String,
    pub rate: Option<Decimal>,
    pub total_quantity_bought: Option<i32>,
    pub total_cost: Option<Decimal>,
    pub bill_no: Option<String>,
    pub dpr_no: Option<String>,
    pub min_quantity: Option<i32>,
}

/// Update asset type request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAssetType {
    pub name: Option<String>,
    pub configuration: Option<String>,
    pub rate: Option<Decimal>,
    pub total_quantity_bought: Option<i32>,
    pub total_cost: Option<Decimal>,
    pub bill_no: Option<String>,
    pub dpr_no: Option<String>,
    pub min_quantity: Option<i32>,
}
