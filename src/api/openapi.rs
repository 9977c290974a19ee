//! OpenAPI documentation

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{asset_types, assets, auth, health, issues, locations, movements, users};

/// Registers the bearer scheme referenced by the protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "LabTrack API",
        version = "0.3.0",
        description = "College department asset inventory and movement tracking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Asset types
        asset_types::list_asset_types,
        asset_types::get_asset_type,
        asset_types::create_asset_type,
        asset_types::update_asset_type,
        asset_types::delete_asset_type,
        // Assets
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_asset,
        assets::delete_asset,
        assets::asset_movements,
        // Locations
        locations::list_locations,
        locations::get_location,
        locations::create_location,
        locations::assign_incharge,
        locations::remove_incharge,
        locations::location_movements,
        // Issues
        issues::list_issues,
        issues::get_issue,
        issues::create_issue,
        issues::update_issue_status,
        // Movements
        movements::create_movement,
        movements::list_movements,
        movements::get_movement,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Enums
            crate::models::enums::LocationKind,
            crate::models::enums::AssetStatus,
            crate::models::enums::ActionType,
            crate::models::enums::IssueStatus,
            crate::models::user::Role,
            // Asset types
            crate::models::asset_type::AssetType,
            crate::models::asset_type::AssetTypeShort,
            crate::models::asset_type::CreateAssetType,
            crate::models::asset_type::UpdateAssetType,
            asset_types::AssetTypeListResponse,
            // Assets
            crate::models::asset::IndividualAsset,
            crate::models::asset::AssetShort,
            crate::models::asset::AssetDetails,
            crate::models::asset::CreateAsset,
            crate::models::asset::UpdateAsset,
            assets::AssetListResponse,
            // Locations
            crate::models::location::Location,
            crate::models::location::LocationShort,
            crate::models::location::LocationDetails,
            crate::models::location::CreateLocation,
            crate::models::location::AssignIncharge,
            // Issues
            crate::models::issue::Issue,
            crate::models::issue::IssueShort,
            crate::models::issue::IssueDetails,
            crate::models::issue::CreateIssue,
            crate::models::issue::UpdateIssueStatus,
            issues::IssueListResponse,
            // Movements
            crate::models::movement::Movement,
            crate::models::movement::MovementDetails,
            crate::models::movement::CreateMovement,
            crate::models::movement::MovementResult,
            crate::models::movement::MovementDirection,
            crate::models::movement::LowStockWarning,
            crate::models::movement::LowStockItem,
            movements::MovementListResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "asset-types", description = "Asset type catalog"),
        (name = "assets", description = "Individual asset management"),
        (name = "locations", description = "Location management"),
        (name = "issues", description = "Fault reports"),
        (name = "movements", description = "Asset transfers and discards"),
        (name = "users", description = "User management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("document has components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
