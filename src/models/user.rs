//! User model, roles, and the capability table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    LabAssistant,
    LabIncharge,
    PracticalIncharge,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::LabAssistant => "labAssistant",
            Role::LabIncharge => "labIncharge",
            Role::PracticalIncharge => "practicalIncharge",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "labAssistant" => Ok(Role::LabAssistant),
            "labIncharge" => Ok(Role::LabIncharge),
            "practicalIncharge" => Ok(Role::PracticalIncharge),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Operations gated by role. The single permission table for the whole
/// server; handlers ask for a capability instead of matching role strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageCatalog,
    ManageLocations,
    ManageUsers,
    CreateMovement,
    ViewMovements,
    ReportIssue,
    ResolveIssue,
}

impl Role {
    /// Roles that may hold a location incharge assignment
    pub fn is_incharge_capable(self) -> bool {
        matches!(self, Role::Admin | Role::LabIncharge)
    }

    pub fn allows(self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCatalog => matches!(self, Role::Admin | Role::LabAssistant),
            Capability::ManageLocations => matches!(self, Role::Admin),
            Capability::ManageUsers => matches!(self, Role::Admin),
            Capability::CreateMovement => matches!(self, Role::Admin | Role::LabAssistant),
            // Practical incharges have no access to movement records at all;
            // lab incharges are further narrowed to their own location by the
            // movement queries.
            Capability::ViewMovements => !matches!(self, Role::PracticalIncharge),
            Capability::ReportIssue => true,
            Capability::ResolveIssue => matches!(self, Role::Admin | Role::LabAssistant),
        }
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    /// Location this user is incharge of (labIncharge only, one-to-one)
    pub assigned_location_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Short user representation for populated references
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
}

/// Update user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub name: String,
    pub role: Role,
    pub assigned_location_id: Option<i32>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Require a capability, rejecting with 403 otherwise
    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!(
                "Role {} is not permitted to perform this operation",
                self.role
            )))
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_and_assistant_create_movements() {
        assert!(Role::Admin.allows(Capability::CreateMovement));
        assert!(Role::LabAssistant.allows(Capability::CreateMovement));
        assert!(!Role::LabIncharge.allows(Capability::CreateMovement));
        assert!(!Role::PracticalIncharge.allows(Capability::CreateMovement));
    }

    #[test]
    fn practical_incharge_cannot_view_movements() {
        assert!(!Role::PracticalIncharge.allows(Capability::ViewMovements));
        assert!(Role::LabIncharge.allows(Capability::ViewMovements));
        assert!(Role::Admin.allows(Capability::ViewMovements));
    }

    #[test]
    fn everyone_can_report_issues() {
        for role in [
            Role::Admin,
            Role::LabAssistant,
            Role::LabIncharge,
            Role::PracticalIncharge,
        ] {
            assert!(role.allows(Capability::ReportIssue));
        }
    }

    #[test]
    fn only_admin_and_lab_incharge_hold_assignments() {
        assert!(Role::Admin.is_incharge_capable());
        assert!(Role::LabIncharge.is_incharge_capable());
        assert!(!Role::LabAssistant.is_incharge_capable());
        assert!(!Role::PracticalIncharge.is_incharge_capable());
    }

    #[test]
    fn admin_only_surfaces() {
        assert!(Role::Admin.allows(Capability::ManageUsers));
        assert!(Role::Admin.allows(Capability::ManageLocations));
        assert!(!Role::LabAssistant.allows(Capability::ManageUsers));
        assert!(!Role::LabAssistant.allows(Capability::ManageLocations));
    }
}
