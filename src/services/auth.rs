//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User, UserClaims, UserShort},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by email and password, returning a JWT and the user
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user))
    }

    /// Build claims and sign a token for a user
    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            name: user.name.clone(),
            role: user.role,
            assigned_location_id: user.assigned_location_id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    // --- User management (admin only, gated at the API layer) --------------

    pub async fn list_users(&self) -> AppResult<Vec<UserShort>> {
        self.repository.users.list().await
    }

    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn create_user(&self, data: &CreateUser) -> AppResult<User> {
        let hash = self.hash_password(&data.password)?;
        self.repository.users.create(data, &hash).await
    }

    pub async fn update_user(&self, id: i32, data: &UpdateUser) -> AppResult<User> {
        let current = self.repository.users.get_by_id(id).await?;
        let hash = match &data.password {
            Some(password) => Some(self.hash_password(password)?),
            None => None,
        };
        let updated = self.repository.users.update(id, data, hash.as_deref()).await?;

        // A role change away from incharge-capable releases the location
        // mirror on both sides, same as deletion does
        if let Some(location_id) = current.assigned_location_id {
            if !updated.role.is_incharge_capable() {
                self.repository.locations.set_incharge(location_id, None).await?;
                self.repository.users.set_assigned_location(id, None).await?;
                return self.repository.users.get_by_id(id).await;
            }
        }

        Ok(updated)
    }

    pub async fn delete_user(&self, id: i32) -> AppResult<()> {
        let user = self.repository.users.get_by_id(id).await?;

        // Release the location mirror before the row disappears
        if let Some(location_id) = user.assigned_location_id {
            self.repository.locations.set_incharge(location_id, None).await?;
        }

        self.repository.users.delete(id).await
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(&user.password)
            .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
