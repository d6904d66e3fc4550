use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Role, User};
use crate::services::{Database, JwtService, ServiceError};
use crate::utils::password::{verify_password, Password, PasswordHashString};

/// Login request payload.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub roles: Vec<Role>,
}

/// Authentication service. Verifies credentials against the identity
/// store and issues access tokens carrying the role set derived from
/// the user's profiles at login time.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(db: Database, jwt: JwtService) -> Self {
        Self { db, jwt }
    }

    /// Verify e-mail and password. Unknown e-mail and wrong password
    /// collapse into the same `InvalidCredentials` failure.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let user = self
            .db
            .find_user_by_email(email)
            .await
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e)))?
            .ok_or(ServiceError::InvalidCredentials)?;

        let candidate = Password::new(password.to_string());
        let stored = PasswordHashString::new(user.password_hash.clone());
        verify_password(&candidate, &stored).map_err(|_| ServiceError::InvalidCredentials)?;

        Ok(user)
    }

    /// Authenticate and mint an access token.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        let user = self.authenticate(&request.email, &request.password).await?;

        let roles = self
            .db
            .find_roles_for_user(user.user_id)
            .await
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!(e)))?;

        let access_token =
            self.jwt
                .generate_access_token(user.user_id, &user.email, roles.clone())?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            user_id: user.user_id,
            user_email: user.email,
            roles,
        })
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
