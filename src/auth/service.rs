//! Registration and login.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::model::{
    normalize_email, LoginRequest, LoginResponse, PublicUser, RegisterRequest,
    RegisterResponse, Role, SessionUser, User,
};
use crate::http::response::ApiError;
use crate::store::{StoreError, UserRepository};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const ADMIN_NAME: &str = "Admin User";

const TOKEN_PREFIX: &str = "mock-jwt-token-";

/// Identity operations over an injected user repository.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create an identity. Email uniqueness is enforced by the store.
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let (Some(name), Some(email), Some(password)) = (
            filled(req.name),
            filled(req.email),
            filled(req.password),
        ) else {
            return Err(ApiError::bad_request("All fields are required"));
        };

        let user = User {
            id: Uuid::new_v4().simple().to_string(),
            name: name.trim().to_string(),
            email: normalize_email(&email),
            password,
            role: Role::User,
            created_at: Utc::now(),
        };

        let user = match self.users.insert(user).await {
            Ok(user) => user,
            Err(StoreError::Duplicate(_)) => {
                return Err(ApiError::bad_request("User already exists"));
            }
            Err(e) => return Err(ApiError::internal("Server error during registration", e)),
        };

        tracing::info!(user_id = %user.id, "User registered");
        Ok(RegisterResponse {
            success: true,
            message: "Registration successful",
            user: PublicUser::from(&user),
        })
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, ApiError> {
        let (Some(email), Some(password)) = (filled(req.email), filled(req.password)) else {
            return Err(ApiError::bad_request("Email and password are required"));
        };

        let user = self
            .users
            .find_by_email(&normalize_email(&email))
            .await
            .map_err(|e| ApiError::internal("Internal server error", e))?;

        match user {
            Some(user) if user.password == password => Ok(LoginResponse {
                success: true,
                message: "Login successful",
                token: format!("{TOKEN_PREFIX}{}", user.id),
                user: SessionUser::from(&user),
            }),
            _ => {
                tracing::debug!("Login rejected");
                Err(ApiError::Unauthorized("Invalid credentials".to_string()))
            }
        }
    }

    /// Insert the default admin identity unless it already exists.
    pub async fn seed_admin(&self) -> Result<(), StoreError> {
        if self.users.find_by_email(ADMIN_EMAIL).await?.is_some() {
            return Ok(());
        }

        let admin = User {
            id: Uuid::new_v4().simple().to_string(),
            name: ADMIN_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
        };
        match self.users.insert(admin).await {
            Ok(_) => {
                tracing::info!(email = ADMIN_EMAIL, "Seeded admin user");
                Ok(())
            }
            // Lost a race with a concurrent seed.
            Err(StoreError::Duplicate(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

fn filled(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
