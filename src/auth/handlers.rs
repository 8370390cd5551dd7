use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use crate::auth::model::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::service::AuthService;
use crate::http::response::ApiError;

pub async fn register(
    State(auth): State<AuthService>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let Json(req) = body?;
    let response = auth.register(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(auth): State<AuthService>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(req) = body?;
    Ok(Json(auth.login(req).await?))
}
