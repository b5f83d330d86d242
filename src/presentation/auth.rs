use crate::domain::user::{LoginRequest, PublicUser, RegisterRequest};
use crate::presentation::handlers::{ApiError, AppState, TokenClaims};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: PublicUser,
}

#[instrument(skip(state, req), fields(email = %req.email, role = %req.role))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .auth_service
        .register(req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %user.id, "User registered");
    Ok(HttpResponse::Created().json(user))
}

#[instrument(skip(state, req), fields(email = %req.email, role = %req.role))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let (token, user) = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %user.id, "Login successful");
    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

#[instrument(skip(state, claims))]
pub async fn session(
    state: web::Data<AppState>,
    claims: TokenClaims,
) -> Result<HttpResponse, ApiError> {
    let user = state
        .auth_service
        .current_user(claims.0)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(SessionResponse { user }))
}
