use crate::application::auth_service::AuthService;
use crate::application::booking_service::BookingService;
use crate::application::listing_service::ListingService;
use crate::data::booking_repository::InMemoryBookingRepository;
use crate::data::listing_repository::InMemoryListingRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{Role, User};
use crate::infrastructure::security::Claims;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub listing_service: ListingService<InMemoryListingRepository>,
    pub booking_service: BookingService<
        InMemoryBookingRepository,
        InMemoryListingRepository,
        InMemoryUserRepository,
    >,
}

/// Every failure leaves the service as `{ "error": string }` with the
/// status code mapped from the taxonomy.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ApiError::Validation(_) | ApiError::Unavailable(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = self.to_string();

        match self {
            ApiError::Internal(_) => error!(error = %error, status = %status, "Request failed"),
            _ => warn!(error = %error, status = %status, "Request rejected"),
        }

        HttpResponse::build(status).json(ErrorResponse { error })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::Auth(msg)) => ApiError::Auth(msg.clone()),
            Some(DomainError::Forbidden(msg)) => ApiError::Forbidden(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Conflict(msg)) => ApiError::Conflict(msg.clone()),
            Some(DomainError::Unavailable(msg)) => ApiError::Unavailable(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            // Repository failures surface here.
            None => ApiError::Internal(err.to_string()),
        }
    }
}

/// Verified token claims stashed by the JWT middleware, if any. Public
/// routes see `None`.
pub struct TokenClaims(pub Option<Claims>);

impl FromRequest for TokenClaims {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Ok(TokenClaims(req.extensions().get::<Claims>().cloned())))
    }
}

async fn authorize(
    state: Option<web::Data<AppState>>,
    claims: Option<Claims>,
    role: Role,
) -> Result<User, ApiError> {
    let state =
        state.ok_or_else(|| ApiError::Internal("Application state missing".to_string()))?;
    state
        .auth_service
        .authorize(claims, role)
        .await
        .map_err(ApiError::from)
}

/// A caller proven to hold the guest role, re-checked against the user
/// store on every request.
pub struct AuthenticatedGuest(pub User);

impl FromRequest for AuthenticatedGuest {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();
        Box::pin(async move {
            authorize(state, claims, Role::Guest)
                .await
                .map(AuthenticatedGuest)
        })
    }
}

/// A caller proven to hold the host role.
pub struct AuthenticatedHost(pub User);

impl FromRequest for AuthenticatedHost {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let claims = req.extensions().get::<Claims>().cloned();
        let state = req.app_data::<web::Data<AppState>>().cloned();
        Box::pin(async move {
            authorize(state, claims, Role::Host)
                .await
                .map(AuthenticatedHost)
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
