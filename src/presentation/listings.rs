use crate::application::listing_service::SearchQuery;
use crate::domain::listing::CreateListing;
use crate::presentation::handlers::{ApiError, AppState, AuthenticatedHost};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub city: Option<String>,
    pub country: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[instrument(skip(state))]
pub async fn search_listings(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let params = params.into_inner();
    let page = state
        .listing_service
        .search_listings(SearchQuery {
            city: params.city,
            country: params.country,
            page: params.page,
            limit: params.limit,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(state), fields(listing_id = %*path))]
pub async fn get_listing(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let listing = state
        .listing_service
        .get_listing(&path.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(state, host), fields(host_id = %host.0.id))]
pub async fn host_listings(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
) -> Result<HttpResponse, ApiError> {
    let listings = state
        .listing_service
        .host_listings(&host.0.id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(listings))
}

#[instrument(skip(state, host, req), fields(host_id = %host.0.id))]
pub async fn create_listing(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
    req: web::Json<CreateListing>,
) -> Result<HttpResponse, ApiError> {
    let listing = state
        .listing_service
        .create_listing(&host.0, req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(listing_id = %listing.id, "Listing created");
    Ok(HttpResponse::Created().json(listing))
}

#[instrument(skip(state, host, req), fields(host_id = %host.0.id, listing_id = %*path))]
pub async fn update_listing(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
    path: web::Path<String>,
    req: web::Json<CreateListing>,
) -> Result<HttpResponse, ApiError> {
    let listing = state
        .listing_service
        .update_listing(&host.0, &path.into_inner(), req.into_inner())
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(state, host), fields(host_id = %host.0.id, listing_id = %*path))]
pub async fn delete_listing(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .listing_service
        .delete_listing(&host.0, &path.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!("Listing deleted");
    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(state))]
pub async fn cities(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let cities = state
        .listing_service
        .cities()
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(cities))
}
