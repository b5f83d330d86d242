use crate::domain::booking::{CreateBooking, ModifyBooking};
use crate::presentation::handlers::{ApiError, AppState, AuthenticatedGuest, AuthenticatedHost};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state, guest, req), fields(guest_id = %guest.0.id, listing_id = %req.listing_id))]
pub async fn create_booking(
    state: web::Data<AppState>,
    guest: AuthenticatedGuest,
    req: web::Json<CreateBooking>,
) -> Result<HttpResponse, ApiError> {
    let booking = state
        .booking_service
        .create_booking(&guest.0, req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(booking_id = %booking.id, "Booking created");
    Ok(HttpResponse::Created().json(booking))
}

#[instrument(skip(state, guest), fields(guest_id = %guest.0.id))]
pub async fn guest_reservations(
    state: web::Data<AppState>,
    guest: AuthenticatedGuest,
) -> Result<HttpResponse, ApiError> {
    let reservations = state
        .booking_service
        .guest_reservations(&guest.0.id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(reservations))
}

#[instrument(skip(state, host), fields(host_id = %host.0.id))]
pub async fn host_reservations(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
) -> Result<HttpResponse, ApiError> {
    let reservations = state
        .booking_service
        .host_reservations(&host.0.id)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(reservations))
}

#[instrument(skip(state, guest), fields(guest_id = %guest.0.id, booking_id = %*path))]
pub async fn cancel_reservation(
    state: web::Data<AppState>,
    guest: AuthenticatedGuest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let booking = state
        .booking_service
        .cancel_booking(&guest.0, &path.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!("Reservation cancelled");
    Ok(HttpResponse::Ok().json(booking))
}

#[instrument(skip(state, guest, req), fields(guest_id = %guest.0.id, booking_id = %*path))]
pub async fn modify_reservation(
    state: web::Data<AppState>,
    guest: AuthenticatedGuest,
    path: web::Path<String>,
    req: web::Json<ModifyBooking>,
) -> Result<HttpResponse, ApiError> {
    let booking = state
        .booking_service
        .modify_booking(&guest.0, &path.into_inner(), req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(total = booking.total_price.inner(), "Reservation modified");
    Ok(HttpResponse::Ok().json(booking))
}

#[instrument(skip(state, host), fields(host_id = %host.0.id, booking_id = %*path))]
pub async fn delete_reservation(
    state: web::Data<AppState>,
    host: AuthenticatedHost,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    state
        .booking_service
        .delete_booking(&host.0, &path.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!("Reservation deleted");
    Ok(HttpResponse::NoContent().finish())
}
