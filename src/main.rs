use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use homestay_api::application::auth_service::AuthService;
use homestay_api::application::booking_service::BookingService;
use homestay_api::application::listing_service::ListingService;
use homestay_api::data::booking_repository::InMemoryBookingRepository;
use homestay_api::data::listing_repository::InMemoryListingRepository;
use homestay_api::data::user_repository::InMemoryUserRepository;
use homestay_api::infrastructure::config::AppConfig;
use homestay_api::infrastructure::logging::init_logging;
use homestay_api::presentation::auth::{login, register, session};
use homestay_api::presentation::handlers::{AppState, health_check};
use homestay_api::presentation::listings::{
    cities, create_listing, delete_listing, get_listing, host_listings, search_listings,
    update_listing,
};
use homestay_api::presentation::middleware::{JwtAuthMiddleware, RequestTraceMiddleware};
use homestay_api::presentation::reservations::{
    cancel_reservation, create_booking, delete_reservation, guest_reservations,
    host_reservations, modify_reservation,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    let config = AppConfig::from_env();

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let listing_repository = Arc::new(InMemoryListingRepository::new());
    let booking_repository = Arc::new(InMemoryBookingRepository::new());

    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        config.jwt_secret.clone(),
    ));
    let listing_service = ListingService::new(listing_repository.clone());
    let booking_service = BookingService::new(
        booking_repository,
        listing_repository,
        user_repository,
    );

    let state = web::Data::new(AppState {
        auth_service,
        listing_service,
        booking_service,
    });

    let jwt_secret = config.jwt_secret.clone();
    info!(address = %config.bind_addr, "Starting HTTP server");
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(RequestTraceMiddleware)
            .wrap(Cors::permissive())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health_check))
                    .route("/auth/register", web::post().to(register))
                    .route("/auth/login", web::post().to(login))
                    .route("/auth/session", web::get().to(session))
                    .route("/cities", web::get().to(cities))
                    // The literal host route must precede the {id} match.
                    .route("/listings/host", web::get().to(host_listings))
                    .route("/listings", web::get().to(search_listings))
                    .route("/listings", web::post().to(create_listing))
                    .route("/listings/{id}", web::get().to(get_listing))
                    .route("/listings/{id}", web::put().to(update_listing))
                    .route("/listings/{id}", web::delete().to(delete_listing))
                    .route("/bookings", web::post().to(create_booking))
                    .route("/reservations/guest", web::get().to(guest_reservations))
                    .route("/reservations/host", web::get().to(host_reservations))
                    .route("/reservations/{id}/cancel", web::put().to(cancel_reservation))
                    .route("/reservations/{id}/modify", web::put().to(modify_reservation))
                    .route("/reservations/{id}", web::delete().to(delete_reservation)),
            )
    })
    .bind(config.bind_addr)?
    .run()
    .await
}
