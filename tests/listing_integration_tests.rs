use actix_web::{App, test, web};
use homestay_api::application::auth_service::AuthService;
use homestay_api::application::booking_service::BookingService;
use homestay_api::application::listing_service::ListingService;
use homestay_api::data::booking_repository::InMemoryBookingRepository;
use homestay_api::data::listing_repository::InMemoryListingRepository;
use homestay_api::data::user_repository::InMemoryUserRepository;
use homestay_api::presentation::auth::{login, register};
use homestay_api::presentation::handlers::AppState;
use homestay_api::presentation::listings::{
    cities, create_listing, delete_listing, get_listing, host_listings, search_listings,
    update_listing,
};
use homestay_api::presentation::middleware::JwtAuthMiddleware;
use std::sync::Arc;

macro_rules! setup_listing_test {
    () => {{
        let user_repository = Arc::new(InMemoryUserRepository::new());
        let listing_repository = Arc::new(InMemoryListingRepository::new());
        let booking_repository = Arc::new(InMemoryBookingRepository::new());
        let jwt_secret = "test-secret-key-for-listing-tests".to_string();

        let auth_service = Arc::new(AuthService::new(
            user_repository.clone(),
            jwt_secret.clone(),
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

        test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .service(
                    web::scope("/api")
                        .route("/auth/register", web::post().to(register))
                        .route("/auth/login", web::post().to(login))
                        .route("/cities", web::get().to(cities))
                        .route("/listings/host", web::get().to(host_listings))
                        .route("/listings", web::get().to(search_listings))
                        .route("/listings", web::post().to(create_listing))
                        .route("/listings/{id}", web::get().to(get_listing))
                        .route("/listings/{id}", web::put().to(update_listing))
                        .route("/listings/{id}", web::delete().to(delete_listing)),
                ),
        )
        .await
    }};
}

/// Registers a user and returns a bearer token for them.
macro_rules! signup {
    ($app:expr, $email:expr, $role:expr) => {{
        let mut payload = serde_json::json!({
            "email": $email,
            "password": "password123",
            "role": $role,
            "firstName": "Test",
            "lastName": "User"
        });
        if $role == "host" {
            let extra = serde_json::json!({
                "phoneNumber": "+27111234567",
                "profilePicture": "https://example.com/pic.jpg",
                "languages": ["English"],
                "address": {
                    "street": "1 Main Rd",
                    "city": "Cape Town",
                    "state": "WC",
                    "zipCode": "8001",
                    "country": "South Africa"
                }
            });
            payload
                .as_object_mut()
                .unwrap()
                .extend(extra.as_object().unwrap().clone());
        }
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(payload)
            .to_request();
        assert_eq!(test::call_service(&$app, req).await.status(), 201);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(serde_json::json!({
                "email": $email,
                "password": "password123",
                "role": $role
            }))
            .to_request();
        let body: serde_json::Value =
            test::call_and_read_body_json(&$app, req).await;
        body["token"].as_str().unwrap().to_string()
    }};
}

fn listing_payload(city: &str) -> serde_json::Value {
    serde_json::json!({
        "title": "Seaside flat",
        "description": "Bright two-bedroom near the beach",
        "address": {
            "street": "1 Beach Rd",
            "city": city,
            "state": "WC",
            "zipCode": "8001",
            "country": "South Africa"
        },
        "propertyDetails": {
            "bedNum": 2,
            "bathNum": 1,
            "maxGuests": 4,
            "propertyType": "Apartment",
            "roomType": "Entire place"
        },
        "amenities": ["Wifi", "Kitchen"],
        "images": ["https://example.com/1.jpg"],
        "pricing": {
            "basePrice": 1000,
            "currency": "ZAR",
            "cleaningFee": 200,
            "serviceFee": 100,
            "securityDeposit": 500,
            "extraGuestFee": 50
        }
    })
}

#[actix_web::test]
async fn host_creates_and_fetches_a_listing() {
    let app = setup_listing_test!();
    let token = signup!(app, "host@example.com", "host");

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(listing_payload("Cape Town"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let listing: serde_json::Value = test::read_body_json(resp).await;
    let id = listing["id"].as_str().unwrap();
    assert_eq!(listing["availability"]["minimumStay"], 1);
    assert_eq!(listing["availability"]["maximumStay"], 30);
    assert_eq!(listing["ratings"]["totalReviews"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let fetched: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(fetched["title"], "Seaside flat");
    assert_eq!(fetched["pricing"]["basePrice"], 1000);
}

#[actix_web::test]
async fn guests_cannot_create_listings() {
    let app = setup_listing_test!();
    let token = signup!(app, "guest@example.com", "guest");

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(listing_payload("Cape Town"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn anonymous_create_is_unauthorized() {
    let app = setup_listing_test!();

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .set_json(listing_payload("Cape Town"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn search_is_paginated_and_filtered() {
    let app = setup_listing_test!();
    let token = signup!(app, "host@example.com", "host");

    for city in ["Cape Town", "Cape Town", "Cape Town", "Durban", "Durban"] {
        let req = test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(listing_payload(city))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), 201);
    }

    let req = test::TestRequest::get()
        .uri("/api/listings?city=Cape%20Town&page=1&limit=2")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["currentPage"], 1);
    assert_eq!(body["pagination"]["totalItems"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["pagination"]["hasNextPage"], true);
    assert_eq!(body["pagination"]["hasPrevPage"], false);

    let req = test::TestRequest::get()
        .uri("/api/listings?city=Cape%20Town&page=2&limit=2")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["listings"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["hasNextPage"], false);
    assert_eq!(body["pagination"]["hasPrevPage"], true);
}

#[actix_web::test]
async fn invalid_page_is_a_bad_request() {
    let app = setup_listing_test!();

    let req = test::TestRequest::get()
        .uri("/api/listings?page=0")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn host_dashboard_lists_only_their_properties() {
    let app = setup_listing_test!();
    let token_a = signup!(app, "a@example.com", "host");
    let token_b = signup!(app, "b@example.com", "host");

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {token_a}")))
        .set_json(listing_payload("Cape Town"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/listings/host")
        .insert_header(("Authorization", format!("Bearer {token_b}")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    let req = test::TestRequest::get()
        .uri("/api/listings/host")
        .insert_header(("Authorization", format!("Bearer {token_a}")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn only_the_owner_may_update_or_delete() {
    let app = setup_listing_test!();
    let owner = signup!(app, "owner@example.com", "host");
    let other = signup!(app, "other@example.com", "host");

    let req = test::TestRequest::post()
        .uri("/api/listings")
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(listing_payload("Cape Town"))
        .to_request();
    let listing: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let id = listing["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {other}")))
        .set_json(listing_payload("Cape Town"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {other}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);

    let mut renamed = listing_payload("Cape Town");
    renamed["title"] = serde_json::json!("Renamed flat");
    let req = test::TestRequest::put()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .set_json(renamed)
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["title"], "Renamed flat");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/listings/{id}"))
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 204);

    // Deleted listings are gone from the catalog.
    let req = test::TestRequest::get()
        .uri(&format!("/api/listings/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 404);
}

#[actix_web::test]
async fn cities_track_the_catalog() {
    let app = setup_listing_test!();
    let token = signup!(app, "host@example.com", "host");

    let req = test::TestRequest::get().uri("/api/cities").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 0);

    for city in ["Cape Town", "Durban", "Cape Town"] {
        let req = test::TestRequest::post()
            .uri("/api/listings")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(listing_payload(city))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/cities").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    let cities = body.as_array().unwrap();
    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0]["city"], "Cape Town");
    assert_eq!(cities[1]["city"], "Durban");
}
