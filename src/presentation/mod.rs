pub mod auth;
pub mod handlers;
pub mod listings;
pub mod middleware;
pub mod reservations;
