use crate::domain::booking::Booking;
use crate::domain::listing::{CityEntry, Listing, ListingFilter};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn save_listing(&self, listing: Listing) -> Result<()>;
    async fn find_listing_by_id(&self, id: &str) -> Result<Option<Listing>>;
    /// Returns one page of listings matching the filter plus the total
    /// match count, ordered by creation time.
    async fn search_listings(
        &self,
        filter: &ListingFilter,
        skip: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize)>;
    async fn find_listings_by_host(&self, host_id: &str) -> Result<Vec<Listing>>;
    /// Returns false when no listing with the id exists.
    async fn delete_listing(&self, id: &str) -> Result<bool>;
    async fn distinct_cities(&self) -> Result<Vec<CityEntry>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking only if no pending or confirmed booking on the
    /// same listing overlaps its dates. Check and insert happen atomically
    /// so concurrent attempts for the same dates cannot both succeed.
    /// Returns false on a date conflict.
    async fn insert_if_available(&self, booking: Booking) -> Result<bool>;
    /// Same availability guarantee for rewrites of an existing booking; the
    /// booking's own record is excluded from the overlap scan.
    async fn update_if_available(&self, booking: Booking) -> Result<bool>;
    async fn save_booking(&self, booking: Booking) -> Result<()>;
    async fn find_booking_by_id(&self, id: &str) -> Result<Option<Booking>>;
    async fn find_bookings_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>>;
    async fn find_bookings_by_host(&self, host_id: &str) -> Result<Vec<Booking>>;
    async fn delete_booking(&self, id: &str) -> Result<bool>;
}
