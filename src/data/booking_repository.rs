use crate::domain::booking::Booking;
use crate::domain::repository::BookingRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct InMemoryBookingRepository {
    storage: Arc<RwLock<HashMap<String, Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Overlap scan against every date-blocking booking on the listing.
    /// Callers must hold the write lock so the scan and the following
    /// mutation are one atomic step.
    fn has_conflict(
        storage: &HashMap<String, Booking>,
        candidate: &Booking,
        exclude_id: Option<&str>,
    ) -> bool {
        storage.values().any(|existing| {
            existing.listing_id == candidate.listing_id
                && exclude_id != Some(existing.id.as_str())
                && existing.status.blocks_dates()
                && existing.overlaps(candidate.check_in, candidate.check_out)
        })
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, listing_id = %booking.listing_id))]
    async fn insert_if_available(&self, booking: Booking) -> Result<bool> {
        let mut storage = self.storage.write().await;
        if Self::has_conflict(&storage, &booking, None) {
            warn!("Date conflict on insert");
            return Ok(false);
        }
        storage.insert(booking.id.clone(), booking);
        debug!("Booking saved to memory storage");
        Ok(true)
    }

    #[instrument(skip(self, booking), fields(booking_id = %booking.id, listing_id = %booking.listing_id))]
    async fn update_if_available(&self, booking: Booking) -> Result<bool> {
        let mut storage = self.storage.write().await;
        if Self::has_conflict(&storage, &booking, Some(booking.id.as_str())) {
            warn!("Date conflict on update");
            return Ok(false);
        }
        storage.insert(booking.id.clone(), booking);
        debug!("Booking updated in memory storage");
        Ok(true)
    }

    async fn save_booking(&self, booking: Booking) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(booking.id.clone(), booking);
        Ok(())
    }

    async fn find_booking_by_id(&self, id: &str) -> Result<Option<Booking>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_bookings_by_guest(&self, guest_id: &str) -> Result<Vec<Booking>> {
        let storage = self.storage.read().await;
        let mut bookings: Vec<Booking> = storage
            .values()
            .filter(|b| b.guest_id == guest_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(bookings)
    }

    async fn find_bookings_by_host(&self, host_id: &str) -> Result<Vec<Booking>> {
        let storage = self.storage.read().await;
        let mut bookings: Vec<Booking> = storage
            .values()
            .filter(|b| b.host_id == host_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.booking_date.cmp(&b.booking_date));
        Ok(bookings)
    }

    #[instrument(skip(self), fields(booking_id = id))]
    async fn delete_booking(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::{BookingStatus, ContactInfo, GuestDetails, PaymentStatus};
    use crate::domain::listing::Price;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn booking(id: &str, listing_id: &str, check_in: &str, check_out: &str) -> Booking {
        Booking {
            id: id.to_string(),
            guest_id: "g-1".to_string(),
            listing_id: listing_id.to_string(),
            host_id: "h-1".to_string(),
            destination: "Cape Town, South Africa".to_string(),
            check_in: date(check_in),
            check_out: date(check_out),
            number_of_guests: 2,
            total_price: Price::new(1000),
            currency: "ZAR".to_string(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            booking_date: "2025-05-01T00:00:00Z".to_string(),
            guest_details: GuestDetails {
                adults: 2,
                children: 0,
                infants: 0,
            },
            contact_info: ContactInfo {
                phone: String::new(),
                email: "guest@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn overlapping_insert_is_rejected() {
        let repo = InMemoryBookingRepository::new();
        assert!(
            repo.insert_if_available(booking("b-1", "l-1", "2025-06-01", "2025-06-05"))
                .await
                .unwrap()
        );
        assert!(
            !repo
                .insert_if_available(booking("b-2", "l-1", "2025-06-03", "2025-06-07"))
                .await
                .unwrap()
        );
        assert!(repo.find_booking_by_id("b-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn other_listings_are_unaffected() {
        let repo = InMemoryBookingRepository::new();
        assert!(
            repo.insert_if_available(booking("b-1", "l-1", "2025-06-01", "2025-06-05"))
                .await
                .unwrap()
        );
        assert!(
            repo.insert_if_available(booking("b-2", "l-2", "2025-06-01", "2025-06-05"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn cancelled_bookings_free_their_dates() {
        let repo = InMemoryBookingRepository::new();
        let mut first = booking("b-1", "l-1", "2025-06-01", "2025-06-05");
        first.status = BookingStatus::Cancelled;
        repo.save_booking(first).await.unwrap();

        assert!(
            repo.insert_if_available(booking("b-2", "l-1", "2025-06-01", "2025-06-05"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn back_to_back_bookings_are_allowed() {
        let repo = InMemoryBookingRepository::new();
        assert!(
            repo.insert_if_available(booking("b-1", "l-1", "2025-06-01", "2025-06-05"))
                .await
                .unwrap()
        );
        assert!(
            repo.insert_if_available(booking("b-2", "l-1", "2025-06-05", "2025-06-09"))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn update_ignores_the_bookings_own_dates() {
        let repo = InMemoryBookingRepository::new();
        repo.insert_if_available(booking("b-1", "l-1", "2025-06-01", "2025-06-05"))
            .await
            .unwrap();

        // Shifting within its own window is fine.
        let shifted = booking("b-1", "l-1", "2025-06-02", "2025-06-06");
        assert!(repo.update_if_available(shifted).await.unwrap());

        // Moving onto another booking's dates is not.
        repo.insert_if_available(booking("b-2", "l-1", "2025-06-10", "2025-06-12"))
            .await
            .unwrap();
        let conflicting = booking("b-1", "l-1", "2025-06-11", "2025-06-14");
        assert!(!repo.update_if_available(conflicting).await.unwrap());
    }

    #[tokio::test]
    async fn concurrent_overlapping_inserts_admit_exactly_one() {
        let repo = InMemoryBookingRepository::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                let b = booking(&format!("b-{i}"), "l-1", "2025-06-01", "2025-06-05");
                tokio::spawn(async move { repo.insert_if_available(b).await })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 1);
    }

    #[tokio::test]
    async fn guest_and_host_views_filter_by_owner() {
        let repo = InMemoryBookingRepository::new();
        let mut b1 = booking("b-1", "l-1", "2025-06-01", "2025-06-05");
        b1.guest_id = "g-1".to_string();
        b1.host_id = "h-1".to_string();
        let mut b2 = booking("b-2", "l-2", "2025-07-01", "2025-07-05");
        b2.guest_id = "g-2".to_string();
        b2.host_id = "h-1".to_string();
        repo.save_booking(b1).await.unwrap();
        repo.save_booking(b2).await.unwrap();

        assert_eq!(repo.find_bookings_by_guest("g-1").await.unwrap().len(), 1);
        assert_eq!(repo.find_bookings_by_host("h-1").await.unwrap().len(), 2);
    }
}
