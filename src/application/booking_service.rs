use crate::domain::booking::{
    Booking, BookingStatus, ContactInfo, CreateBooking, GuestDetails, ModifyBooking,
    PaymentStatus, ReservationSummary, validate_stay,
};
use crate::domain::error::DomainError;
use crate::domain::listing::Listing;
use crate::domain::repository::{BookingRepository, ListingRepository, UserRepository};
use crate::domain::user::User;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct BookingService<B, L, U>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
{
    booking_repository: Arc<B>,
    listing_repository: Arc<L>,
    user_repository: Arc<U>,
}

impl<B, L, U> BookingService<B, L, U>
where
    B: BookingRepository,
    L: ListingRepository,
    U: UserRepository,
{
    pub fn new(
        booking_repository: Arc<B>,
        listing_repository: Arc<L>,
        user_repository: Arc<U>,
    ) -> Self {
        Self {
            booking_repository,
            listing_repository,
            user_repository,
        }
    }

    #[instrument(skip(self, guest, req), fields(guest_id = %guest.id, listing_id = %req.listing_id))]
    pub async fn create_booking(&self, guest: &User, req: CreateBooking) -> Result<Booking> {
        let nights = validate_stay(req.check_in, req.check_out, Utc::now().date_naive())?;
        let listing = self.find_listing(&req.listing_id).await?;
        Self::check_guest_count(req.number_of_guests, &listing)?;

        // Totals are always computed here from the listing's pricing; a
        // client-supplied total is never accepted.
        let total_price = listing.pricing.total_for_stay(nights, req.number_of_guests);

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            guest_id: guest.id.clone(),
            listing_id: listing.id.clone(),
            host_id: listing.host_id.clone(),
            destination: format!("{}, {}", listing.address.city, listing.address.country),
            check_in: req.check_in,
            check_out: req.check_out,
            number_of_guests: req.number_of_guests,
            total_price,
            currency: listing.pricing.currency.clone(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            booking_date: Utc::now().to_rfc3339(),
            guest_details: GuestDetails {
                adults: req.number_of_guests,
                children: 0,
                infants: 0,
            },
            contact_info: ContactInfo {
                phone: guest.phone_number.clone().unwrap_or_default(),
                email: guest.email.clone(),
            },
        };

        if !self
            .booking_repository
            .insert_if_available(booking.clone())
            .await?
        {
            warn!("Requested dates are already booked");
            return Err(DomainError::Unavailable(
                "Property is not available for the selected dates".to_string(),
            )
            .into());
        }

        info!(booking_id = %booking.id, total = booking.total_price.inner(), "Booking created");
        Ok(booking)
    }

    /// Rewrites the stay window of a pending booking. Dates and guest count
    /// are validated exactly as on create, availability is re-checked with
    /// the booking's own record excluded, and the total is recomputed from
    /// the listing's current pricing.
    #[instrument(skip(self, guest, req), fields(guest_id = %guest.id, booking_id = id))]
    pub async fn modify_booking(
        &self,
        guest: &User,
        id: &str,
        req: ModifyBooking,
    ) -> Result<Booking> {
        let booking = self.find_booking(id).await?;
        Self::ensure_guest_owner(guest, &booking)?;
        if booking.status != BookingStatus::Pending {
            return Err(DomainError::Validation(
                "Only pending reservations can be modified".to_string(),
            )
            .into());
        }

        let nights = validate_stay(req.check_in, req.check_out, Utc::now().date_naive())?;
        let listing = self.find_listing(&booking.listing_id).await?;
        Self::check_guest_count(req.number_of_guests, &listing)?;

        let updated = Booking {
            check_in: req.check_in,
            check_out: req.check_out,
            number_of_guests: req.number_of_guests,
            total_price: listing.pricing.total_for_stay(nights, req.number_of_guests),
            guest_details: GuestDetails {
                adults: req.number_of_guests,
                ..booking.guest_details.clone()
            },
            ..booking
        };

        if !self
            .booking_repository
            .update_if_available(updated.clone())
            .await?
        {
            warn!("Modified dates collide with another reservation");
            return Err(DomainError::Unavailable(
                "Property is not available for the selected dates".to_string(),
            )
            .into());
        }

        info!(total = updated.total_price.inner(), "Booking modified");
        Ok(updated)
    }

    /// Marks the booking cancelled, keeping the record for history.
    /// Cancelling an already-cancelled booking is a no-op success.
    #[instrument(skip(self, guest), fields(guest_id = %guest.id, booking_id = id))]
    pub async fn cancel_booking(&self, guest: &User, id: &str) -> Result<Booking> {
        let booking = self.find_booking(id).await?;
        Self::ensure_guest_owner(guest, &booking)?;
        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }

        let cancelled = Booking {
            status: BookingStatus::Cancelled,
            ..booking
        };
        self.booking_repository.save_booking(cancelled.clone()).await?;
        info!("Booking cancelled");
        Ok(cancelled)
    }

    /// Host-side removal. Unlike a guest cancellation this hard-deletes the
    /// record.
    #[instrument(skip(self, host), fields(host_id = %host.id, booking_id = id))]
    pub async fn delete_booking(&self, host: &User, id: &str) -> Result<()> {
        let booking = self.find_booking(id).await?;
        if booking.host_id != host.id {
            warn!(owner_id = %booking.host_id, "Caller does not host this reservation");
            return Err(DomainError::Forbidden("Not authorized".to_string()).into());
        }
        self.booking_repository.delete_booking(id).await?;
        info!("Booking deleted");
        Ok(())
    }

    pub async fn guest_reservations(&self, guest_id: &str) -> Result<Vec<ReservationSummary>> {
        let bookings = self
            .booking_repository
            .find_bookings_by_guest(guest_id)
            .await?;
        let mut summaries = Vec::with_capacity(bookings.len());
        for booking in bookings {
            summaries.push(self.summarize(booking, false).await?);
        }
        Ok(summaries)
    }

    pub async fn host_reservations(&self, host_id: &str) -> Result<Vec<ReservationSummary>> {
        let bookings = self
            .booking_repository
            .find_bookings_by_host(host_id)
            .await?;
        let mut summaries = Vec::with_capacity(bookings.len());
        for booking in bookings {
            summaries.push(self.summarize(booking, true).await?);
        }
        Ok(summaries)
    }

    async fn summarize(&self, booking: Booking, with_guest: bool) -> Result<ReservationSummary> {
        let property_name = self
            .listing_repository
            .find_listing_by_id(&booking.listing_id)
            .await?
            .map(|l| l.title)
            .unwrap_or_else(|| "N/A".to_string());
        let guest_name = if with_guest {
            self.user_repository
                .find_user_by_id(&booking.guest_id)
                .await?
                .map(|u| format!("{} {}", u.first_name, u.last_name))
        } else {
            None
        };
        Ok(ReservationSummary {
            id: booking.id,
            guest_name,
            property_name,
            check_in: booking.check_in,
            check_out: booking.check_out,
            number_of_guests: booking.number_of_guests,
            total_price: booking.total_price,
            status: booking.status,
        })
    }

    async fn find_booking(&self, id: &str) -> Result<Booking> {
        self.booking_repository
            .find_booking_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Reservation not found".to_string()).into())
    }

    async fn find_listing(&self, id: &str) -> Result<Listing> {
        self.listing_repository
            .find_listing_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Listing not found".to_string()).into())
    }

    fn ensure_guest_owner(guest: &User, booking: &Booking) -> Result<()> {
        if booking.guest_id != guest.id {
            warn!(owner_id = %booking.guest_id, "Caller does not own this reservation");
            return Err(DomainError::Forbidden("Not authorized".to_string()).into());
        }
        Ok(())
    }

    fn check_guest_count(number_of_guests: u32, listing: &Listing) -> Result<()> {
        let max_guests = listing.property_details.max_guests;
        if number_of_guests == 0 || number_of_guests > max_guests {
            return Err(DomainError::Validation(format!(
                "Maximum {max_guests} guests allowed"
            ))
            .into());
        }
        Ok(())
    }
}
