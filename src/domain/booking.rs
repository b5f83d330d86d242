use crate::domain::error::DomainError;
use crate::domain::listing::Price;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Pending and confirmed bookings hold their dates; cancelled ones
    /// release them.
    pub fn blocks_dates(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestDetails {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub guest_id: String,
    pub listing_id: String,
    pub host_id: String,
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
    pub total_price: Price,
    pub currency: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_date: String,
    pub guest_details: GuestDetails,
    pub contact_info: ContactInfo,
}

impl Booking {
    /// Half-open interval intersection: `[a, b)` overlaps `[c, d)` iff
    /// `a < d && c < b`. Back-to-back stays sharing a turnover day do not
    /// overlap.
    pub fn overlaps(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        self.check_in < check_out && check_in < self.check_out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub listing_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyBooking {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
}

/// Summary row for guest and host reservation dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    pub property_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_guests: u32,
    pub total_price: Price,
    pub status: BookingStatus,
}

/// Validates the requested stay window against `today` and returns the
/// number of nights. Check-in must be strictly in the future and check-out
/// strictly after check-in.
pub fn validate_stay(
    check_in: NaiveDate,
    check_out: NaiveDate,
    today: NaiveDate,
) -> Result<u32, DomainError> {
    if check_in <= today {
        return Err(DomainError::Validation(
            "Check-in date must be in the future".to_string(),
        ));
    }
    if check_out <= check_in {
        return Err(DomainError::Validation(
            "Check-out date must be after check-in date".to_string(),
        ));
    }
    Ok((check_out - check_in).num_days() as u32)
}
