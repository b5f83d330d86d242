use serde::{Deserialize, Serialize};

/// Whole currency units (the catalog prices nightly rates and fees as
/// integers, never fractions).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u64);

impl Price {
    pub fn new(value: u64) -> Self {
        Price(value)
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bedroom {
    pub room_type: String,
    pub beds: u32,
    pub bed_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub bed_num: u32,
    pub bath_num: u32,
    pub sq_ft: Option<u32>,
    pub max_guests: u32,
    #[serde(default)]
    pub bedrooms: Vec<Bedroom>,
    pub property_type: String,
    pub room_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub base_price: Price,
    pub currency: String,
    pub cleaning_fee: Price,
    pub service_fee: Price,
    pub security_deposit: Price,
    pub extra_guest_fee: Price,
}

impl Pricing {
    /// Total for a stay: nightly base times nights, plus cleaning and
    /// service fees, plus the extra-guest fee for every guest beyond the
    /// first. Computed server-side on every create and modify.
    pub fn total_for_stay(&self, nights: u32, number_of_guests: u32) -> Price {
        let subtotal = self.base_price.inner() * u64::from(nights);
        let extra_guests = u64::from(number_of_guests.saturating_sub(1));
        Price::new(
            subtotal
                + self.cleaning_fee.inner()
                + self.service_fee.inner()
                + self.extra_guest_fee.inner() * extra_guests,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_available: bool,
    pub minimum_stay: u32,
    pub maximum_stay: u32,
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
}

impl Default for Availability {
    fn default() -> Self {
        Availability {
            is_available: true,
            minimum_stay: 1,
            maximum_stay: 30,
            check_in_time: None,
            check_out_time: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub average_rating: f64,
    pub total_reviews: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub description: String,
    pub host_id: String,
    pub host_email: String,
    pub address: ListingAddress,
    pub property_details: PropertyDetails,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
    pub pricing: Pricing,
    pub availability: Availability,
    pub ratings: Ratings,
    pub house_rules: Vec<String>,
    pub cancellation_policy: Option<String>,
    pub date_created: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListing {
    pub title: String,
    pub description: String,
    pub address: ListingAddress,
    pub property_details: PropertyDetails,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub pricing: Pricing,
    pub availability: Option<Availability>,
    #[serde(default)]
    pub house_rules: Vec<String>,
    pub cancellation_policy: Option<String>,
}

/// Exact-match search filter over the catalog.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub city: Option<String>,
    pub country: Option<String>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        self.city
            .as_deref()
            .is_none_or(|city| listing.address.city == city)
            && self
                .country
                .as_deref()
                .is_none_or(|country| listing.address.country == country)
    }
}

/// Distinct destination derived on demand from stored listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityEntry {
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPage {
    pub listings: Vec<Listing>,
    pub pagination: Pagination,
}
