use crate::domain::error::DomainError;
use crate::domain::listing::{
    Availability, CityEntry, CreateListing, Listing, ListingFilter, ListingPage, Pagination,
    Ratings,
};
use crate::domain::repository::ListingRepository;
use crate::domain::user::User;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub city: Option<String>,
    pub country: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub struct ListingService<R: ListingRepository> {
    listing_repository: Arc<R>,
}

impl<R: ListingRepository> ListingService<R> {
    pub fn new(listing_repository: Arc<R>) -> Self {
        Self { listing_repository }
    }

    #[instrument(skip(self, host, req), fields(host_id = %host.id))]
    pub async fn create_listing(&self, host: &User, req: CreateListing) -> Result<Listing> {
        let now = Utc::now().to_rfc3339();
        let listing = Listing {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            host_id: host.id.clone(),
            host_email: host.email.clone(),
            address: req.address,
            property_details: req.property_details,
            amenities: req.amenities,
            images: req.images,
            pricing: req.pricing,
            availability: req.availability.unwrap_or_default(),
            ratings: Ratings::default(),
            house_rules: req.house_rules,
            cancellation_policy: req.cancellation_policy,
            date_created: now.clone(),
            last_updated: now,
        };
        self.listing_repository.save_listing(listing.clone()).await?;
        info!(listing_id = %listing.id, "Listing created");
        Ok(listing)
    }

    pub async fn get_listing(&self, id: &str) -> Result<Listing> {
        self.listing_repository
            .find_listing_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Listing not found".to_string()).into())
    }

    /// Paginated catalog search. `page` is 1-based, capped at
    /// `MAX_PAGE_SIZE` items per page.
    #[instrument(skip(self))]
    pub async fn search_listings(&self, query: SearchQuery) -> Result<ListingPage> {
        let page = query.page.unwrap_or(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 || limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(
                DomainError::Validation("Invalid page or limit parameter".to_string()).into(),
            );
        }

        let filter = ListingFilter {
            city: query.city,
            country: query.country,
        };
        let skip = (page - 1) * limit;
        let (listings, total_items) = self
            .listing_repository
            .search_listings(&filter, skip, limit)
            .await?;

        let total_pages = total_items.div_ceil(limit);
        Ok(ListingPage {
            pagination: Pagination {
                current_page: page,
                total_pages,
                total_items,
                has_next_page: skip + listings.len() < total_items,
                has_prev_page: page > 1,
            },
            listings,
        })
    }

    pub async fn host_listings(&self, host_id: &str) -> Result<Vec<Listing>> {
        self.listing_repository.find_listings_by_host(host_id).await
    }

    #[instrument(skip(self, host, req), fields(host_id = %host.id, listing_id = id))]
    pub async fn update_listing(
        &self,
        host: &User,
        id: &str,
        req: CreateListing,
    ) -> Result<Listing> {
        let existing = self.get_listing(id).await?;
        self.ensure_owner(host, &existing)?;

        let listing = Listing {
            title: req.title,
            description: req.description,
            address: req.address,
            property_details: req.property_details,
            amenities: req.amenities,
            images: req.images,
            pricing: req.pricing,
            availability: req.availability.unwrap_or_else(|| existing.availability.clone()),
            house_rules: req.house_rules,
            cancellation_policy: req.cancellation_policy,
            last_updated: Utc::now().to_rfc3339(),
            ..existing
        };
        self.listing_repository.save_listing(listing.clone()).await?;
        info!("Listing updated");
        Ok(listing)
    }

    #[instrument(skip(self, host), fields(host_id = %host.id, listing_id = id))]
    pub async fn delete_listing(&self, host: &User, id: &str) -> Result<()> {
        let existing = self.get_listing(id).await?;
        self.ensure_owner(host, &existing)?;
        self.listing_repository.delete_listing(id).await?;
        info!("Listing deleted");
        Ok(())
    }

    pub async fn cities(&self) -> Result<Vec<CityEntry>> {
        self.listing_repository.distinct_cities().await
    }

    fn ensure_owner(&self, host: &User, listing: &Listing) -> Result<()> {
        if listing.host_id != host.id {
            warn!(owner_id = %listing.host_id, "Caller does not own this listing");
            return Err(DomainError::Forbidden("Not authorized".to_string()).into());
        }
        Ok(())
    }
}
