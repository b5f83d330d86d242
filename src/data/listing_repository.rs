use crate::domain::listing::{CityEntry, Listing, ListingFilter};
use crate::domain::repository::ListingRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct InMemoryListingRepository {
    storage: Arc<RwLock<HashMap<String, Listing>>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn save_listing(&self, listing: Listing) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(listing.id.clone(), listing);
        debug!("Listing saved to memory storage");
        Ok(())
    }

    async fn find_listing_by_id(&self, id: &str) -> Result<Option<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn search_listings(
        &self,
        filter: &ListingFilter,
        skip: usize,
        limit: usize,
    ) -> Result<(Vec<Listing>, usize)> {
        let storage = self.storage.read().await;
        let mut matches: Vec<Listing> = storage
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        // Stable page order regardless of map iteration order.
        matches.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.id.cmp(&b.id))
        });
        let total = matches.len();
        let page = matches.into_iter().skip(skip).take(limit).collect();
        Ok((page, total))
    }

    async fn find_listings_by_host(&self, host_id: &str) -> Result<Vec<Listing>> {
        let storage = self.storage.read().await;
        let mut listings: Vec<Listing> = storage
            .values()
            .filter(|l| l.host_id == host_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| a.date_created.cmp(&b.date_created));
        Ok(listings)
    }

    #[instrument(skip(self), fields(listing_id = id))]
    async fn delete_listing(&self, id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        let removed = storage.remove(id).is_some();
        if removed {
            debug!("Listing removed from memory storage");
        }
        Ok(removed)
    }

    async fn distinct_cities(&self) -> Result<Vec<CityEntry>> {
        let storage = self.storage.read().await;
        let mut cities: Vec<CityEntry> = storage
            .values()
            .map(|l| CityEntry {
                city: l.address.city.clone(),
                country: l.address.country.clone(),
            })
            .collect();
        cities.sort();
        cities.dedup();
        Ok(cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::{
        Availability, ListingAddress, Price, Pricing, PropertyDetails, Ratings,
    };

    fn listing(id: &str, city: &str, country: &str, host_id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: format!("Stay {id}"),
            description: "A place".to_string(),
            host_id: host_id.to_string(),
            host_email: "host@example.com".to_string(),
            address: ListingAddress {
                street: "1 Main Rd".to_string(),
                city: city.to_string(),
                state: "WC".to_string(),
                zip_code: "8001".to_string(),
                country: country.to_string(),
                latitude: None,
                longitude: None,
            },
            property_details: PropertyDetails {
                bed_num: 1,
                bath_num: 1,
                sq_ft: None,
                max_guests: 2,
                bedrooms: vec![],
                property_type: "Apartment".to_string(),
                room_type: "Entire place".to_string(),
            },
            amenities: vec![],
            images: vec![],
            pricing: Pricing {
                base_price: Price::new(500),
                currency: "ZAR".to_string(),
                cleaning_fee: Price::new(0),
                service_fee: Price::new(0),
                security_deposit: Price::new(0),
                extra_guest_fee: Price::new(0),
            },
            availability: Availability::default(),
            ratings: Ratings::default(),
            house_rules: vec![],
            cancellation_policy: None,
            date_created: format!("2025-01-01T00:00:0{}Z", id.len() % 10),
            last_updated: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn search_filters_by_city() {
        let repo = InMemoryListingRepository::new();
        repo.save_listing(listing("a", "Cape Town", "South Africa", "h-1"))
            .await
            .unwrap();
        repo.save_listing(listing("b", "Durban", "South Africa", "h-1"))
            .await
            .unwrap();

        let filter = ListingFilter {
            city: Some("Cape Town".to_string()),
            country: None,
        };
        let (page, total) = repo.search_listings(&filter, 0, 20).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].id, "a");
    }

    #[tokio::test]
    async fn search_pages_are_stable() {
        let repo = InMemoryListingRepository::new();
        for id in ["a", "b", "c", "d", "e"] {
            repo.save_listing(listing(id, "Cape Town", "South Africa", "h-1"))
                .await
                .unwrap();
        }

        let filter = ListingFilter::default();
        let (first, total) = repo.search_listings(&filter, 0, 2).await.unwrap();
        let (second, _) = repo.search_listings(&filter, 2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_ne!(first[0].id, second[0].id);
        assert_ne!(first[1].id, second[1].id);
    }

    #[tokio::test]
    async fn host_sees_only_their_listings() {
        let repo = InMemoryListingRepository::new();
        repo.save_listing(listing("a", "Cape Town", "South Africa", "h-1"))
            .await
            .unwrap();
        repo.save_listing(listing("b", "Cape Town", "South Africa", "h-2"))
            .await
            .unwrap();

        let mine = repo.find_listings_by_host("h-1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");
    }

    #[tokio::test]
    async fn delete_reports_missing_listing() {
        let repo = InMemoryListingRepository::new();
        repo.save_listing(listing("a", "Cape Town", "South Africa", "h-1"))
            .await
            .unwrap();

        assert!(repo.delete_listing("a").await.unwrap());
        assert!(!repo.delete_listing("a").await.unwrap());
        assert!(repo.find_listing_by_id("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cities_are_distinct_and_sorted() {
        let repo = InMemoryListingRepository::new();
        repo.save_listing(listing("a", "Durban", "South Africa", "h-1"))
            .await
            .unwrap();
        repo.save_listing(listing("b", "Cape Town", "South Africa", "h-1"))
            .await
            .unwrap();
        repo.save_listing(listing("c", "Cape Town", "South Africa", "h-2"))
            .await
            .unwrap();

        let cities = repo.distinct_cities().await.unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].city, "Cape Town");
        assert_eq!(cities[1].city, "Durban");
    }
}
