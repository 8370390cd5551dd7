//! Booking creation and lookup.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::booking::model::{BookingRequest, BookingView};
use crate::booking::validation::build_booking;
use crate::http::response::ApiError;
use crate::store::BookingRepository;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub success: bool,
    pub message: String,
    pub booking_id: String,
    pub booking: BookingView,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingList {
    pub success: bool,
    pub count: usize,
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingFound {
    pub success: bool,
    pub booking: BookingView,
}

#[derive(Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Validate and persist a booking as a single document.
    pub async fn create(&self, req: BookingRequest) -> Result<BookingCreated, ApiError> {
        let booking = build_booking(req, Utc::now())?;

        let booking = self.bookings.insert(booking).await.map_err(|e| {
            ApiError::internal("Internal server error. Failed to create booking.", e)
        })?;

        tracing::info!(
            booking_id = %booking.id,
            package = %booking.package_name,
            vehicle_type = %booking.vehicle_type,
            "Booking created"
        );
        Ok(BookingCreated {
            success: true,
            message: format!(
                "Service booking confirmed! Your booking for {} has been successfully created.",
                booking.package_name
            ),
            booking_id: booking.id.clone(),
            booking: booking.into(),
        })
    }

    pub async fn list(&self) -> Result<BookingList, ApiError> {
        let bookings = self
            .bookings
            .list_recent()
            .await
            .map_err(|e| ApiError::internal("Failed to fetch bookings", e))?;

        Ok(BookingList {
            success: true,
            count: bookings.len(),
            bookings: bookings.into_iter().map(BookingView::from).collect(),
        })
    }

    pub async fn get(&self, id: &str) -> Result<BookingFound, ApiError> {
        let booking = self
            .bookings
            .get(id)
            .await
            .map_err(|e| ApiError::internal("Failed to fetch booking", e))?
            .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

        Ok(BookingFound {
            success: true,
            booking: booking.into(),
        })
    }

    /// Whether the backing store answers.
    pub async fn store_reachable(&self) -> bool {
        self.bookings.ping().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::Booking;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use async_trait::async_trait;

    struct DownStore;

    #[async_trait]
    impl BookingRepository for DownStore {
        async fn insert(&self, _: Booking) -> StoreResult<Booking> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn list_recent(&self) -> StoreResult<Vec<Booking>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn get(&self, _: &str) -> StoreResult<Option<Booking>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn request(package: &str) -> BookingRequest {
        BookingRequest {
            customer_name: Some("Ravi".into()),
            package_name: Some(package.into()),
            vehicle_type: Some("SUV".into()),
            total_price: Some(999.0),
            services_included: Some(vec!["Wash".into()]),
            validity_period: Some("1 month".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = BookingService::new(Arc::new(MemoryStore::new()));
        let created = service.create(request("Gold")).await.unwrap();

        assert_eq!(
            created.message,
            "Service booking confirmed! Your booking for Gold has been successfully created."
        );
        assert_eq!(created.booking_id, created.booking.id);
        assert_eq!(created.booking.object_id, created.booking_id);

        let found = service.get(&created.booking_id).await.unwrap();
        assert_eq!(found.booking, created.booking);
    }

    #[tokio::test]
    async fn test_list_counts_bookings() {
        let service = BookingService::new(Arc::new(MemoryStore::new()));
        service.create(request("Gold")).await.unwrap();
        service.create(request("Silver")).await.unwrap();

        let list = service.list().await.unwrap();
        assert_eq!(list.count, 2);
        assert_eq!(list.bookings[0].package_name, "Silver");
    }

    #[tokio::test]
    async fn test_unknown_booking() {
        let service = BookingService::new(Arc::new(MemoryStore::new()));
        let err = service.get("missing").await.unwrap_err();

        assert_eq!(err.status().as_u16(), 404);
        assert_eq!(err.to_string(), "Booking not found");
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let service = BookingService::new(Arc::new(DownStore));
        let err = service.create(request("Gold")).await.unwrap_err();

        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(
            err.to_string(),
            "Internal server error. Failed to create booking."
        );
        assert!(!service.store_reachable().await);
    }
}
