//! In-process document store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{BookingRepository, StoreError, StoreResult, UserRepository};
use crate::auth::model::User;
use crate::booking::model::Booking;

/// A booking plus its insertion sequence, used to break date ties.
#[derive(Debug, Clone)]
struct StoredBooking {
    seq: u64,
    booking: Booking,
}

/// Thread-safe store backed by concurrent maps.
///
/// Cloning is cheap; clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Users keyed by normalized email.
    users: Arc<DashMap<String, User>>,
    bookings: Arc<DashMap<String, StoredBooking>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(user.email)),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.users.len())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn insert(&self, booking: Booking) -> StoreResult<Booking> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        match self.bookings.entry(booking.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(booking.id)),
            Entry::Vacant(slot) => {
                slot.insert(StoredBooking {
                    seq,
                    booking: booking.clone(),
                });
                Ok(booking)
            }
        }
    }

    async fn list_recent(&self) -> StoreResult<Vec<Booking>> {
        let mut stored: Vec<StoredBooking> =
            self.bookings.iter().map(|e| e.value().clone()).collect();
        stored.sort_by(|a, b| {
            b.booking
                .booking_date
                .cmp(&a.booking.booking_date)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.booking).collect())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Booking>> {
        Ok(self.bookings.get(id).map(|e| e.value().booking.clone()))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::model::Role;
    use crate::booking::model::{BookingStatus, VehicleType};
    use chrono::{Duration, Utc};

    fn user(email: &str) -> User {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Test".into(),
            email: email.into(),
            password: "secret".into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn booking(id: &str, at: chrono::DateTime<Utc>) -> Booking {
        Booking {
            id: id.into(),
            customer_name: "Asha".into(),
            package_name: "Basic".into(),
            vehicle_type: VehicleType::Bike,
            booking_date: at,
            booking_status: BookingStatus::Pending,
            service_date: None,
            total_price: 10.0,
            services_included: vec!["Wash".into()],
            validity_period: "1 month".into(),
            notes: None,
            contact_number: None,
            email: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let store = MemoryStore::new();
        UserRepository::insert(&store, user("a@example.com")).await.unwrap();

        let err = UserRepository::insert(&store, user("a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_keeps_one_record() {
        let store = MemoryStore::new();
        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                UserRepository::insert(&store, user("race@example.com")).await.is_ok()
            }));
        }

        let mut wins = 0;
        for h in handles {
            if h.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bookings_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        BookingRepository::insert(&store, booking("old", now - Duration::hours(1)))
            .await
            .unwrap();
        BookingRepository::insert(&store, booking("tie-1", now)).await.unwrap();
        BookingRepository::insert(&store, booking("tie-2", now)).await.unwrap();

        let ids: Vec<String> = store
            .list_recent()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["tie-2", "tie-1", "old"]);
    }

    #[tokio::test]
    async fn test_get_booking() {
        let store = MemoryStore::new();
        BookingRepository::insert(&store, booking("b1", Utc::now()))
            .await
            .unwrap();

        assert!(store.get("b1").await.unwrap().is_some());
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
