//! Persistence seam.
//!
//! The document store is an external collaborator; services only see these
//! repository traits. `MongoStore` talks to MongoDB, `MemoryStore` keeps
//! everything in process. [`open`] picks one from the database URI.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::auth::model::User;
use crate::booking::model::Booking;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// URI scheme that selects [`MemoryStore`].
pub const MEMORY_SCHEME: &str = "memory";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key is already taken.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Identity collection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Insert a user; fails with `Duplicate` when the email is taken.
    async fn insert(&self, user: User) -> StoreResult<User>;

    /// Number of stored identities.
    async fn count(&self) -> StoreResult<usize>;
}

/// Booking collection.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a booking as a single document.
    async fn insert(&self, booking: Booking) -> StoreResult<Booking>;

    /// All bookings, newest booking date first.
    async fn list_recent(&self) -> StoreResult<Vec<Booking>>;

    /// Fetch one booking by id.
    async fn get(&self, id: &str) -> StoreResult<Option<Booking>>;

    /// Cheap connectivity check used by the monolith health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Both collections, possibly backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub backend: &'static str,
}

impl Repositories {
    fn shared<S>(store: S, backend: &'static str) -> Self
    where
        S: UserRepository + BookingRepository + 'static,
    {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            bookings: store,
            backend,
        }
    }

    pub fn memory() -> Self {
        Self::shared(MemoryStore::new(), "memory")
    }
}

/// Open the store named by a validated database URI.
///
/// `memory://` keeps data in process; any `mongodb` URI connects to MongoDB
/// and makes sure the unique email index exists.
pub async fn open(uri: &Url) -> StoreResult<Repositories> {
    if uri.scheme() == MEMORY_SCHEME {
        return Ok(Repositories::memory());
    }

    let store = MongoStore::new(uri.as_str()).await?;
    store.ensure_indexes().await?;
    Ok(Repositories::shared(store, "mongodb"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_uri() {
        let repos = open(&Url::parse("memory://").unwrap()).await.unwrap();
        assert_eq!(repos.backend, "memory");
        assert_eq!(repos.users.count().await.unwrap(), 0);
        assert!(repos.bookings.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_open_unreachable_mongodb_fails() {
        let uri = Url::parse("mongodb://127.0.0.1:1/test?serverSelectionTimeoutMS=200").unwrap();
        let err = open(&uri).await.err().unwrap();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
