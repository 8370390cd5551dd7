//! MongoDB-backed document store.
//!
//! Records are mapped to dedicated document types so the BSON layout
//! (`_id`, native datetimes) stays independent of the JSON wire format.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};

use super::{BookingRepository, StoreError, StoreResult, UserRepository};
use crate::auth::model::{Role, User};
use crate::booking::model::{Booking, BookingStatus, VehicleType};

const USERS: &str = "users";
const BOOKINGS: &str = "servicebookings";
const FALLBACK_DATABASE: &str = "vehicle-service-db";
const DUPLICATE_KEY: i32 = 11000;
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    password: String,
    role: Role,
    created_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookingDocument {
    #[serde(rename = "_id")]
    id: String,
    customer_name: String,
    package_name: String,
    vehicle_type: VehicleType,
    booking_date: BsonDateTime,
    booking_status: BookingStatus,
    service_date: Option<BsonDateTime>,
    total_price: f64,
    services_included: Vec<String>,
    validity_period: String,
    notes: Option<String>,
    contact_number: Option<String>,
    email: Option<String>,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

fn to_bson(at: DateTime<Utc>) -> BsonDateTime {
    BsonDateTime::from_millis(at.timestamp_millis())
}

fn from_bson(at: BsonDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
            created_at: to_bson(user.created_at),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            email: doc.email,
            password: doc.password,
            role: doc.role,
            created_at: from_bson(doc.created_at),
        }
    }
}

impl From<&Booking> for BookingDocument {
    fn from(b: &Booking) -> Self {
        Self {
            id: b.id.clone(),
            customer_name: b.customer_name.clone(),
            package_name: b.package_name.clone(),
            vehicle_type: b.vehicle_type,
            booking_date: to_bson(b.booking_date),
            booking_status: b.booking_status,
            service_date: b.service_date.map(to_bson),
            total_price: b.total_price,
            services_included: b.services_included.clone(),
            validity_period: b.validity_period.clone(),
            notes: b.notes.clone(),
            contact_number: b.contact_number.clone(),
            email: b.email.clone(),
            created_at: to_bson(b.created_at),
            updated_at: to_bson(b.updated_at),
        }
    }
}

impl From<BookingDocument> for Booking {
    fn from(doc: BookingDocument) -> Self {
        Self {
            id: doc.id,
            customer_name: doc.customer_name,
            package_name: doc.package_name,
            vehicle_type: doc.vehicle_type,
            booking_date: from_bson(doc.booking_date),
            booking_status: doc.booking_status,
            service_date: doc.service_date.map(from_bson),
            total_price: doc.total_price,
            services_included: doc.services_included,
            validity_period: doc.validity_period,
            notes: doc.notes,
            contact_number: doc.contact_number,
            email: doc.email,
            created_at: from_bson(doc.created_at),
            updated_at: from_bson(doc.updated_at),
        }
    }
}

fn unavailable(err: MongoError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

/// Store backed by a MongoDB database.
///
/// Cloning is cheap; clones share the driver's connection pool.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
    users: Collection<UserDocument>,
    bookings: Collection<BookingDocument>,
}

impl MongoStore {
    /// Build a client for `uri`. No connection is made until the first operation.
    ///
    /// The database is the one named in the URI path, else `vehicle-service-db`.
    pub async fn new(uri: &str) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await.map_err(unavailable)?;
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        }
        let database = options
            .default_database
            .clone()
            .unwrap_or_else(|| FALLBACK_DATABASE.to_string());

        let client = Client::with_options(options).map_err(unavailable)?;
        let db = client.database(&database);
        Ok(Self {
            users: db.collection(USERS),
            bookings: db.collection(BOOKINGS),
            db,
        })
    }

    /// Create the unique email index that backs duplicate detection.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users.create_index(index).await.map_err(unavailable)?;
        Ok(())
    }

    pub fn database_name(&self) -> &str {
        self.db.name()
    }
}

#[async_trait]
impl UserRepository for MongoStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let found = self
            .users
            .find_one(doc! { "email": email })
            .await
            .map_err(unavailable)?;
        Ok(found.map(User::from))
    }

    async fn insert(&self, user: User) -> StoreResult<User> {
        match self.users.insert_one(UserDocument::from(&user)).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(user.email)),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn count(&self) -> StoreResult<usize> {
        let n = self
            .users
            .count_documents(doc! {})
            .await
            .map_err(unavailable)?;
        Ok(n as usize)
    }
}

#[async_trait]
impl BookingRepository for MongoStore {
    async fn insert(&self, booking: Booking) -> StoreResult<Booking> {
        match self.bookings.insert_one(BookingDocument::from(&booking)).await {
            Ok(_) => Ok(booking),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(booking.id)),
            Err(e) => Err(unavailable(e)),
        }
    }

    async fn list_recent(&self) -> StoreResult<Vec<Booking>> {
        let mut cursor = self
            .bookings
            .find(doc! {})
            .sort(doc! { "bookingDate": -1, "createdAt": -1 })
            .await
            .map_err(unavailable)?;

        let mut bookings = Vec::new();
        while cursor.advance().await.map_err(unavailable)? {
            let doc = cursor.deserialize_current().map_err(unavailable)?;
            bookings.push(Booking::from(doc));
        }
        Ok(bookings)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Booking>> {
        let found = self
            .bookings
            .find_one(doc! { "_id": id })
            .await
            .map_err(unavailable)?;
        Ok(found.map(Booking::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
