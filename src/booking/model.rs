//! Booking documents and their enumerations.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle categories a package can be booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    Hatchback,
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Bike,
    #[serde(rename = "Luxury Car")]
    LuxuryCar,
    #[serde(rename = "Electric Vehicle")]
    ElectricVehicle,
}

impl VehicleType {
    pub const ALL: [VehicleType; 6] = [
        VehicleType::Hatchback,
        VehicleType::Sedan,
        VehicleType::Suv,
        VehicleType::Bike,
        VehicleType::LuxuryCar,
        VehicleType::ElectricVehicle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Hatchback => "Hatchback",
            VehicleType::Sedan => "Sedan",
            VehicleType::Suv => "SUV",
            VehicleType::Bike => "Bike",
            VehicleType::LuxuryCar => "Luxury Car",
            VehicleType::ElectricVehicle => "Electric Vehicle",
        }
    }

    /// "Hatchback, Sedan, ..." for error messages.
    pub fn list() -> String {
        Self::ALL
            .iter()
            .map(VehicleType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVehicleType(pub String);

impl FromStr for VehicleType {
    type Err = UnknownVehicleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVehicleType(s.to_string()))
    }
}

/// Lifecycle status of a booking. New bookings are always `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A persisted service booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub customer_name: String,
    pub package_name: String,
    pub vehicle_type: VehicleType,
    pub booking_date: DateTime<Utc>,
    pub booking_status: BookingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_date: Option<DateTime<Utc>>,
    pub total_price: f64,
    pub services_included: Vec<String>,
    pub validity_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking as returned to clients: the document plus its `_id` alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingView {
    #[serde(rename = "_id")]
    pub object_id: String,
    #[serde(flatten)]
    pub booking: Booking,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            object_id: booking.id.clone(),
            booking,
        }
    }
}

impl Deref for BookingView {
    type Target = Booking;

    fn deref(&self) -> &Booking {
        &self.booking
    }
}

/// Body of `POST /api/bookService`.
///
/// Every field is optional at the wire level so that missing fields produce
/// the service's own 400 messages instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_name: Option<String>,
    pub package_name: Option<String>,
    pub vehicle_type: Option<String>,
    pub total_price: Option<f64>,
    pub services_included: Option<Vec<String>>,
    pub validity_period: Option<String>,
    pub service_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_round_trip_names() {
        for v in VehicleType::ALL {
            assert_eq!(v.as_str().parse::<VehicleType>(), Ok(v));
            assert_eq!(serde_json::to_value(v).unwrap(), v.as_str());
        }
        assert!("Truck".parse::<VehicleType>().is_err());
        assert!("suv".parse::<VehicleType>().is_err());
    }

    #[test]
    fn test_vehicle_type_list() {
        assert_eq!(
            VehicleType::list(),
            "Hatchback, Sedan, SUV, Bike, Luxury Car, Electric Vehicle"
        );
    }

    #[test]
    fn test_booking_serializes_camel_case() {
        let now = Utc::now();
        let booking = Booking {
            id: "b1".into(),
            customer_name: "Asha".into(),
            package_name: "Gold".into(),
            vehicle_type: VehicleType::LuxuryCar,
            booking_date: now,
            booking_status: BookingStatus::Pending,
            service_date: None,
            total_price: 4999.0,
            services_included: vec!["Wash".into()],
            validity_period: "6 months".into(),
            notes: None,
            contact_number: None,
            email: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["customerName"], "Asha");
        assert_eq!(json["vehicleType"], "Luxury Car");
        assert_eq!(json["bookingStatus"], "Pending");
        assert!(json.get("serviceDate").is_none());

        let view = serde_json::to_value(BookingView::from(booking)).unwrap();
        assert_eq!(view["_id"], "b1");
        assert_eq!(view["id"], "b1");
        assert_eq!(view["customerName"], "Asha");
    }
}
