//! Booking request validation.
//!
//! Checks run in two stages: request-level checks that reject with a single
//! message, then record constraints collected into a `details` list.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::booking::model::{Booking, BookingRequest, BookingStatus, VehicleType};
use crate::http::response::ApiError;

pub const MISSING_FIELDS: &str =
    "Missing required fields. customerName, packageName, and vehicleType are required.";
pub const BLANK_CUSTOMER_NAME: &str = "Customer name must be a non-empty string.";

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 100;
const NOTES_MAX_CHARS: usize = 500;
const DEFAULT_SERVICE_DELAY_DAYS: i64 = 3;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{10}$").expect("valid phone regex"));

/// Validate `request` and build the document to insert.
pub fn build_booking(request: BookingRequest, now: DateTime<Utc>) -> Result<Booking, ApiError> {
    let (Some(customer_name), Some(package_name), Some(vehicle_type)) = (
        present(request.customer_name),
        present(request.package_name),
        present(request.vehicle_type),
    ) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    let customer_name = customer_name.trim().to_string();
    if customer_name.is_empty() {
        return Err(ApiError::bad_request(BLANK_CUSTOMER_NAME));
    }

    let vehicle_type: VehicleType = vehicle_type.parse().map_err(|_| {
        ApiError::bad_request(format!(
            "Invalid vehicle type. Must be one of: {}",
            VehicleType::list()
        ))
    })?;

    let mut details = Vec::new();

    let name_chars = customer_name.chars().count();
    if name_chars < NAME_MIN_CHARS {
        details.push("Customer name must be at least 2 characters long".to_string());
    } else if name_chars > NAME_MAX_CHARS {
        details.push("Customer name cannot exceed 100 characters".to_string());
    }

    let package_name = package_name.trim().to_string();
    if package_name.is_empty() {
        details.push("Package name is required".to_string());
    }

    match request.total_price {
        None => details.push("Total price is required".to_string()),
        Some(price) if price < 0.0 => details.push("Price cannot be negative".to_string()),
        Some(_) => {}
    }

    let services_included = request.services_included.unwrap_or_default();
    if services_included.is_empty() {
        details.push("At least one service must be included in the package".to_string());
    }

    let validity_period = present(request.validity_period).unwrap_or_default();
    if validity_period.trim().is_empty() {
        details.push("Validity period is required".to_string());
    }

    let notes = present(request.notes);
    if notes
        .as_ref()
        .is_some_and(|n| n.chars().count() > NOTES_MAX_CHARS)
    {
        details.push("Notes cannot exceed 500 characters".to_string());
    }

    let contact_number = present(request.contact_number);
    if contact_number.as_ref().is_some_and(|c| !PHONE_RE.is_match(c)) {
        details.push("Please provide a valid 10-digit phone number".to_string());
    }

    let email = present(request.email).map(|e| e.trim().to_lowercase());
    if email.as_ref().is_some_and(|e| !EMAIL_RE.is_match(e)) {
        details.push("Please provide a valid email address".to_string());
    }

    let start_of_today = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or(now);
    if request.service_date.is_some_and(|d| d < start_of_today) {
        details.push("Service date cannot be in the past".to_string());
    }

    if !details.is_empty() {
        return Err(ApiError::validation(details));
    }

    let service_date = request
        .service_date
        .unwrap_or(now + Duration::days(DEFAULT_SERVICE_DELAY_DAYS));

    Ok(Booking {
        id: Uuid::new_v4().simple().to_string(),
        customer_name,
        package_name,
        vehicle_type,
        booking_date: now,
        booking_status: BookingStatus::Pending,
        service_date: Some(service_date),
        total_price: request.total_price.unwrap_or_default(),
        services_included,
        validity_period,
        notes,
        contact_number,
        email,
        created_at: now,
        updated_at: now,
    })
}

/// Treat empty strings like absent fields.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BookingRequest {
        BookingRequest {
            customer_name: Some("  Ravi Kumar ".into()),
            package_name: Some("Premium Care".into()),
            vehicle_type: Some("Sedan".into()),
            total_price: Some(2499.0),
            services_included: Some(vec!["Oil change".into(), "Wash".into()]),
            validity_period: Some("3 months".into()),
            ..Default::default()
        }
    }

    fn message(err: ApiError) -> (String, Vec<String>) {
        match err {
            ApiError::BadRequest { message, details } => (message, details),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_builds_pending_booking() {
        let now = Utc::now();
        let booking = build_booking(request(), now).unwrap();

        assert_eq!(booking.customer_name, "Ravi Kumar");
        assert_eq!(booking.vehicle_type, VehicleType::Sedan);
        assert_eq!(booking.booking_status, BookingStatus::Pending);
        assert_eq!(booking.booking_date, now);
        assert_eq!(booking.service_date, Some(now + Duration::days(3)));
        assert_eq!(booking.id.len(), 32);
    }

    #[test]
    fn test_missing_customer_name() {
        let mut req = request();
        req.customer_name = None;
        assert_eq!(message(build_booking(req, Utc::now()).unwrap_err()).0, MISSING_FIELDS);

        let mut req = request();
        req.customer_name = Some(String::new());
        assert_eq!(message(build_booking(req, Utc::now()).unwrap_err()).0, MISSING_FIELDS);
    }

    #[test]
    fn test_whitespace_customer_name() {
        let mut req = request();
        req.customer_name = Some("   ".into());
        assert_eq!(
            message(build_booking(req, Utc::now()).unwrap_err()).0,
            BLANK_CUSTOMER_NAME
        );
    }

    #[test]
    fn test_unknown_vehicle_type() {
        let mut req = request();
        req.vehicle_type = Some("Tractor".into());

        let (msg, details) = message(build_booking(req, Utc::now()).unwrap_err());
        assert!(msg.starts_with("Invalid vehicle type. Must be one of: Hatchback"));
        assert!(details.is_empty());
    }

    #[test]
    fn test_record_constraints_are_collected() {
        let mut req = request();
        req.customer_name = Some("A".into());
        req.total_price = Some(-1.0);
        req.services_included = Some(vec![]);
        req.validity_period = None;
        req.contact_number = Some("12345".into());
        req.email = Some("not-an-email".into());

        let (msg, details) = message(build_booking(req, Utc::now()).unwrap_err());
        assert_eq!(msg, "Validation error");
        assert_eq!(
            details,
            vec![
                "Customer name must be at least 2 characters long",
                "Price cannot be negative",
                "At least one service must be included in the package",
                "Validity period is required",
                "Please provide a valid 10-digit phone number",
                "Please provide a valid email address",
            ]
        );
    }

    #[test]
    fn test_optional_contact_fields() {
        let mut req = request();
        req.contact_number = Some("9876543210".into());
        req.email = Some(" Ravi@Example.COM ".into());
        req.notes = Some("Pick up at 9".into());

        let booking = build_booking(req, Utc::now()).unwrap();
        assert_eq!(booking.email.as_deref(), Some("ravi@example.com"));
        assert_eq!(booking.contact_number.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_service_date_in_past_is_rejected() {
        let now = Utc::now();
        let mut req = request();
        req.service_date = Some(now - Duration::days(2));

        let (_, details) = message(build_booking(req, now).unwrap_err());
        assert_eq!(details, vec!["Service date cannot be in the past"]);

        let mut req = request();
        req.service_date = Some(now + Duration::days(10));
        let booking = build_booking(req, now).unwrap();
        assert_eq!(booking.service_date, Some(now + Duration::days(10)));
    }

    #[test]
    fn test_missing_price_is_required() {
        let mut req = request();
        req.total_price = None;

        let (_, details) = message(build_booking(req, Utc::now()).unwrap_err());
        assert_eq!(details, vec!["Total price is required"]);
    }
}
