use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::booking::model::BookingRequest;
use crate::booking::service::{BookingCreated, BookingFound, BookingList, BookingService};
use crate::http::response::ApiError;

pub async fn book_service(
    State(bookings): State<BookingService>,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreated>), ApiError> {
    let Json(req) = body?;
    let created = bookings.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_bookings(
    State(bookings): State<BookingService>,
) -> Result<Json<BookingList>, ApiError> {
    Ok(Json(bookings.list().await?))
}

pub async fn get_booking(
    State(bookings): State<BookingService>,
    Path(id): Path<String>,
) -> Result<Json<BookingFound>, ApiError> {
    Ok(Json(bookings.get(&id).await?))
}
