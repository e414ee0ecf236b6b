use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::blocking;
use crate::domain::booking::{parse_booking_time, Booking, BookingRequest};
use crate::domain::identity::Caller;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookingPayload {
    pub name: String,
    pub email: String,
    /// Required when booking, optional when replacing a booking.
    pub phone: Option<String>,
    pub service: String,
    pub stylist: String,
    pub room: String,
    /// YYYY-MM-DD
    #[schema(value_type = String, example = "2026-11-12")]
    pub booking_date: NaiveDate,
    /// HH:MM
    #[schema(example = "14:30")]
    pub booking_time: String,
    pub notes: Option<String>,
}

impl BookingPayload {
    fn into_request(self) -> Result<BookingRequest, AppError> {
        Ok(BookingRequest {
            booking_time: parse_booking_time(&self.booking_time)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            service: self.service,
            stylist: self.stylist,
            room: self.room,
            booking_date: self.booking_date,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub stylist: String,
    pub room: String,
    pub booking_date: String,
    pub booking_time: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            name: b.name,
            email: b.email,
            phone: b.phone,
            service: b.service,
            stylist: b.stylist,
            room: b.room,
            booking_date: b.booking_date.format("%Y-%m-%d").to_string(),
            booking_time: b.booking_time.format("%H:%M").to_string(),
            notes: b.notes,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

/// GET /bookings
#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "Bookings by appointment date and time", body = [BookingResponse]),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Staff only"),
    ),
    tag = "bookings"
)]
pub async fn list_bookings(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let bookings = blocking(move || state.bookings.list(&caller)).await?;
    let body: Vec<BookingResponse> = bookings.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /bookings/{id}
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking found", body = BookingResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn get_booking(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let booking = blocking(move || state.bookings.get(&caller, id)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// POST /bookings
///
/// Open to guests; no identity headers needed.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = BookingPayload,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid booking"),
    ),
    tag = "bookings"
)]
pub async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<BookingPayload>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner().into_request()?;
    let booking = blocking(move || state.bookings.create(request)).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(booking)))
}

/// PUT /bookings/{id}
///
/// Replaces every field of the booking.
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    request_body = BookingPayload,
    responses(
        (status = 200, description = "Booking replaced", body = BookingResponse),
        (status = 400, description = "Invalid booking"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn update_booking(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<BookingPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = body.into_inner().into_request()?;
    let booking = blocking(move || state.bookings.update(&caller, id, request)).await?;
    Ok(HttpResponse::Ok().json(BookingResponse::from(booking)))
}

/// DELETE /bookings/{id}
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 204, description = "Booking deleted"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Booking not found"),
    ),
    tag = "bookings"
)]
pub async fn delete_booking(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.bookings.delete(&caller, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
