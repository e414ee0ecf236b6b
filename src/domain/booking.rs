//! Salon appointments: who is coming, for which service, with which stylist
//! and in which room.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use validator::ValidateEmail;

use super::errors::{validate_length, DomainError};

#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub stylist: String,
    pub room: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every field of a booking. Used both to create one and to replace one.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub stylist: String,
    pub room: String,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub notes: Option<String>,
}

impl BookingRequest {
    /// New bookings must carry a phone number.
    pub fn validate_new(self) -> Result<Self, DomainError> {
        let request = self.normalize()?;
        if request.phone.is_none() {
            return Err(DomainError::validation("phone is required"));
        }
        Ok(request)
    }

    pub fn validate_update(self) -> Result<Self, DomainError> {
        self.normalize()
    }

    fn normalize(self) -> Result<Self, DomainError> {
        let name = required("name", self.name, 255)?;
        let email = required("email", self.email, 255)?;
        if !email.validate_email() {
            return Err(DomainError::validation("email must be a valid email address"));
        }
        let phone = optional(self.phone);
        if let Some(phone) = &phone {
            validate_length("phone", phone, 20)?;
        }

        Ok(Self {
            name,
            email,
            phone,
            service: required("service", self.service, 255)?,
            stylist: required("stylist", self.stylist, 255)?,
            room: required("room", self.room, 255)?,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            notes: optional(self.notes),
        })
    }
}

fn required(field: &str, value: String, max: usize) -> Result<String, DomainError> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    validate_length(field, &value, max)?;
    Ok(value)
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a wall-clock time given as `HH:MM` (seconds are accepted and kept).
pub fn parse_booking_time(raw: &str) -> Result<NaiveTime, DomainError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| DomainError::validation(format!("booking_time must be HH:MM (got '{raw}')")))
}
