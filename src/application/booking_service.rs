use std::sync::Arc;

use crate::domain::booking::{Booking, BookingRequest};
use crate::domain::errors::DomainError;
use crate::domain::identity::Caller;
use crate::domain::ports::BookingRepository;

/// Anyone may book an appointment. Reading and changing bookings is for staff.
#[derive(Clone)]
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(repo: Arc<dyn BookingRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self, caller: &Caller) -> Result<Vec<Booking>, DomainError> {
        caller.require_staff(&[])?;
        self.repo.list()
    }

    pub fn get(&self, caller: &Caller, id: i64) -> Result<Booking, DomainError> {
        caller.require_staff(&[])?;
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Booking {id}")))
    }

    pub fn create(&self, request: BookingRequest) -> Result<Booking, DomainError> {
        let booking = self.repo.create(request.validate_new()?)?;
        log::info!(
            "Booking {} for {} on {} at {}",
            booking.id,
            booking.service,
            booking.booking_date,
            booking.booking_time.format("%H:%M")
        );
        Ok(booking)
    }

    pub fn update(
        &self,
        caller: &Caller,
        id: i64,
        request: BookingRequest,
    ) -> Result<Booking, DomainError> {
        caller.require_staff(&[])?;
        let request = request.validate_update()?;
        self.repo
            .update(id, request)?
            .ok_or_else(|| DomainError::not_found(format!("Booking {id}")))
    }

    pub fn delete(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        caller.require_staff(&[])?;
        if !self.repo.delete(id)? {
            return Err(DomainError::not_found(format!("Booking {id}")));
        }
        log::info!("Booking {id} deleted");
        Ok(())
    }
}
