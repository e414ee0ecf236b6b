use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::booking::{Booking, BookingRequest};
use crate::domain::errors::DomainError;
use crate::domain::ports::BookingRepository;
use crate::schema::bookings;

use super::models::{BookingRow, BookingValues};

pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BookingRepository for DieselBookingRepository {
    fn list(&self) -> Result<Vec<Booking>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = bookings::table
            .order((
                bookings::booking_date.asc(),
                bookings::booking_time.asc(),
                bookings::id.asc(),
            ))
            .select(BookingRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Booking>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = bookings::table
            .find(id)
            .select(BookingRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn create(&self, booking: BookingRequest) -> Result<Booking, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(bookings::table)
            .values(&BookingValues::from(booking))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, id: i64, booking: BookingRequest) -> Result<Option<Booking>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(bookings::table.find(id))
            .set(&BookingValues::from(booking))
            .returning(BookingRow::as_returning())
            .get_result(&mut conn)
            .optional()?;
        Ok(row.map(Into::into))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(bookings::table.find(id)).execute(&mut conn)?;
        Ok(deleted == 1)
    }
}
