use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRequest};
use crate::domain::cart::CartLine;
use crate::domain::errors::DomainError;
use crate::domain::feedback::Feedback;
use crate::domain::identity::Purchaser;
use crate::domain::inventory::InventoryItem;
use crate::domain::order::Order;
use crate::schema::{bookings, cart_lines, feedbacks, inventories, order_lines, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = inventories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InventoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InventoryRow> for InventoryItem {
    fn from(r: InventoryRow) -> Self {
        InventoryItem {
            id: r.id,
            name: r.name,
            description: r.description,
            kind: r.kind,
            quantity: r.quantity,
            unit_price: r.unit_price,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = inventories)]
pub struct NewInventoryRow {
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = inventories)]
pub struct InventoryChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<BigDecimal>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = cart_lines)]
#[diesel(belongs_to(InventoryRow, foreign_key = item_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartLineRow {
    pub id: i64,
    pub customer_id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

impl From<CartLineRow> for CartLine {
    fn from(r: CartLineRow) -> Self {
        CartLine {
            id: r.id,
            customer_id: r.customer_id,
            item_id: r.item_id,
            quantity: r.quantity,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_lines)]
pub struct NewCartLineRow {
    pub customer_id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub ordered_at: DateTime<Utc>,
    pub status: String,
    pub total_price: BigDecimal,
    pub payment_method: String,
    pub email: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(r: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: r.id,
            purchaser: Purchaser::from_columns(r.customer_id, r.staff_id),
            ordered_at: r.ordered_at,
            status: r
                .status
                .parse()
                .map_err(|_| DomainError::Internal(format!("order {} has unknown status '{}'", r.id, r.status)))?,
            total_price: r.total_price,
            payment_method: r.payment_method,
            email: r.email,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub ordered_at: DateTime<Utc>,
    pub status: String,
    pub total_price: BigDecimal,
    pub payment_method: String,
    pub email: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: i64,
    pub order_id: Uuid,
    pub item_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub order_id: Uuid,
    pub item_id: i64,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = feedbacks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct FeedbackRow {
    pub id: i64,
    pub item_id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub rating: i16,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(r: FeedbackRow) -> Self {
        Feedback {
            id: r.id,
            item_id: r.item_id,
            author: Purchaser::from_columns(r.customer_id, r.staff_id),
            rating: r.rating,
            comments: r.comments,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = feedbacks)]
pub struct NewFeedbackRow {
    pub item_id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub rating: i16,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BookingRow {
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

impl From<BookingRow> for Booking {
    fn from(r: BookingRow) -> Self {
        Booking {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            service: r.service,
            stylist: r.stylist,
            room: r.room,
            booking_date: r.booking_date,
            booking_time: r.booking_time,
            notes: r.notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Insert values and full-replacement changeset; a `None` clears the column.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = bookings)]
#[diesel(treat_none_as_null = true)]
pub struct BookingValues {
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

impl From<BookingRequest> for BookingValues {
    fn from(b: BookingRequest) -> Self {
        BookingValues {
            name: b.name,
            email: b.email,
            phone: b.phone,
            service: b.service,
            stylist: b.stylist,
            room: b.room,
            booking_date: b.booking_date,
            booking_time: b.booking_time,
            notes: b.notes,
        }
    }
}
