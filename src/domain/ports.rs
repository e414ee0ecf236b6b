use uuid::Uuid;

use super::booking::{Booking, BookingRequest};
use super::cart::{CartEntry, CartLine};
use super::errors::DomainError;
use super::feedback::{Feedback, NewFeedback};
use super::inventory::{InventoryItem, ItemPatch, NewItem, ProductView};
use super::notification::{NotifyError, OrderConfirmation};
use super::order::{OrderDraft, OrderStatus, OrderView};

pub trait InventoryRepository: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<ProductView>, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError>;
    fn create(&self, item: NewItem) -> Result<InventoryItem, DomainError>;
    fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<InventoryItem>, DomainError>;
    /// Removes the item with its cart lines and feedback. `false` when it does
    /// not exist; `Conflict` while orders still reference it.
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait CartRepository: Send + Sync + 'static {
    fn list(&self, customer_id: i64) -> Result<Vec<CartEntry>, DomainError>;
    /// Adds `quantity` to the customer's line for `item_id`, creating it if absent.
    fn add_or_merge(&self, customer_id: i64, item_id: i64, quantity: i32)
        -> Result<CartLine, DomainError>;
    /// `None` when the line does not exist or belongs to someone else.
    fn set_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError>;
    fn remove(&self, customer_id: i64, line_id: i64) -> Result<bool, DomainError>;
    fn clear(&self, customer_id: i64) -> Result<usize, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Commits the draft as one unit: availability check, stock decrement,
    /// order and line inserts, and clearing a customer's cart. Nothing is
    /// written unless every step succeeds.
    fn place(&self, draft: OrderDraft) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self) -> Result<Vec<OrderView>, DomainError>;
    /// `None` when the order does not exist; `InvalidTransition` when the
    /// current status may not move to `next`.
    fn transition_status(
        &self,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError>;
}

pub trait FeedbackRepository: Send + Sync + 'static {
    fn list_for_item(&self, item_id: i64) -> Result<Vec<Feedback>, DomainError>;
    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError>;
}

pub trait BookingRepository: Send + Sync + 'static {
    /// Ordered by appointment date and time.
    fn list(&self) -> Result<Vec<Booking>, DomainError>;
    fn find_by_id(&self, id: i64) -> Result<Option<Booking>, DomainError>;
    fn create(&self, booking: BookingRequest) -> Result<Booking, DomainError>;
    /// Replaces every field. `None` when the booking does not exist.
    fn update(&self, id: i64, booking: BookingRequest) -> Result<Option<Booking>, DomainError>;
    fn delete(&self, id: i64) -> Result<bool, DomainError>;
}

pub trait OrderNotifier: Send + Sync + 'static {
    fn send(&self, confirmation: &OrderConfirmation) -> Result<(), NotifyError>;
}
