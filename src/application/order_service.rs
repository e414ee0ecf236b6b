use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::identity::{Caller, Purchaser};
use crate::domain::notification::OrderConfirmation;
use crate::domain::order::{OrderStatus, OrderView, PlaceOrder};
use crate::domain::ports::{OrderNotifier, OrderRepository};

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    notifier: Arc<dyn OrderNotifier>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self { repo, notifier }
    }

    /// Validates the request, commits it through the repository as a single
    /// unit of work, then sends a confirmation. A failed confirmation is
    /// logged and does not affect the committed order.
    pub fn place_order(&self, caller: &Caller, request: PlaceOrder) -> Result<OrderView, DomainError> {
        let draft = request.into_draft(caller.purchaser())?;
        let view = self.repo.place(draft)?;

        log::info!(
            "Order {} placed by {:?}: {} line(s), total {}",
            view.order.id,
            caller.purchaser(),
            view.lines.len(),
            view.order.total_price
        );

        let confirmation = OrderConfirmation::from_order(&view);
        if let Err(e) = self.notifier.send(&confirmation) {
            log::error!("Email sending error for order {}: {}", view.order.id, e);
        }

        Ok(view)
    }

    /// Customers only see their own orders; anything else reads as not found.
    pub fn get_order(&self, caller: &Caller, id: Uuid) -> Result<OrderView, DomainError> {
        let view = self
            .repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))?;

        if let Some(customer_id) = caller.customer_id() {
            if view.order.purchaser != Some(Purchaser::Customer(customer_id)) {
                return Err(DomainError::not_found(format!("Order {id}")));
            }
        }
        Ok(view)
    }

    pub fn list_orders(&self, caller: &Caller) -> Result<Vec<OrderView>, DomainError> {
        caller.require_staff(&[])?;
        self.repo.list()
    }

    pub fn update_status(
        &self,
        caller: &Caller,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<OrderView, DomainError> {
        caller.require_staff(&[])?;
        let view = self
            .repo
            .transition_status(id, status)?
            .ok_or_else(|| DomainError::not_found(format!("Order {id}")))?;
        log::info!("Order {} status set to {}", id, status);
        Ok(view)
    }
}
