use std::sync::Arc;

use crate::domain::cart::{validate_cart_quantity, CartEntry, CartLine};
use crate::domain::errors::DomainError;
use crate::domain::identity::Caller;
use crate::domain::ports::CartRepository;

/// Customer-only cart operations. Every call is scoped to the caller's own lines.
#[derive(Clone)]
pub struct CartService {
    repo: Arc<dyn CartRepository>,
}

impl CartService {
    pub fn new(repo: Arc<dyn CartRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self, caller: &Caller) -> Result<Vec<CartEntry>, DomainError> {
        let customer_id = caller.require_customer()?;
        self.repo.list(customer_id)
    }

    pub fn add_or_merge(
        &self,
        caller: &Caller,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        let customer_id = caller.require_customer()?;
        validate_cart_quantity(quantity)?;
        self.repo.add_or_merge(customer_id, item_id, quantity)
    }

    pub fn set_quantity(
        &self,
        caller: &Caller,
        line_id: i64,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        let customer_id = caller.require_customer()?;
        validate_cart_quantity(quantity)?;
        self.repo
            .set_quantity(customer_id, line_id, quantity)?
            .ok_or_else(|| DomainError::not_found(format!("Cart line {line_id}")))
    }

    pub fn remove(&self, caller: &Caller, line_id: i64) -> Result<(), DomainError> {
        let customer_id = caller.require_customer()?;
        if !self.repo.remove(customer_id, line_id)? {
            return Err(DomainError::not_found(format!("Cart line {line_id}")));
        }
        Ok(())
    }

    pub fn clear(&self, caller: &Caller) -> Result<usize, DomainError> {
        let customer_id = caller.require_customer()?;
        self.repo.clear(customer_id)
    }
}
