use bigdecimal::BigDecimal;

use super::errors::DomainError;

#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: i64,
    pub customer_id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

/// A cart line joined with the descriptive fields of its item.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub line: CartLine,
    pub item_name: String,
    pub unit_price: BigDecimal,
    pub in_stock: i32,
}

pub fn validate_cart_quantity(quantity: i32) -> Result<(), DomainError> {
    if quantity < 1 {
        return Err(DomainError::validation("quantity must be at least 1"));
    }
    Ok(())
}

/// Quantity of a line after adding `added` more of the same item.
pub fn merged_quantity(current: i32, added: i32) -> Result<i32, DomainError> {
    current
        .checked_add(added)
        .ok_or_else(|| DomainError::validation("cart quantity is too large"))
}
