use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use super::errors::{validate_length, DomainError};
use super::identity::Purchaser;

pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Only pending orders move, and only to paid or cancelled. Re-applying the
    /// current status is allowed and changes nothing.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        *self == next || matches!((self, next), (OrderStatus::Pending, OrderStatus::Paid | OrderStatus::Cancelled))
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::validation(format!(
                "status must be one of pending, paid, cancelled (got '{other}')"
            ))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested line as submitted by the caller.
#[derive(Debug, Clone)]
pub struct OrderItemRequest {
    pub item_id: i64,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub items: Vec<OrderItemRequest>,
    pub email: String,
    pub payment_method: Option<String>,
}

impl PlaceOrder {
    /// Validates the request and computes its total from the submitted prices.
    pub fn into_draft(self, purchaser: Purchaser) -> Result<OrderDraft, DomainError> {
        if self.items.is_empty() {
            return Err(DomainError::validation("items must not be empty"));
        }
        for (idx, item) in self.items.iter().enumerate() {
            if item.quantity < 1 {
                return Err(DomainError::validation(format!(
                    "items.{idx}.quantity must be at least 1"
                )));
            }
            if item.price < BigDecimal::zero() {
                return Err(DomainError::validation(format!(
                    "items.{idx}.price must not be negative"
                )));
            }
        }

        let email = self.email.trim().to_string();
        if !email.validate_email() {
            return Err(DomainError::validation("email must be a valid email address"));
        }
        validate_length("email", &email, 255)?;

        let payment_method = match self.payment_method {
            None => DEFAULT_PAYMENT_METHOD.to_string(),
            Some(method) if method.trim().is_empty() => {
                return Err(DomainError::validation("payment_method must not be blank"));
            }
            Some(method) => method.trim().to_string(),
        };
        validate_length("payment_method", &payment_method, 50)?;

        let total = order_total(&self.items);

        Ok(OrderDraft {
            purchaser,
            email,
            payment_method,
            total,
            items: self.items,
        })
    }
}

/// Sum of price × quantity over the submitted lines.
pub fn order_total(items: &[OrderItemRequest]) -> BigDecimal {
    items
        .iter()
        .fold(BigDecimal::zero(), |acc, item| {
            acc + &item.price * BigDecimal::from(item.quantity)
        })
}

/// A validated order, ready to be committed.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub purchaser: Purchaser,
    pub email: String,
    pub payment_method: String,
    pub total: BigDecimal,
    pub items: Vec<OrderItemRequest>,
}

impl OrderDraft {
    /// Requested quantity per item id, in order of first appearance.
    pub fn demand(&self) -> Result<Vec<(i64, i32)>, DomainError> {
        let mut demand: Vec<(i64, i32)> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match demand.iter_mut().find(|(id, _)| *id == item.item_id) {
                Some((_, qty)) => {
                    *qty = qty.checked_add(item.quantity).ok_or_else(|| {
                        DomainError::validation(format!(
                            "requested quantity for item {} is too large",
                            item.item_id
                        ))
                    })?;
                }
                None => demand.push((item.item_id, item.quantity)),
            }
        }
        Ok(demand)
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub purchaser: Option<Purchaser>,
    pub ordered_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_price: BigDecimal,
    pub payment_method: String,
    pub email: String,
}

/// An order line joined with its item's descriptive fields.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderLineView {
    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub order: Order,
    pub lines: Vec<OrderLineView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_id: i64, quantity: i32, price: &str) -> OrderItemRequest {
        OrderItemRequest {
            item_id,
            quantity,
            price: BigDecimal::from_str(price).unwrap(),
        }
    }

    fn request(items: Vec<OrderItemRequest>) -> PlaceOrder {
        PlaceOrder {
            items,
            email: "ana@example.com".to_string(),
            payment_method: None,
        }
    }

    #[test]
    fn total_uses_submitted_prices() {
        let draft = request(vec![item(1, 3, "4.50"), item(2, 1, "10")])
            .into_draft(Purchaser::Customer(1))
            .unwrap();
        assert_eq!(draft.total, BigDecimal::from_str("23.50").unwrap());
    }

    #[test]
    fn payment_method_defaults_to_cash() {
        let draft = request(vec![item(1, 1, "1")])
            .into_draft(Purchaser::Staff(2))
            .unwrap();
        assert_eq!(draft.payment_method, "cash");
    }

    #[test]
    fn rejects_empty_items() {
        let err = request(vec![]).into_draft(Purchaser::Customer(1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_zero_quantity_and_negative_price() {
        assert!(request(vec![item(1, 0, "1")])
            .into_draft(Purchaser::Customer(1))
            .is_err());
        assert!(request(vec![item(1, 1, "-1")])
            .into_draft(Purchaser::Customer(1))
            .is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        let mut req = request(vec![item(1, 1, "1")]);
        req.email = "not-an-email".to_string();
        assert!(matches!(
            req.into_draft(Purchaser::Customer(1)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn rejects_blank_payment_method() {
        let mut req = request(vec![item(1, 1, "1")]);
        req.payment_method = Some("  ".to_string());
        assert!(req.into_draft(Purchaser::Customer(1)).is_err());
    }

    #[test]
    fn payment_method_must_fit_its_column() {
        let mut req = request(vec![item(1, 1, "1")]);
        req.payment_method = Some("m".repeat(60));
        assert!(matches!(
            req.into_draft(Purchaser::Customer(1)),
            Err(DomainError::Validation(_))
        ));

        let mut req = request(vec![item(1, 1, "1")]);
        req.payment_method = Some("m".repeat(50));
        assert!(req.into_draft(Purchaser::Customer(1)).is_ok());
    }

    #[test]
    fn demand_merges_repeated_items() {
        let draft = request(vec![item(5, 2, "1"), item(3, 1, "1"), item(5, 4, "1")])
            .into_draft(Purchaser::Customer(1))
            .unwrap();
        assert_eq!(draft.demand().unwrap(), vec![(5, 6), (3, 1)]);
    }

    #[test]
    fn status_transitions_only_leave_pending() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Paid));
        assert!(!Paid.can_transition_to(Cancelled));
    }

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
