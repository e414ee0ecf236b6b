use std::fmt::Write as _;

use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::order::OrderView;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification rejected with status {0}")]
    Rejected(u16),
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationLine {
    pub item_name: String,
    pub quantity: i32,
    pub subtotal: String,
}

/// The message sent to a purchaser once their order has been committed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub to: String,
    pub subject: String,
    pub order_id: Uuid,
    pub lines: Vec<ConfirmationLine>,
    pub total: String,
    pub payment_method: String,
    pub status: String,
    pub ordered_at: String,
    pub body: String,
}

impl OrderConfirmation {
    pub fn from_order(view: &OrderView) -> Self {
        let order = &view.order;
        let lines: Vec<ConfirmationLine> = view
            .lines
            .iter()
            .map(|l| ConfirmationLine {
                item_name: l.item_name.clone(),
                quantity: l.quantity,
                subtotal: money(&l.subtotal()),
            })
            .collect();
        let total = money(&order.total_price);
        let payment_method = capitalize(&order.payment_method);
        let status = capitalize(order.status.as_str());
        let ordered_at = order.ordered_at.format("%B %-d, %Y at %-I:%M %p").to_string();

        let mut body = String::new();
        let _ = writeln!(body, "Order Confirmed!");
        let _ = writeln!(body, "Order #{}", order.id);
        let _ = writeln!(body);
        for line in &lines {
            let _ = writeln!(body, "{} x{}  ${}", line.item_name, line.quantity, line.subtotal);
        }
        let _ = writeln!(body);
        let _ = writeln!(body, "Total Amount: ${} USD", total);
        let _ = writeln!(body, "Payment method: {}", payment_method);
        let _ = writeln!(body, "Status: {}", status);
        let _ = writeln!(body, "Order date: {}", ordered_at);

        Self {
            to: order.email.clone(),
            subject: format!("Order confirmation #{}", order.id),
            order_id: order.id,
            lines,
            total,
            payment_method,
            status,
            ordered_at,
            body,
        }
    }
}

/// Two-decimal money rendering, e.g. `4.5` -> `4.50`.
pub fn money(value: &BigDecimal) -> String {
    value.round(2).with_scale(2).to_string()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
