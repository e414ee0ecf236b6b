use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::errors::{validate_length, DomainError};

#[derive(Debug, Clone)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An inventory item together with its average feedback rating (0 when unrated).
#[derive(Debug, Clone)]
pub struct ProductView {
    pub item: InventoryItem,
    pub average_rating: f64,
}

#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl NewItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_name(&self.name)?;
        validate_kind(&self.kind)?;
        validate_stock(self.quantity)?;
        validate_price(&self.unit_price)
    }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<BigDecimal>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(kind) = &self.kind {
            validate_kind(kind)?;
        }
        if let Some(quantity) = self.quantity {
            validate_stock(quantity)?;
        }
        if let Some(price) = &self.unit_price {
            validate_price(price)?;
        }
        Ok(())
    }

    pub fn apply(self, item: &mut InventoryItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(price) = self.unit_price {
            item.unit_price = price;
        }
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name must not be blank"));
    }
    validate_length("name", name, 255)
}

fn validate_kind(kind: &str) -> Result<(), DomainError> {
    if kind.trim().is_empty() {
        return Err(DomainError::validation("kind must not be blank"));
    }
    validate_length("kind", kind, 50)
}

fn validate_stock(quantity: i32) -> Result<(), DomainError> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity must not be negative"));
    }
    Ok(())
}

fn validate_price(price: &BigDecimal) -> Result<(), DomainError> {
    if price < &BigDecimal::zero() {
        return Err(DomainError::validation("unit_price must not be negative"));
    }
    Ok(())
}

/// Rounds an average rating to one decimal place.
pub fn round_rating(average: f64) -> f64 {
    (average * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn new_item(quantity: i32, price: &str) -> NewItem {
        NewItem {
            name: "Keratin Mask".to_string(),
            description: None,
            kind: "product".to_string(),
            quantity,
            unit_price: BigDecimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn new_item_rejects_negative_stock_and_price() {
        assert!(new_item(0, "0").validate().is_ok());
        assert!(matches!(
            new_item(-1, "1.00").validate(),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            new_item(1, "-0.01").validate(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut item = new_item(1, "1");
        item.name = "   ".to_string();
        assert!(item.validate().is_err());
    }

    #[test]
    fn multibyte_names_are_measured_in_characters() {
        let mut item = new_item(1, "1");
        item.name = "ñ".repeat(200);
        assert!(item.validate().is_ok());
        item.name = "ñ".repeat(256);
        assert!(matches!(item.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn kind_must_fit_its_column() {
        let mut item = new_item(1, "1");
        item.kind = "k".repeat(51);
        assert!(matches!(item.validate(), Err(DomainError::Validation(_))));

        let patch = ItemPatch {
            kind: Some("k".repeat(51)),
            ..Default::default()
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));
        let patch = ItemPatch {
            kind: Some("service".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let now = Utc::now();
        let mut item = InventoryItem {
            id: 1,
            name: "Shampoo".to_string(),
            description: Some("500ml".to_string()),
            kind: "product".to_string(),
            quantity: 4,
            unit_price: BigDecimal::from(12),
            created_at: now,
            updated_at: now,
        };
        ItemPatch {
            quantity: Some(20),
            ..Default::default()
        }
        .apply(&mut item);

        assert_eq!(item.quantity, 20);
        assert_eq!(item.name, "Shampoo");
        assert_eq!(item.description.as_deref(), Some("500ml"));
    }

    #[test]
    fn ratings_round_to_one_decimal() {
        assert_eq!(round_rating(4.25), 4.3);
        assert_eq!(round_rating(3.0), 3.0);
        assert_eq!(round_rating(11.0 / 3.0), 3.7);
    }
}
