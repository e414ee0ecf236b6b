use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Insufficient stock for {item_name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        item_id: i64,
        item_name: String,
        available: i32,
        requested: i32,
    },
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(what: impl Into<String>) -> Self {
        DomainError::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

/// Rejects `value` when it is longer than `max` characters (not bytes, to match VARCHAR).
pub fn validate_length(field: &str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_names_item_and_quantities() {
        let err = DomainError::InsufficientStock {
            item_id: 7,
            item_name: "Argan Oil".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Argan Oil. Available: 2, Requested: 3"
        );
    }

    #[test]
    fn length_counts_characters() {
        let accented = "é".repeat(200);
        assert!(validate_length("name", &accented, 255).is_ok());
        assert!(matches!(
            validate_length("kind", &"x".repeat(51), 50),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn not_found_display() {
        assert_eq!(DomainError::not_found("Item 4").to_string(), "Item 4 not found");
    }
}
