pub mod auth;
pub mod bookings;
pub mod cart;
pub mod feedback;
pub mod orders;
pub mod products;

use std::str::FromStr;

use actix_web::web;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};
use utoipa::OpenApi;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        cart::list_cart,
        cart::add_to_cart,
        cart::update_cart_line,
        cart::remove_cart_line,
        cart::clear_cart,
        orders::place_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        feedback::list_feedback,
        feedback::submit_feedback,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking,
        bookings::delete_booking,
    ),
    tags(
        (name = "products", description = "Retail catalog and stock"),
        (name = "cart", description = "Customer shopping carts"),
        (name = "orders", description = "Order placement and the order desk"),
        (name = "feedback", description = "Product ratings"),
        (name = "bookings", description = "Salon appointments"),
    )
)]
pub struct ApiDoc;

/// Runs a blocking service call on actix's thread pool.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDecimal {
    Number(serde_json::Number),
    Text(String),
}

/// Accepts a decimal as a JSON number or a string, keeping the digits as written.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match RawDecimal::deserialize(deserializer)? {
        RawDecimal::Number(n) => n.to_string(),
        RawDecimal::Text(s) => s,
    };
    BigDecimal::from_str(text.trim())
        .map_err(|e| serde::de::Error::custom(format!("invalid decimal '{text}': {e}")))
}

pub(crate) fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "decimal")] BigDecimal);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(d)| d))
}
