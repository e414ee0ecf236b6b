use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::blocking;
use crate::domain::cart::{CartEntry, CartLine};
use crate::domain::identity::Caller;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartLineRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartEntryResponse {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub unit_price: String,
    pub quantity: i32,
    /// Stock on hand right now; the cart itself reserves nothing.
    pub in_stock: i32,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.id,
            item_id: line.item_id,
            quantity: line.quantity,
        }
    }
}

impl From<CartEntry> for CartEntryResponse {
    fn from(entry: CartEntry) -> Self {
        Self {
            id: entry.line.id,
            item_id: entry.line.item_id,
            item_name: entry.item_name,
            unit_price: entry.unit_price.to_string(),
            quantity: entry.line.quantity,
            in_stock: entry.in_stock,
        }
    }
}

/// GET /cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "The caller's cart", body = [CartEntryResponse]),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Not a customer"),
    ),
    tag = "cart"
)]
pub async fn list_cart(state: web::Data<AppState>, caller: Caller) -> Result<HttpResponse, AppError> {
    let entries = blocking(move || state.cart.list(&caller)).await?;
    let body: Vec<CartEntryResponse> = entries.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /cart
///
/// Adding an item already in the cart increments that line.
#[utoipa::path(
    post,
    path = "/cart",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Line created or merged", body = CartLineResponse),
        (status = 400, description = "Quantity below one"),
        (status = 404, description = "Item not found"),
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    let AddToCartRequest { item_id, quantity } = body.into_inner();
    let line = blocking(move || state.cart.add_or_merge(&caller, item_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartLineResponse::from(line)))
}

/// PUT /cart/{id}
#[utoipa::path(
    put,
    path = "/cart/{id}",
    params(("id" = i64, Path, description = "Cart line id")),
    request_body = UpdateCartLineRequest,
    responses(
        (status = 200, description = "Quantity replaced", body = CartLineResponse),
        (status = 404, description = "No such line in the caller's cart"),
    ),
    tag = "cart"
)]
pub async fn update_cart_line(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<UpdateCartLineRequest>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    let quantity = body.quantity;
    let line = blocking(move || state.cart.set_quantity(&caller, line_id, quantity)).await?;
    Ok(HttpResponse::Ok().json(CartLineResponse::from(line)))
}

/// DELETE /cart/{id}
#[utoipa::path(
    delete,
    path = "/cart/{id}",
    params(("id" = i64, Path, description = "Cart line id")),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "No such line in the caller's cart"),
    ),
    tag = "cart"
)]
pub async fn remove_cart_line(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let line_id = path.into_inner();
    blocking(move || state.cart.remove(&caller, line_id)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /cart/clear
#[utoipa::path(
    delete,
    path = "/cart/clear",
    responses((status = 200, description = "Number of lines removed")),
    tag = "cart"
)]
pub async fn clear_cart(state: web::Data<AppState>, caller: Caller) -> Result<HttpResponse, AppError> {
    let removed = blocking(move || state.cart.clear(&caller)).await?;
    Ok(HttpResponse::Ok().json(json!({ "removed": removed })))
}
