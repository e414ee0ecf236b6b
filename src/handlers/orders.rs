use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{blocking, decimal};
use crate::domain::identity::{Caller, Purchaser};
use crate::domain::order::{OrderItemRequest, OrderLineView, OrderStatus, OrderView, PlaceOrder};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemPayload {
    pub item_id: i64,
    pub quantity: i32,
    /// Unit price charged for this line, as a number or a string, e.g. "9.99"
    #[serde(deserialize_with = "decimal")]
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemPayload>,
    /// Where the confirmation is sent.
    pub email: String,
    /// Defaults to "cash".
    pub payment_method: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of pending, paid, cancelled.
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub item_description: Option<String>,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub status: String,
    pub total_price: String,
    pub payment_method: String,
    pub email: String,
    pub ordered_at: String,
    pub lines: Vec<OrderLineResponse>,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(line: OrderLineView) -> Self {
        let subtotal = line.subtotal().to_string();
        Self {
            id: line.id,
            item_id: line.item_id,
            item_name: line.item_name,
            item_description: line.item_description,
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            subtotal,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(view: OrderView) -> Self {
        let (customer_id, staff_id) = view
            .order
            .purchaser
            .as_ref()
            .map(Purchaser::columns)
            .unwrap_or((None, None));
        Self {
            id: view.order.id,
            customer_id,
            staff_id,
            status: view.order.status.to_string(),
            total_price: view.order.total_price.to_string(),
            payment_method: view.order.payment_method,
            email: view.order.email,
            ordered_at: view.order.ordered_at.to_rfc3339(),
            lines: view.lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PlaceOrderRequest> for PlaceOrder {
    fn from(req: PlaceOrderRequest) -> Self {
        PlaceOrder {
            items: req
                .items
                .into_iter()
                .map(|i| OrderItemRequest {
                    item_id: i.item_id,
                    quantity: i.quantity,
                    price: i.price,
                })
                .collect(),
            email: req.email,
            payment_method: req.payment_method,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Checks every line against stock, decrements it, records the order and
/// empties a customer's cart in one database transaction. The confirmation is
/// sent after commit; a failed send does not fail the request.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid order or insufficient stock"),
        (status = 401, description = "Missing identity"),
        (status = 404, description = "Unknown item"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn place_order(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = PlaceOrder::from(body.into_inner());
    let view = blocking(move || state.orders.place_order(&caller, request)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(view)))
}

/// GET /orders
///
/// Staff only. Newest first, each order with its lines.
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders", body = [OrderResponse]),
        (status = 403, description = "Not a staff member"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    state: web::Data<AppState>,
    caller: Caller,
) -> Result<HttpResponse, AppError> {
    let orders = blocking(move || state.orders.list_orders(&caller)).await?;
    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
///
/// Customers can only see their own orders.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let view = blocking(move || state.orders.get_order(&caller, order_id)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}

/// PUT /orders/{id}
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not a staff member"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status: OrderStatus = body.status.trim().parse()?;
    let view = blocking(move || state.orders.update_status(&caller, order_id, status)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(view)))
}
