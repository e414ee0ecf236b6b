use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{blocking, decimal, optional_decimal};
use crate::domain::identity::Caller;
use crate::domain::inventory::{InventoryItem, ItemPatch, NewItem, ProductView};
use crate::errors::AppError;
use crate::state::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to "product".
    pub kind: Option<String>,
    pub quantity: i32,
    /// Decimal price as a number or a string, e.g. "12.50"
    #[serde(deserialize_with = "decimal")]
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    /// New stock level. This is how stock is replenished.
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "optional_decimal")]
    #[schema(value_type = Option<String>)]
    pub unit_price: Option<BigDecimal>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub quantity: i32,
    pub unit_price: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    #[serde(flatten)]
    pub item: ItemResponse,
    pub average_rating: f64,
}

impl From<InventoryItem> for ItemResponse {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            kind: item.kind,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            created_at: item.created_at.to_rfc3339(),
            updated_at: item.updated_at.to_rfc3339(),
        }
    }
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        Self {
            item: view.item.into(),
            average_rating: view.average_rating,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products with their average rating", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let products = blocking(move || state.inventory.list_products()).await?;
    let body: Vec<ProductResponse> = products.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn get_product(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = blocking(move || state.inventory.get_product(id)).await?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /products
///
/// Admins and receptionists only.
#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ItemResponse),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing identity"),
        (status = 403, description = "Role not allowed"),
    ),
    tag = "products"
)]
pub async fn create_product(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let new_item = NewItem {
        name: body.name,
        description: body.description,
        kind: body.kind.unwrap_or_else(|| "product".to_string()),
        quantity: body.quantity,
        unit_price: body.unit_price,
    };
    let item = blocking(move || state.inventory.create_product(&caller, new_item)).await?;
    Ok(HttpResponse::Created().json(ItemResponse::from(item)))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ItemResponse),
        (status = 400, description = "Invalid update"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Product not found"),
    ),
    tag = "products"
)]
pub async fn update_product(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let patch = ItemPatch {
        name: body.name,
        description: body.description,
        kind: body.kind,
        quantity: body.quantity,
        unit_price: body.unit_price,
    };
    let item = blocking(move || state.inventory.update_product(&caller, id, patch)).await?;
    Ok(HttpResponse::Ok().json(ItemResponse::from(item)))
}

/// DELETE /products/{id}
///
/// Admins and receptionists only. Products that appear in an order are kept.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 204, description = "Product deleted with its cart lines and feedback"),
        (status = 403, description = "Role not allowed"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product appears in existing orders"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    state: web::Data<AppState>,
    caller: Caller,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.inventory.delete_product(&caller, id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
