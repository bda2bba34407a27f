use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::OrderService;
use crate::domain::errors::DomainError;
use crate::domain::order::{
    validate_pagination, OrderItemInput, OrderItemView, OrderPage, OrderStatus, OrderView,
};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    #[schema(example = "1")]
    pub product_id: String,
    #[schema(example = 2)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub items: Vec<CreateOrderItemRequest>,
}

impl CreateOrderRequest {
    fn into_items(self) -> Vec<OrderItemInput> {
        self.items
            .into_iter()
            .map(|i| OrderItemInput {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeOrderStatusRequest {
    #[schema(value_type = String, example = "PAID")]
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i32,
    /// Unit price captured when the order was placed, e.g. "9.99"
    pub price: String,
    /// Product display name; null when not joined or the product no longer exists
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub total_amount: String,
    pub total_items: i32,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(i: OrderItemView) -> Self {
        Self {
            product_id: i.product_id,
            quantity: i.quantity,
            price: i.price.to_string(),
            name: i.name,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            total_amount: o.total_amount.to_string(),
            total_items: o.total_items,
            status: o.status.to_string(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
            items: o.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 10, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Only orders with this status.
    #[param(value_type = Option<String>, example = "PAID")]
    pub status: Option<OrderStatus>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl ListOrdersParams {
    fn validate(&self) -> Result<(), AppError> {
        validate_pagination(self.page, self.limit).map_err(|e| match e {
            DomainError::ValidationFailed(msg) => AppError::BadRequest(msg),
            other => other.into(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaResponse {
    pub total: i64,
    pub page: i64,
    pub last_page: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListOrdersResponse {
    pub data: Vec<OrderResponse>,
    pub meta: PageMetaResponse,
}

impl From<OrderPage> for ListOrdersResponse {
    fn from(p: OrderPage) -> Self {
        Self {
            data: p.data.into_iter().map(OrderResponse::from).collect(),
            meta: PageMetaResponse {
                total: p.meta.total,
                page: p.meta.page,
                last_page: p.meta.last_page,
            },
        }
    }
}

// ── Operations shared by the REST routes and the command router ───────────────

pub(crate) async fn create(
    service: &OrderService,
    body: CreateOrderRequest,
) -> Result<OrderResponse, AppError> {
    let order = service.create_order(body.into_items()).await?;
    Ok(order.into())
}

pub(crate) async fn list(
    service: &OrderService,
    params: ListOrdersParams,
) -> Result<ListOrdersResponse, AppError> {
    params.validate()?;
    let page = service
        .list_orders(params.page, params.limit, params.status)
        .await?;
    Ok(page.into())
}

pub(crate) async fn find_one(service: &OrderService, id: Uuid) -> Result<OrderResponse, AppError> {
    Ok(service.get_order(id).await?.into())
}

pub(crate) async fn change_status(
    service: &OrderService,
    id: Uuid,
    status: OrderStatus,
) -> Result<OrderResponse, AppError> {
    Ok(service.change_order_status(id, status).await?.into())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates a new order. Prices are resolved from the product service and the
/// order is stored together with its items in a single database transaction.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = OrderResponse),
        (status = 400, description = "Validation or processing failed"),
        (status = 503, description = "Product service unavailable"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order = create(&service, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

/// GET /orders
///
/// Returns a page of orders (without their items), newest first.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = ListOrdersResponse),
        (status = 400, description = "Invalid pagination parameters"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<OrderService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let page = list(&service, query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /orders/{id}
///
/// Returns the order with its items, each annotated with the product name.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Product service unavailable"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = find_one(&service, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// PATCH /orders/{id}
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = ChangeOrderStatusRequest,
    responses(
        (status = 200, description = "Order with its current status", body = OrderResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "orders"
)]
pub async fn change_order_status(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
    body: web::Json<ChangeOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let order = change_status(&service, path.into_inner(), body.into_inner().status).await?;
    Ok(HttpResponse::Ok().json(order))
}
