//! Command router: dispatches `POST /rpc/{command}` to an order operation by name.
//!
//! | Command             | Payload                                   |
//! |---------------------|-------------------------------------------|
//! | `createOrder`       | `{ "items": [{ "productId", "quantity" }] }` |
//! | `findAllOrders`     | `{ "page"?, "limit"?, "status"? }`        |
//! | `findOneOrder`      | `{ "id" }`                                |
//! | `changeOrderStatus` | `{ "id", "status" }`                      |

use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::orders::{self, CreateOrderRequest, ListOrdersParams, OrderResponse};
use crate::application::OrderService;
use crate::domain::order::OrderStatus;
use crate::errors::AppError;

pub const CREATE_ORDER: &str = "createOrder";
pub const FIND_ALL_ORDERS: &str = "findAllOrders";
pub const FIND_ONE_ORDER: &str = "findOneOrder";
pub const CHANGE_ORDER_STATUS: &str = "changeOrderStatus";

pub const COMMANDS: [&str; 4] = [
    CREATE_ORDER,
    FIND_ALL_ORDERS,
    FIND_ONE_ORDER,
    CHANGE_ORDER_STATUS,
];

#[derive(Debug, Deserialize)]
struct OrderIdPayload {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ChangeOrderStatusPayload {
    id: Uuid,
    status: OrderStatus,
}

fn decode<T: DeserializeOwned>(command: &str, payload: Value) -> Result<T, AppError> {
    serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("invalid {command} payload: {e}")))
}

/// An empty body is treated as an empty JSON object.
fn parse_payload(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("malformed JSON: {e}")))
}

/// POST /rpc/{command}
///
/// Runs the named order operation. Failures are returned as
/// `{ "status": <code>, "message": <text> }`.
#[utoipa::path(
    post,
    path = "/rpc/{command}",
    params(
        ("command" = String, Path, description = "createOrder | findAllOrders | findOneOrder | changeOrderStatus"),
    ),
    request_body(
        content = Object,
        content_type = "application/json",
        description = "Command payload; an empty body counts as `{}`"
    ),
    responses(
        (status = 200, description = "Operation result"),
        (status = 400, description = "Malformed payload or validation failure"),
        (status = 404, description = "Unknown command or order not found"),
        (status = 503, description = "Product service unavailable"),
    ),
    tag = "commands"
)]
pub async fn dispatch(
    service: web::Data<OrderService>,
    command: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let command = command.into_inner();
    if !COMMANDS.contains(&command.as_str()) {
        return Err(AppError::UnknownCommand(command));
    }
    let payload = parse_payload(&body)?;
    log::debug!("Dispatching {}", command);

    match command.as_str() {
        CREATE_ORDER => {
            let request: CreateOrderRequest = decode(&command, payload)?;
            let order: OrderResponse = orders::create(&service, request).await?;
            Ok(HttpResponse::Ok().json(order))
        }
        FIND_ALL_ORDERS => {
            let params: ListOrdersParams = decode(&command, payload)?;
            Ok(HttpResponse::Ok().json(orders::list(&service, params).await?))
        }
        FIND_ONE_ORDER => {
            let OrderIdPayload { id } = decode(&command, payload)?;
            Ok(HttpResponse::Ok().json(orders::find_one(&service, id).await?))
        }
        CHANGE_ORDER_STATUS => {
            let ChangeOrderStatusPayload { id, status } = decode(&command, payload)?;
            Ok(HttpResponse::Ok().json(orders::change_status(&service, id, status).await?))
        }
        _ => Err(AppError::UnknownCommand(command)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_is_an_empty_object() {
        assert_eq!(parse_payload(b"").unwrap(), serde_json::json!({}));
        assert_eq!(parse_payload(b" \n").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        assert!(matches!(
            parse_payload(b"{ not json"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn list_payload_uses_defaults() {
        let params: ListOrdersParams =
            decode(FIND_ALL_ORDERS, serde_json::json!({ "status": "PAID" })).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.status, Some(OrderStatus::Paid));
    }

    #[test]
    fn unknown_status_is_a_bad_request() {
        let result: Result<ChangeOrderStatusPayload, _> = decode(
            CHANGE_ORDER_STATUS,
            serde_json::json!({ "id": Uuid::nil(), "status": "SHIPPED" }),
        );
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
