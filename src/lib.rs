pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use application::OrderService;
pub use config::AppConfig;
pub use db::{create_pool, run_migrations, DbPool};
pub use errors::{AppError, StartupError};

use infrastructure::{DieselOrderRepository, HttpProductLookup};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::change_order_status,
        handlers::commands::dispatch,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::CreateOrderItemRequest,
        handlers::orders::ChangeOrderStatusRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderItemResponse,
        handlers::orders::ListOrdersResponse,
        handlers::orders::PageMetaResponse,
    )),
    tags(
        (name = "orders", description = "Order management"),
        (name = "commands", description = "Order operations addressed by command name"),
    )
)]
pub struct ApiDoc;

/// Register the order routes. The caller provides `web::Data<OrderService>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/orders")
            .route("", web::post().to(handlers::orders::create_order))
            .route("", web::get().to(handlers::orders::list_orders))
            .route("/{id}", web::get().to(handlers::orders::get_order))
            .route("/{id}", web::patch().to(handlers::orders::change_order_status)),
    )
    .route("/rpc/{command}", web::post().to(handlers::commands::dispatch));
}

/// Wire the Diesel repository and the HTTP product client into an
/// [`OrderService`].
pub fn build_service(pool: DbPool, config: &AppConfig) -> Result<OrderService, StartupError> {
    let products = HttpProductLookup::new(&config.products.base_url, config.products.timeout)?;
    Ok(OrderService::new(
        Arc::new(DieselOrderRepository::new(pool)),
        Arc::new(products),
    ))
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: OrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
