use dotenvy::dotenv;
use orders_service::{build_server, build_service, create_pool, run_migrations};
use orders_service::{AppConfig, StartupError};

#[actix_web::main]
async fn main() -> Result<(), StartupError> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.db_pool_size)?;
    run_migrations(&pool)?;

    let service = build_service(pool, &config)?;

    log::info!(
        "Starting server at http://{}:{} (products at {})",
        config.host,
        config.port,
        config.products.base_url
    );

    build_server(service, &config.host, config.port)?.await?;
    Ok(())
}
