use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Order with id: {0} not found")]
    NotFound(Uuid),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(id) => AppError::NotFound(id),
            DomainError::ValidationFailed(msg) => AppError::ValidationFailed(msg),
            DomainError::UpstreamUnavailable(msg) => AppError::UpstreamUnavailable(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl AppError {
    /// Message shown to the caller. Internal detail stays in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::NotFound(_) | AppError::UnknownCommand(_) | AppError::BadRequest(_) => {
                self.to_string()
            }
            AppError::ValidationFailed(_) => {
                "Validation or processing failed, check logs".to_string()
            }
            AppError::UpstreamUnavailable(_) => "Product service unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::UnknownCommand(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            AppError::ValidationFailed(_) => log::warn!("{}", self),
            AppError::UpstreamUnavailable(_) | AppError::Internal(_) => log::error!("{}", self),
            _ => log::debug!("{}", self),
        }
        HttpResponse::build(status).json(serde_json::json!({
            "status": status.as_u16(),
            "message": self.public_message(),
        }))
    }
}

/// Failures while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("product client error: {0}")]
    ProductClient(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
