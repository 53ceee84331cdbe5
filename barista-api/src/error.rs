use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use barista_catalog::{CatalogError, PricingError};
use barista_export::ExportError;
use barista_menu::MenuError;
use barista_order::OrderError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    PriceUnavailableError(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::PriceUnavailableError(msg) => {
                tracing::warn!("Price unavailable: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::InternalServerError(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(_) => AppError::ValidationError(err.to_string()),
            OrderError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            OrderError::InvalidTransition { .. } => AppError::ConflictError(err.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownCategory(_) | CatalogError::UnknownBeverage(_) => {
                AppError::NotFoundError(err.to_string())
            }
            CatalogError::EmptyRegistry => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        AppError::PriceUnavailableError(err.to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::InternalServerError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}
