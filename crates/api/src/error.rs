//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::SaleError;

use crate::service::ServiceError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Sale operation error.
    Service(ServiceError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Service(err) => service_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn service_error_to_response(err: ServiceError) -> (StatusCode, String) {
    match &err {
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        ServiceError::IdMismatch { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        ServiceError::Sale(sale_err) => match sale_err {
            SaleError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            SaleError::InvalidSale(_)
            | SaleError::AlreadyCancelled { .. }
            | SaleError::ItemAlreadyCancelled { .. }
            | SaleError::DuplicateItem { .. }
            | SaleError::ForeignItem { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        },
        ServiceError::Store(store_err) => {
            tracing::error!(error = %store_err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

#[cfg(test)]
mod tests {
    use common::{SaleId, SaleItemId};
    use domain::RuleViolation;
    use sale_store::StoreError;

    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(status_of(ServiceError::NotFound(SaleId::new())), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ServiceError::Sale(SaleError::ItemNotFound {
                sale_id: SaleId::new(),
                item_id: SaleItemId::new(),
            })),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_rejections_map_to_400() {
        assert_eq!(
            status_of(ServiceError::IdMismatch {
                path: SaleId::new(),
                body: SaleId::new(),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Sale(SaleError::InvalidSale(RuleViolation::NoItems))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Sale(SaleError::AlreadyCancelled {
                sale_id: SaleId::new()
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Sale(SaleError::ForeignItem {
                sale_id: SaleId::new(),
                item_id: SaleItemId::new(),
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Sale(SaleError::DuplicateItem {
                item_id: SaleItemId::new()
            })),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_store_failure_maps_to_500() {
        assert_eq!(
            status_of(ServiceError::Store(StoreError::Corrupt("bad row".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
