use actix_web::error::BlockingError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::models::ProductId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("blocking task was cancelled")]
    Blocking(#[from] BlockingError),

    #[error("invalid user id header: {0:?}")]
    InvalidUser(String),

    #[error("an account is required")]
    Unauthenticated,

    #[error("product {0} does not exist")]
    ProductNotFound(ProductId),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Store(StoreError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidUser(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        }
        HttpResponse::build(status).json(json!({ "error_message": self.public_message() }))
    }
}

impl AppError {
    /// What the client gets to see. Store and pool details stay in the logs.
    pub(crate) fn public_message(&self) -> String {
        match self {
            AppError::Store(StoreError::Unavailable) => {
                "Service momentanément indisponible".to_string()
            }
            AppError::Store(_) | AppError::Blocking(_) => "Erreur interne du serveur".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_server_errors() {
        assert_eq!(
            AppError::from(StoreError::Unavailable).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::from(StoreError::Database(diesel::result::Error::NotFound)).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_error_details_are_not_exposed() {
        let err = AppError::from(StoreError::Database(diesel::result::Error::NotFound));
        assert_eq!(err.public_message(), "Erreur interne du serveur");
        assert!(!err.public_message().contains("Record not found"));
        assert_eq!(
            AppError::from(StoreError::Unavailable).public_message(),
            "Service momentanément indisponible"
        );
        assert_eq!(
            AppError::ProductNotFound(3).public_message(),
            "product 3 does not exist"
        );
    }

    #[test]
    fn client_errors() {
        assert_eq!(
            AppError::InvalidUser("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::ProductNotFound(3).status_code(), StatusCode::NOT_FOUND);
    }
}
