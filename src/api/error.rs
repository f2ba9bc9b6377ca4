use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::application::AppError;
use crate::domain::MoneyError;

use super::types::ErrorResponse;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientFunds { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API clients. Store failures stay generic; their
    /// details only go to the log.
    fn client_message(&self) -> String {
        match self {
            AppError::Store(_) => "Internal database error".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AppError::Store(err) = &self {
            error!("Store failure: {:#}", err);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (
            status,
            Json(ErrorResponse {
                detail: self.client_message(),
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MoneyError> for AppError {
    fn from(err: MoneyError) -> Self {
        AppError::Validation(format!("Invalid amount: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::AccountNotFound(9).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InsufficientFunds {
                account_id: 1,
                balance: 100,
                requested: 500,
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Store(anyhow::anyhow!("connection refused")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_are_not_leaked() {
        let err = AppError::Store(anyhow::anyhow!("password authentication failed"));
        assert_eq!(err.client_message(), "Internal database error");
    }

    #[test]
    fn test_insufficient_funds_message() {
        let err = AppError::InsufficientFunds {
            account_id: 1,
            balance: 130000,
            requested: 500000,
        };
        assert_eq!(
            err.client_message(),
            "Insufficient funds in account 1: balance 1300.00, requested 5000.00"
        );
    }
}
