use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use festa_core::{BookingError, HotelError, PaymentError, TicketError};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    PaymentRequired(String),
    Forbidden(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::PaymentRequired(msg) => (StatusCode::PAYMENT_REQUIRED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(err) => {
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

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound => ApiError::NotFound(err.to_string()),
            BookingError::Forbidden(msg) => ApiError::Forbidden(msg.to_string()),
            BookingError::Repository(e) => ApiError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<HotelError> for ApiError {
    fn from(err: HotelError) -> Self {
        match err {
            HotelError::NotFound => ApiError::NotFound(err.to_string()),
            HotelError::PaymentRequired => ApiError::PaymentRequired(err.to_string()),
            HotelError::Repository(e) => ApiError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::TicketNotSent => ApiError::BadRequest(err.to_string()),
            PaymentError::NotFound => ApiError::NotFound(err.to_string()),
            PaymentError::Unauthorized => ApiError::Unauthorized(err.to_string()),
            PaymentError::Repository(e) => ApiError::Internal(anyhow::anyhow!(e)),
        }
    }
}

impl From<TicketError> for ApiError {
    fn from(err: TicketError) -> Self {
        match err {
            TicketError::NotFound => ApiError::NotFound(err.to_string()),
            TicketError::Repository(e) => ApiError::Internal(anyhow::anyhow!(e)),
        }
    }
}
