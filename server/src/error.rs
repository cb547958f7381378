use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{mail::MailError, routes::ApiResponse, validate::ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Something went wrong while sending email!")]
    Send(#[from] MailError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MalformedPayload | AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::rejected(self.to_string()),
            ),
            AppError::Send(ref reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiResponse::failed(self.to_string(), reason.to_string()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
