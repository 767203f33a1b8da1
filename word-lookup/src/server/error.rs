use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::api::{ErrorBody, ValidationErrors};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] JsonRejection),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, errors) = match self {
            AppError::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, errors),
            AppError::MalformedPayload(rejection) => (rejection.status(), ValidationErrors::default()),
            AppError::Storage(error) => {
                error!(%error, "word store query failed");
                (StatusCode::INTERNAL_SERVER_ERROR, ValidationErrors::default())
            }
        };

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}
