//! Errors surfaced by the prediction endpoints.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

pub type PredictResult<T> = Result<T, PredictError>;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),

    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Field '{field}' must be a number, got {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Budget values must be positive")]
    NegativeBudget,

    /// The service started without a usable model.
    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// True for faults on our side rather than in the caller's input.
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::ModelNotLoaded | Self::Inference(_))
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        if self.is_server_fault() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}
