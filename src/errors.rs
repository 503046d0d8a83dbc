// src/errors.rs
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use thiserror::Error;

/// Every failure mode of both services, one kind per operation. The
/// `ResponseError` impl below is the single place where kinds turn into
/// status codes and wire payloads; detail for 500s never leaves the server.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Please enter a message")]
    EmptyMessage,

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Prediction index {0} outside the class label set")]
    InvalidPredictionIndex(usize),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Upload storage error: {0}")]
    Storage(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::EmptyMessage => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(msg) => {
                HttpResponse::BadRequest().json(serde_json::json!({ "error": msg }))
            }
            ApiError::EmptyMessage => HttpResponse::BadRequest().json(serde_json::json!({
                "reply": "Please enter a message"
            })),
            ApiError::ModelNotLoaded => HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Model not loaded" })),
            ApiError::InvalidPredictionIndex(_) => {
                error!("{self}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Invalid prediction index"
                }))
            }
            ApiError::ImageDecode(_) | ApiError::Inference(_) | ApiError::Storage(_) => {
                error!("{self}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Failed to process image"
                }))
            }
            ApiError::ExternalService(_) => {
                error!("{self}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "reply": "AI chatbot error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(
            ApiError::Validation("No file uploaded".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::EmptyMessage.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn processing_errors_map_to_500() {
        for err in [
            ApiError::ModelNotLoaded,
            ApiError::InvalidPredictionIndex(5),
            ApiError::ImageDecode("truncated".into()),
            ApiError::Inference("bad shape".into()),
            ApiError::Storage("disk full".into()),
            ApiError::ExternalService("quota".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[actix_web::test]
    async fn processing_detail_never_reaches_the_payload() {
        let resp = ApiError::Inference("tensor shape mismatch in layer 3".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Failed to process image" }));
    }

    #[actix_web::test]
    async fn external_failures_use_the_chat_payload_shape() {
        let resp = ApiError::ExternalService("connection refused".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "reply": "AI chatbot error" }));
    }
}
