// src/handlers.rs
use crate::errors::ApiError;
use crate::models::{ChatReply, ChatRequest, PredictionResponse};
use crate::services::sanitize_filename;
use crate::{ChatState, VisionState};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::TryStreamExt;
use log::info;

pub async fn vision_home() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Oral Cancer Detection API is running"
    }))
}

pub async fn predict(
    mut payload: Multipart,
    data: web::Data<VisionState>,
) -> Result<HttpResponse, ApiError> {
    // Checked before input validation: with no model every request is a 500.
    let classifier = data.classifier.clone().ok_or(ApiError::ModelNotLoaded)?;

    let mut file_field = None;
    while let Some(field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == "file" {
            file_field = Some(field);
            break;
        }
    }
    let mut field = file_field.ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;

    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or_default()
        .to_string();
    let filename = sanitize_filename(&filename)
        .ok_or_else(|| ApiError::Validation("No file selected".to_string()))?;

    let mut image_data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        image_data.extend_from_slice(&chunk);
    }

    data.uploads.save(&filename, &image_data).await?;

    let prediction = classifier.predict(&image_data)?;

    info!(
        "Prediction: {} ({:.2}%)",
        prediction.label, prediction.confidence
    );

    Ok(HttpResponse::Ok().json(PredictionResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
        image_url: format!("{}/uploads/{}", data.public_base_url, filename),
    }))
}

pub async fn chat_home() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body("Medical chatbot running")
}

pub async fn chat(
    body: web::Json<ChatRequest>,
    data: web::Data<ChatState>,
) -> Result<HttpResponse, ApiError> {
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    let reply = data.model.generate_reply(message).await?;

    Ok(HttpResponse::Ok().json(ChatReply { reply }))
}
