// src/lib.rs
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use crate::services::{ChatModel, ModelService, UploadStore};
use std::sync::Arc;

/// Shared state for the vision classification service. The classifier is
/// `None` when the model failed to load at startup; every prediction then
/// answers 500 until the process is restarted with a valid model file.
#[derive(Clone)]
pub struct VisionState {
    pub classifier: Option<Arc<dyn ModelService>>,
    pub uploads: Arc<UploadStore>,
    pub public_base_url: String,
}

/// Shared state for the chatbot service.
#[derive(Clone)]
pub struct ChatState {
    pub model: Arc<dyn ChatModel>,
}
