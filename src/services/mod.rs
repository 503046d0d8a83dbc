// src/services/mod.rs
pub mod classifier;
pub mod gemini;
pub mod upload_store;

pub use classifier::{CLASS_NAMES, ClassPrediction, ModelService, OrtClassifier};
pub use gemini::{ChatModel, GeminiService};
pub use upload_store::{UploadStore, sanitize_filename};
