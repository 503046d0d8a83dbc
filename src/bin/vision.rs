// src/bin/vision.rs
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use log::{error, info};
use oralcure::VisionState;
use oralcure::handlers::{predict, vision_home};
use oralcure::services::{ModelService, OrtClassifier, UploadStore};
use std::path::PathBuf;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let model_path = PathBuf::from(
        std::env::var("MODEL_PATH").unwrap_or_else(|_| "model/model.onnx".to_string()),
    );
    let input_size = std::env::var("MODEL_INPUT_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(224);
    let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
    let public_base_url = std::env::var("PUBLIC_BASE_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000);

    // A failed load leaves the service up; every prediction answers 500.
    let classifier: Option<Arc<dyn ModelService>> =
        match OrtClassifier::load(&model_path, input_size) {
            Ok(classifier) => {
                info!(
                    "Oral cancer model loaded from {} ({input_size}x{input_size} input)",
                    model_path.display()
                );
                Some(Arc::new(classifier))
            }
            Err(e) => {
                error!("Error loading model: {e}");
                None
            }
        };

    let uploads = Arc::new(UploadStore::new(&upload_dir)?);

    let state = VisionState {
        classifier,
        uploads,
        public_base_url,
    };

    info!("Starting vision API on 127.0.0.1:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(vision_home))
            .route("/predict", web::post().to(predict))
            .service(Files::new("/uploads", state.uploads.dir().to_path_buf()))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
