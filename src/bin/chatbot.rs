// src/bin/chatbot.rs
use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use log::info;
use oralcure::ChatState;
use oralcure::handlers::{chat, chat_home};
use oralcure::services::{GeminiService, gemini};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| gemini::DEFAULT_MODEL.to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5001);

    let gemini = GeminiService::new(api_key, model)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let state = ChatState {
        model: Arc::new(gemini),
    };

    info!("Starting chatbot API on 127.0.0.1:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .route("/", web::get().to(chat_home))
            .route("/predict", web::post().to(chat))
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
