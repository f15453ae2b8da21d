mod error;
mod handlers;
mod payloads;
mod state;
mod ui;

use std::sync::Arc;

use form_agent::{AgentConfig, DocumentProcessor};
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::init();

    let config = match AgentConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            eprintln!("Check your .env file and ensure your API key is set.");
            std::process::exit(1);
        }
    };

    if !DocumentProcessor::is_ocr_available() {
        log::warn!("tesseract not found on PATH - image uploads will fail until it is installed");
    }

    let state = Arc::new(AppState::new(config.build_agent()));
    let app = handlers::router(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("Listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
