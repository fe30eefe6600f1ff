use std::env;

use tower_http::cors::CorsLayer;

use server::{AppState, router};
use storage::repository::Storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let data_dir = env::var("LESSON_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let bind_addr = env::var("LESSON_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let storage = Storage::fs(&data_dir);
    let app = router(AppState::new(storage)).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("lesson server listening on {bind_addr}, data under {data_dir}");
    axum::serve(listener, app).await?;
    Ok(())
}
