// src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

use bigbasket::config::AppConfig;
use bigbasket::repository::{demo_catalog, MemoryRepository, PgRepository, Repository};
use bigbasket::state::AppState;
use bigbasket::web::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO) // Default level
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  tracing::info!("Starting BigBasket application server...");

  // Load application configuration
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  // Choose the storage backend. Handlers only see the Repository trait
  // object; without DATABASE_URL the server runs on the in-memory store.
  let repository: Arc<dyn Repository> = match &app_config.database_url {
    Some(database_url) => {
      let db_pool = match PgPool::connect(database_url).await {
        Ok(pool) => {
          tracing::info!("Successfully connected to the database.");
          pool
        }
        Err(e) => {
          tracing::error!(error = %e, "Failed to connect to the database.");
          panic!("Database connection error: {}", e);
        }
      };
      let repository = PgRepository::new(db_pool);

      // Seed database if configured
      if app_config.seed_db {
        if let Err(e) = repository.seed_demo_data().await {
          tracing::error!(error = %e, "Failed to seed database.");
        }
      }
      Arc::new(repository)
    }
    None => {
      tracing::warn!("DATABASE_URL is not set; serving from the in-memory store.");
      Arc::new(MemoryRepository::with_products(demo_catalog()))
    }
  };
  let app_state = AppState {
    repository,
    config: app_config.clone(),
  };

  // Configure and Start Actix Web Server
  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
