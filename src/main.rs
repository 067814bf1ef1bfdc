// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, collaborator clients, start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{MediaClient, NotificationEmitter, PlatformClient};
use std::io;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        // We continue but log error, or we could panic
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        // Use configured log level or default
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting lodgia-reviews microservice...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Build collaborator clients shared across workers
    let http_timeout = Duration::from_secs(config.http_client_timeout);
    let platform_client = PlatformClient::new(
        config.platform_api_url.clone(),
        config.platform_api_token.clone(),
        http_timeout,
    );
    let media_client = MediaClient::new(
        config.media_api_url.clone(),
        config.media_api_token.clone(),
        http_timeout,
    );
    let notifier = NotificationEmitter::new(
        config.notification_url.clone(),
        config.notification_timeout_ms,
    );
    log::info!(
        "Collaborator clients ready (platform: {}, media: {}, notifications: {})",
        config.platform_api_url,
        config.media_api_url,
        config.notification_url
    );

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            // Application state (database pool and collaborator clients)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(platform_client.clone()))
            .app_data(web::Data::new(media_client.clone()))
            .app_data(web::Data::new(notifier.clone()))
            // Malformed JSON bodies (wrong types included) surface in the
            // same error envelope as application failures
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                errors::ReviewsError::Validation(err.to_string()).into()
            }))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::reviews_config)
            .configure(handlers::realtor_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
