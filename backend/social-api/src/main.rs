use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_api::config::Config;
use social_api::db::{create_pool, run_migrations};
use social_api::middleware::ActivityTrackerMiddleware;
use social_api::routes;
use social_api::security;
use social_api::services::MediaStorage;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Support container healthchecks via CLI subcommand: `healthcheck`
    // It checks the HTTP endpoint /health on localhost and exits accordingly.
    {
        let mut args = std::env::args();
        let _bin = args.next();
        if let Some(cmd) = args.next() {
            if cmd == "healthcheck" {
                let port = std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into());
                let url = format!("http://127.0.0.1:{}/health", port);
                match reqwest::Client::new().get(&url).send().await {
                    Ok(resp) if resp.status().is_success() => return Ok(()),
                    Ok(resp) => {
                        eprintln!("healthcheck HTTP status: {}", resp.status());
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"));
                    }
                    Err(e) => {
                        eprintln!("healthcheck HTTP error: {}", e);
                        return Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"));
                    }
                }
            }
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    tracing::info!("Starting social-api v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Keys may come from files (JWT_PRIVATE_KEY_FILE / JWT_PUBLIC_KEY_FILE)
    // instead of the base64-encoded environment variables.
    let private_key_pem = if let Ok(path) = std::env::var("JWT_PRIVATE_KEY_FILE") {
        std::fs::read_to_string(path).expect("Failed to read JWT private key file")
    } else {
        config.jwt.private_key_pem.clone()
    };
    let public_key_pem = if let Ok(path) = std::env::var("JWT_PUBLIC_KEY_FILE") {
        std::fs::read_to_string(path).expect("Failed to read JWT public key file")
    } else {
        config.jwt.public_key_pem.clone()
    };

    security::jwt::initialize_keys(&private_key_pem, &public_key_pem)
        .expect("Failed to initialize JWT keys from environment variables or files");
    tracing::info!("JWT keys initialized");

    // Create database connection pool
    let db_pool = create_pool(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool created with {} max connections",
        config.database.max_connections
    );

    // Run migrations in non-production unless explicitly skipped
    let run_migrations_env = std::env::var("RUN_MIGRATIONS").unwrap_or_else(|_| "true".into());
    if !config.is_production() && run_migrations_env != "false" {
        tracing::info!("Running database migrations...");
        match run_migrations(&db_pool).await {
            Ok(_) => tracing::info!("Database migrations completed"),
            Err(e) => {
                tracing::warn!("Skipping migrations due to error: {:#}", e);
            }
        }
    } else {
        tracing::info!(
            "Skipping database migrations (env: {}, RUN_MIGRATIONS: {})",
            config.app.env,
            run_migrations_env
        );
    }

    let media_storage = web::Data::new(MediaStorage::new(&config.media));

    // Clone config for server closure
    let server_config = config.clone();
    let bind_address = format!("{}:{}", config.app.host, config.app.port);

    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS configuration from allowed_origins
        let mut cors = Cors::default();
        for origin in server_config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors
            .allow_any_method()
            .allow_any_header()
            .max_age(server_config.cors.max_age as usize);

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(media_storage.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .wrap(ActivityTrackerMiddleware)
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
