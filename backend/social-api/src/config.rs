use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_env")]
    pub env: String,

    #[serde(default = "default_app_host")]
    pub host: String,

    #[serde(default = "default_app_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_db_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Private key for signing tokens (PEM format, base64-encoded for env var)
    pub private_key_pem: String,

    /// Public key for validating tokens (PEM format, base64-encoded for env var)
    pub public_key_pem: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_media_root")]
    pub root: String,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins (e.g., "https://example.com,https://app.example.com")
    /// Set to "*" to allow all origins (NOT recommended for production)
    pub allowed_origins: String,

    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

// Default value functions
fn default_app_env() -> String {
    "development".to_string()
}

fn default_app_host() -> String {
    "0.0.0.0".to_string()
}

fn default_app_port() -> u16 {
    8080
}

fn default_db_max_connections() -> u32 {
    20
}

fn default_media_root() -> String {
    "./media".to_string()
}

fn default_max_image_bytes() -> usize {
    10 * 1024 * 1024 // 10 MB
}

fn default_cors_max_age() -> u64 {
    3600 // 1 hour
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: env::var("APP_ENV").unwrap_or_else(|_| default_app_env()),
            host: env::var("APP_HOST").unwrap_or_else(|_| default_app_host()),
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| default_app_port().to_string())
                .parse()
                .unwrap_or(default_app_port()),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| default_db_max_connections().to_string())
                .parse()
                .unwrap_or(default_db_max_connections()),
        };

        let jwt = JwtConfig {
            private_key_pem: decode_pem_env("JWT_PRIVATE_KEY_PEM")?,
            public_key_pem: decode_pem_env("JWT_PUBLIC_KEY_PEM")?,
        };

        let media = MediaConfig {
            root: env::var("MEDIA_ROOT").unwrap_or_else(|_| default_media_root()),
            max_image_bytes: env::var("MEDIA_MAX_IMAGE_BYTES")
                .unwrap_or_else(|_| default_max_image_bytes().to_string())
                .parse()
                .unwrap_or(default_max_image_bytes()),
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            max_age: env::var("CORS_MAX_AGE")
                .unwrap_or_else(|_| default_cors_max_age().to_string())
                .parse()
                .unwrap_or(default_cors_max_age()),
        };

        Ok(Config {
            app,
            database,
            jwt,
            media,
            cors,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.env == "development"
    }
}

/// Read a base64-encoded PEM from the environment and decode it
fn decode_pem_env(var: &str) -> anyhow::Result<String> {
    let base64_encoded = env::var(var)
        .map_err(|_| anyhow::anyhow!("{} must be set (base64-encoded PEM content)", var))?;
    let decoded = general_purpose::STANDARD
        .decode(&base64_encoded)
        .map_err(|e| anyhow::anyhow!("Failed to decode {} from base64: {}", var, e))?;
    String::from_utf8(decoded).map_err(|e| anyhow::anyhow!("{} is not valid UTF-8: {}", var, e))
}
