pub mod routes;
pub mod uploads;

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout_seconds: u64,
    pub db_idle_timeout_seconds: u64,
    pub db_max_lifetime_seconds: u64,
    pub media_upload_base: String,
    pub media_delivery_base: String,
    pub media_cloud_name: String,
    pub media_api_key: String,
    pub media_api_secret: String,
    pub media_folder: String,
    pub auth_verify_url: String,
    pub auth_secret_key: String,
    pub image_max_bytes: u64,
    pub video_max_bytes: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let http_addr = env_or("HTTP_ADDR", "0.0.0.0:8080");
        let _parsed_http_addr = SocketAddr::from_str(&http_addr)
            .map_err(|err| anyhow!("invalid HTTP_ADDR: {}", err))?;

        Ok(Self {
            http_addr,
            database_url: env_or_err("DATABASE_URL")?,
            db_max_connections: env_or_parse("DB_MAX_CONNECTIONS", "25")?,
            db_connect_timeout_seconds: env_or_parse("DB_CONNECT_TIMEOUT_SECONDS", "5")?,
            db_idle_timeout_seconds: env_or_parse("DB_IDLE_TIMEOUT_SECONDS", "300")?,
            db_max_lifetime_seconds: env_or_parse("DB_MAX_LIFETIME_SECONDS", "1800")?,
            media_upload_base: env_or("MEDIA_UPLOAD_BASE", "https://api.cloudinary.com/v1_1"),
            media_delivery_base: env_or("MEDIA_DELIVERY_BASE", "https://res.cloudinary.com"),
            media_cloud_name: env_or_err("MEDIA_CLOUD_NAME")?,
            media_api_key: env_or_err("MEDIA_API_KEY")?,
            media_api_secret: env_or_err("MEDIA_API_SECRET")?,
            media_folder: env_or("MEDIA_FOLDER", "reelcast"),
            auth_verify_url: env_or_err("AUTH_VERIFY_URL")?,
            auth_secret_key: env_or_err("AUTH_SECRET_KEY")?,
            image_max_bytes: env_or_parse("IMAGE_MAX_BYTES", "10485760")?,
            video_max_bytes: env_or_parse("VIDEO_MAX_BYTES", "104857600")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_err(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("missing required env var: {}", key))
}

fn env_or_parse<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    value
        .parse::<T>()
        .map_err(|err| anyhow!("invalid {}: {}", key, err))
}
