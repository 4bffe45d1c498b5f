use anyhow::{Context, Result};
use db_pool::env_utils::{env_non_empty, parse_env_with_default};
use db_pool::DbConfig;

pub const SERVICE_NAME: &str = "video-service";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub grpc: GrpcConfig,
    pub database: DbConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Host to bind both servers to
    pub host: String,
    /// HTTP port for liveness/readiness probes
    pub http_port: u16,
}

#[derive(Debug, Clone)]
pub struct GrpcConfig {
    pub port: u16,
    /// mTLS server certificate path
    pub server_cert_path: Option<String>,
    /// mTLS server key path
    pub server_key_path: Option<String>,
    /// mTLS CA certificate path
    pub ca_cert_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    pub check_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_with_default("HTTP_PORT", 8080),
        };

        let grpc = GrpcConfig {
            port: parse_env_with_default("GRPC_PORT", 50051),
            server_cert_path: env_non_empty("GRPC_SERVER_CERT_PATH"),
            server_key_path: env_non_empty("GRPC_SERVER_KEY_PATH"),
            ca_cert_path: env_non_empty("GRPC_CA_CERT_PATH"),
        };

        let database = DbConfig::from_env(SERVICE_NAME)
            .map_err(anyhow::Error::msg)
            .context("Failed to load MongoDB configuration")?;

        let health = HealthConfig {
            check_interval_secs: parse_env_with_default("HEALTH_CHECK_INTERVAL_SECS", 10),
        };

        Ok(Config {
            app,
            grpc,
            database,
            health,
        })
    }
}
