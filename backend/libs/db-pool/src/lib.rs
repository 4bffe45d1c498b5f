//! MongoDB client management
//!
//! Provides unified document-store client creation and configuration for all services

pub mod env_utils;

use env_utils::parse_env_with_default;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};

/// MongoDB client configuration
#[derive(Clone)]
pub struct DbConfig {
    /// Service name, reported to the server as the driver app name
    pub service_name: String,
    /// MongoDB connection URL
    pub mongo_url: String,
    /// Database holding the service's collections
    pub database_name: String,
    /// Maximum number of pooled connections per server
    pub max_pool_size: u32,
    /// Minimum number of pooled connections per server
    pub min_pool_size: u32,
    /// Connection creation timeout
    pub connect_timeout_secs: u64,
    /// How long to wait for a suitable server before failing an operation
    pub server_selection_timeout_secs: u64,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("service_name", &self.service_name)
            .field("mongo_url", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .field("max_pool_size", &self.max_pool_size)
            .field("min_pool_size", &self.min_pool_size)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            service_name: String::from("unknown"),
            mongo_url: String::new(),
            database_name: String::from("unknown"),
            max_pool_size: 20,
            min_pool_size: 2,
            connect_timeout_secs: 5,
            server_selection_timeout_secs: 10,
        }
    }
}

impl DbConfig {
    /// Create a new DbConfig from environment variables
    ///
    /// `MONGO_URL` is required. The database name defaults to the service name
    /// with dashes replaced, so `comment-service` uses `comment_service`.
    pub fn from_env(service_name: &str) -> Result<Self, String> {
        let mongo_url = std::env::var("MONGO_URL")
            .map_err(|_| "MONGO_URL environment variable not set".to_string())?;

        let defaults = Self::default();

        Ok(Self {
            service_name: service_name.to_string(),
            mongo_url,
            database_name: std::env::var("MONGO_DATABASE")
                .unwrap_or_else(|_| service_name.replace('-', "_")),
            max_pool_size: parse_env_with_default("MONGO_MAX_POOL_SIZE", defaults.max_pool_size),
            min_pool_size: parse_env_with_default("MONGO_MIN_POOL_SIZE", defaults.min_pool_size),
            connect_timeout_secs: parse_env_with_default(
                "MONGO_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            ),
            server_selection_timeout_secs: parse_env_with_default(
                "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            ),
        })
    }

    /// Log client configuration details
    pub fn log_config(&self) {
        info!(
            "MongoDB Client Configuration: \
             database={}, max_pool_size={}, min_pool_size={}, \
             connect_timeout={}s, server_selection_timeout={}s",
            self.database_name,
            self.max_pool_size,
            self.min_pool_size,
            self.connect_timeout_secs,
            self.server_selection_timeout_secs
        );
    }

    async fn client_options(&self) -> Result<ClientOptions, mongodb::error::Error> {
        let mut options = ClientOptions::parse(&self.mongo_url).await?;
        options.app_name = Some(self.service_name.clone());
        options.max_pool_size = Some(self.max_pool_size);
        options.min_pool_size = Some(self.min_pool_size.min(self.max_pool_size));
        options.connect_timeout = Some(Duration::from_secs(self.connect_timeout_secs));
        options.server_selection_timeout =
            Some(Duration::from_secs(self.server_selection_timeout_secs));
        Ok(options)
    }
}

/// Create a MongoDB client and return a handle to the configured database
///
/// The connection is verified with a `ping` bounded by the connect timeout, so a
/// misconfigured URL fails at startup instead of on the first request.
pub async fn create_client(config: DbConfig) -> Result<Database, mongodb::error::Error> {
    debug!(
        "Creating MongoDB client: service={}, database={}, max_pool={}, min_pool={}",
        config.service_name, config.database_name, config.max_pool_size, config.min_pool_size
    );

    let client = Client::with_options(config.client_options().await?)?;
    let database = client.database(&config.database_name);

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        ping(&database),
    )
    .await
    {
        Ok(Ok(())) => {
            info!(
                service = %config.service_name,
                database = %config.database_name,
                "MongoDB client created and verified successfully"
            );
            Ok(database)
        }
        Ok(Err(e)) => {
            error!(
                service = %config.service_name,
                error = %e,
                "MongoDB connection verification failed"
            );
            Err(e)
        }
        Err(_) => {
            error!(
                service = %config.service_name,
                timeout_secs = config.connect_timeout_secs,
                "MongoDB connection verification timeout"
            );
            Err(mongodb::error::Error::from(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "MongoDB verification timeout",
            )))
        }
    }
}

/// Round-trip a `ping` command against the database
pub async fn ping(database: &Database) -> Result<(), mongodb::error::Error> {
    database.run_command(doc! { "ping": 1 }, None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_env() {
        for key in [
            "MONGO_URL",
            "MONGO_DATABASE",
            "MONGO_MAX_POOL_SIZE",
            "MONGO_MIN_POOL_SIZE",
            "MONGO_CONNECT_TIMEOUT_SECS",
            "MONGO_SERVER_SELECTION_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.max_pool_size, 20);
        assert_eq!(config.min_pool_size, 2);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.server_selection_timeout_secs, 10);
    }

    #[test]
    #[serial_test::serial]
    fn test_config_requires_mongo_url() {
        clear_env();

        let result = DbConfig::from_env("video-service");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("MONGO_URL"));
    }

    #[test]
    #[serial_test::serial]
    fn test_config_from_env_without_override() {
        clear_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");

        let config = DbConfig::from_env("comment-service").unwrap();

        assert_eq!(config.service_name, "comment-service");
        assert_eq!(config.database_name, "comment_service");
        assert_eq!(config.max_pool_size, 20);
        assert_eq!(config.min_pool_size, 2);

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_config_env_override() {
        clear_env();
        std::env::set_var("MONGO_URL", "mongodb://localhost:27017");
        std::env::set_var("MONGO_DATABASE", "lab");
        std::env::set_var("MONGO_MAX_POOL_SIZE", "50");
        std::env::set_var("MONGO_CONNECT_TIMEOUT_SECS", "not-a-number");

        let config = DbConfig::from_env("video-service").unwrap();

        assert_eq!(config.database_name, "lab");
        assert_eq!(config.max_pool_size, 50);
        // Unparseable values fall back to defaults
        assert_eq!(config.connect_timeout_secs, 5);

        clear_env();
    }

    #[test]
    fn test_debug_redacts_url() {
        let config = DbConfig {
            mongo_url: "mongodb://user:secret@db:27017".to_string(),
            ..DbConfig::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_client_options_clamps_min_pool() {
        let config = DbConfig {
            mongo_url: "mongodb://localhost:27017".to_string(),
            max_pool_size: 4,
            min_pool_size: 10,
            ..DbConfig::default()
        };

        let options = config.client_options().await.unwrap();
        assert_eq!(options.max_pool_size, Some(4));
        assert_eq!(options.min_pool_size, Some(4));
        assert_eq!(options.app_name.as_deref(), Some("unknown"));
    }
}
