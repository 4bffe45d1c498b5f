//! Health check implementations for external dependencies

use crate::error::{HealthCheckError, Result};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::Database;
use std::time::Duration;

/// Trait for health check implementations
///
/// Implement this trait to create custom health checks for your dependencies.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Perform the health check
    ///
    /// Returns `Ok(())` if the dependency is healthy, or an error describing the problem.
    async fn check(&self) -> Result<()>;
}

/// MongoDB health check
///
/// Verifies connectivity by running a `ping` command against the service database.
pub struct MongoHealthCheck {
    database: Database,
    timeout: Duration,
}

impl MongoHealthCheck {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            timeout: Duration::from_secs(5),
        }
    }
}

#[async_trait]
impl HealthCheck for MongoHealthCheck {
    fn name(&self) -> &str {
        "mongodb"
    }

    async fn check(&self) -> Result<()> {
        tokio::time::timeout(
            self.timeout,
            self.database.run_command(doc! { "ping": 1 }, None),
        )
        .await
        .map_err(|_| HealthCheckError::Timeout(self.timeout.as_secs()))?
        .map_err(|e| HealthCheckError::database(format!("Failed to ping MongoDB: {}", e)))?;

        Ok(())
    }
}
