//! Builder pattern for easy health manager construction

use crate::checks::{HealthCheck, MongoHealthCheck};
use crate::manager::HealthManager;
use mongodb::Database;
use tonic_health::pb::health_server::{Health, HealthServer};

/// Builder for HealthManager with common dependency checks
///
/// # Example
///
/// ```rust,no_run
/// use grpc_health::HealthManagerBuilder;
///
/// # async fn example(database: mongodb::Database) {
/// let (health_manager, health_service) = HealthManagerBuilder::new()
///     .with_service_name("video.v1.VideoService")
///     .with_mongo(database)
///     .build()
///     .await;
/// # }
/// ```
#[derive(Default)]
pub struct HealthManagerBuilder {
    service_names: Vec<String>,
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthManagerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report status for a fully qualified gRPC service name in addition to
    /// the overall ("") status
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_names.push(name.into());
        self
    }

    /// Add MongoDB health check
    pub fn with_mongo(self, database: Database) -> Self {
        self.with_check(Box::new(MongoHealthCheck::new(database)))
    }

    /// Add any custom check
    pub fn with_check(mut self, check: Box<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Build the HealthManager with all configured checks
    ///
    /// Returns a tuple of (HealthManager, HealthServer) where HealthServer
    /// should be added to your gRPC server.
    pub async fn build(self) -> (HealthManager, HealthServer<impl Health>) {
        let (mut manager, service) = HealthManager::new();

        for name in self.service_names {
            manager.track_service(name);
        }

        for check in self.checks {
            manager.register_check(check).await;
        }

        (manager, service)
    }
}
