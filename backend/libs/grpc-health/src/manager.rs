//! Health check manager and background monitoring

use crate::checks::HealthCheck;
use crate::error::Result;
use crate::health::HealthStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tonic_health::pb::health_server::{Health, HealthServer};
use tonic_health::server::HealthReporter;

/// Health check manager
///
/// Coordinates health checks for the service's dependencies and reports status
/// to the gRPC health service. The latest status is also published on a watch
/// channel so HTTP probes can read it without touching the dependencies.
pub struct HealthManager {
    reporter: HealthReporter,
    checks: Arc<RwLock<Vec<Box<dyn HealthCheck>>>>,
    services: Vec<String>,
    status_tx: watch::Sender<HealthStatus>,
}

impl HealthManager {
    /// Create a new health manager
    ///
    /// Returns a tuple of (manager, health_server) where health_server
    /// should be added to your gRPC server.
    pub fn new() -> (Self, HealthServer<impl Health>) {
        let (reporter, service) = tonic_health::server::health_reporter();
        let (status_tx, _) = watch::channel(HealthStatus::Unknown);

        let manager = Self {
            reporter,
            checks: Arc::new(RwLock::new(Vec::new())),
            services: Vec::new(),
            status_tx,
        };

        (manager, service)
    }

    /// Report status for a named gRPC service as well as the overall status
    pub fn track_service(&mut self, name: impl Into<String>) {
        self.services.push(name.into());
    }

    #[cfg(test)]
    pub(crate) fn tracked_services(&self) -> &[String] {
        &self.services
    }

    /// Register a health check
    pub async fn register_check(&self, check: Box<dyn HealthCheck>) {
        self.checks.write().await.push(check);
    }

    /// Subscribe to status changes
    pub fn subscribe(&self) -> watch::Receiver<HealthStatus> {
        self.status_tx.subscribe()
    }

    /// Execute all registered health checks
    ///
    /// Returns `Ok(())` if all checks pass, or the first error encountered.
    pub async fn execute_checks(&self) -> Result<()> {
        let checks = self.checks.read().await;

        for check in checks.iter() {
            if let Err(e) = check.check().await {
                tracing::warn!(check = check.name(), error = %e, "Dependency check failed");
                return Err(e);
            }
        }

        Ok(())
    }

    /// Run health checks and update service status
    pub async fn check_and_update(&mut self) -> HealthStatus {
        let status = match self.execute_checks().await {
            Ok(()) => {
                tracing::debug!("All health checks passed, setting status to SERVING");
                HealthStatus::Serving
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    "Health check failed, setting status to NOT_SERVING"
                );
                HealthStatus::NotServing
            }
        };

        self.publish(status).await;
        status
    }

    async fn publish(&mut self, status: HealthStatus) {
        // Empty string is the overall server health
        self.reporter
            .set_service_status("", status.into())
            .await;
        for name in &self.services {
            self.reporter.set_service_status(name, status.into()).await;
        }
        self.status_tx.send_replace(status);
    }

    /// Start background health check task
    ///
    /// Spawns a task that runs the checks every `interval` and updates the
    /// reported status. Abort the returned handle to stop it.
    pub fn start_background_check(
        manager: Arc<tokio::sync::Mutex<Self>>,
        interval: Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let mut mgr = manager.lock().await;
                mgr.check_and_update().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HealthCheckError;
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        pub Check {}

        #[async_trait]
        impl HealthCheck for Check {
            fn name(&self) -> &str;
            async fn check(&self) -> Result<()>;
        }
    }

    fn healthy() -> Box<dyn HealthCheck> {
        let mut check = MockCheck::new();
        check.expect_name().return_const("healthy".to_string());
        check.expect_check().returning(|| Ok(()));
        Box::new(check)
    }

    fn unhealthy() -> Box<dyn HealthCheck> {
        let mut check = MockCheck::new();
        check.expect_name().return_const("unhealthy".to_string());
        check
            .expect_check()
            .returning(|| Err(HealthCheckError::generic("Always fails")));
        Box::new(check)
    }

    #[tokio::test]
    async fn test_register_and_execute_healthy_check() {
        let (manager, _service) = HealthManager::new();

        manager.register_check(healthy()).await;

        assert!(manager.execute_checks().await.is_ok());
    }

    #[tokio::test]
    async fn test_multiple_checks_one_unhealthy() {
        let (manager, _service) = HealthManager::new();

        manager.register_check(healthy()).await;
        manager.register_check(unhealthy()).await;

        assert!(manager.execute_checks().await.is_err());
    }

    #[tokio::test]
    async fn test_first_failure_short_circuits() {
        let (manager, _service) = HealthManager::new();

        let mut never_run = MockCheck::new();
        never_run.expect_name().return_const("never".to_string());
        never_run.expect_check().never();

        manager.register_check(unhealthy()).await;
        manager.register_check(Box::new(never_run)).await;

        assert!(manager.execute_checks().await.is_err());
    }

    #[tokio::test]
    async fn test_check_and_update_publishes_status() {
        let (mut manager, _service) = HealthManager::new();
        manager.track_service("video.v1.VideoService");
        let rx = manager.subscribe();
        assert_eq!(*rx.borrow(), HealthStatus::Unknown);

        manager.register_check(healthy()).await;
        assert_eq!(manager.check_and_update().await, HealthStatus::Serving);
        assert_eq!(*rx.borrow(), HealthStatus::Serving);

        manager.register_check(unhealthy()).await;
        assert_eq!(manager.check_and_update().await, HealthStatus::NotServing);
        assert_eq!(*rx.borrow(), HealthStatus::NotServing);
    }

    #[tokio::test]
    async fn test_background_check_updates_status() {
        let (manager, _service) = HealthManager::new();
        manager.register_check(healthy()).await;
        let mut rx = manager.subscribe();
        let manager = Arc::new(tokio::sync::Mutex::new(manager));

        let handle =
            HealthManager::start_background_check(manager.clone(), Duration::from_millis(50));

        tokio::time::timeout(Duration::from_secs(2), rx.changed())
            .await
            .expect("status should change")
            .unwrap();
        assert_eq!(*rx.borrow(), HealthStatus::Serving);

        handle.abort();
    }
}
