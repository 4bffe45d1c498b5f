//! # gRPC Health Check Library
//!
//! Health reporting for Kubernetes liveness and readiness probes.
//! Implements the standard grpc.health.v1 protocol using tonic-health.
//!
//! ## Features
//!
//! - Standard grpc.health.v1 protocol support, overall and per service name
//! - MongoDB dependency check
//! - Background health monitoring with a watch channel for HTTP probes
//!
//! ## Example
//!
//! ```ignore
//! use grpc_health::{HealthManager, HealthManagerBuilder};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let (health_manager, health_service) = HealthManagerBuilder::new()
//!     .with_service_name("comment.v1.CommentService")
//!     .with_mongo(database.clone())
//!     .build()
//!     .await;
//!
//! let readiness = health_manager.subscribe();
//! let health_manager = Arc::new(tokio::sync::Mutex::new(health_manager));
//! HealthManager::start_background_check(health_manager, Duration::from_secs(10));
//!
//! // Add health_service to your gRPC server
//! ```

mod builder;
mod checks;
mod error;
mod health;
mod manager;

pub use builder::HealthManagerBuilder;
pub use checks::{HealthCheck, MongoHealthCheck};
pub use error::{HealthCheckError, Result};
pub use health::HealthStatus;
pub use manager::HealthManager;

// Re-export tonic-health types for convenience
pub use tonic_health::pb::health_server::HealthServer;
