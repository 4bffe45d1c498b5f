pub mod config;
pub mod dao;
pub mod error;
pub mod grpc;

pub use config::Config;
pub use error::{Result, ServiceError};
