//! Data access for video metadata
//!
//! Handlers only see the [`VideoDao`] trait; [`MongoVideoDao`] is the
//! production implementation.

mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use mongo::MongoVideoDao;

/// Video metadata as stored in the `videos` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub width: u32,
    pub height: u32,
    /// Size in bytes
    pub size: u64,
    /// Duration in seconds
    pub duration: f64,
    pub url: String,
    pub status: String,
    /// Transcoded renditions, keyed by quality label
    #[serde(default)]
    pub variants: HashMap<String, String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("video not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),
}

impl From<mongodb::error::Error> for DaoError {
    fn from(err: mongodb::error::Error) -> Self {
        DaoError::Database(err.to_string())
    }
}

pub type DaoResult<T> = std::result::Result<T, DaoError>;

#[async_trait]
pub trait VideoDao: Send + Sync {
    async fn get(&self, id: ObjectId) -> DaoResult<Video>;

    /// Newest first. `limit <= 0` returns everything after `skip`.
    async fn list(&self, limit: i64, skip: i64) -> DaoResult<Vec<Video>>;

    /// Fails with [`DaoError::NotFound`] when nothing was deleted.
    async fn delete(&self, id: ObjectId) -> DaoResult<()>;
}
