//! Data access for comments
//!
//! Handlers only see the [`CommentDao`] trait; [`MongoCommentDao`] is the
//! production implementation.

mod mongo;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use mongo::MongoCommentDao;

/// A comment as stored in the `comments` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(
        rename = "_id",
        with = "mongodb::bson::serde_helpers::uuid_1_as_binary"
    )]
    pub id: Uuid,
    /// Hex ObjectId of the owning video
    pub video_id: String,
    pub content: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied by the caller on create; id and timestamps come from the DAO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub video_id: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("comment not found")]
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
pub trait CommentDao: Send + Sync {
    /// Newest first. `limit <= 0` returns everything after `offset`.
    async fn list_by_video_id(
        &self,
        video_id: &str,
        limit: i64,
        offset: i64,
    ) -> DaoResult<Vec<Comment>>;

    /// Persists the comment and returns the generated id.
    async fn create(&self, comment: NewComment) -> DaoResult<Uuid>;

    /// Replaces the content and returns the stored comment after the update.
    async fn update(&self, id: Uuid, content: &str) -> DaoResult<Comment>;

    async fn delete(&self, id: Uuid) -> DaoResult<()>;

    /// Returns how many comments were removed; removing none is not an error.
    async fn delete_by_video_id(&self, video_id: &str) -> DaoResult<u64>;
}
