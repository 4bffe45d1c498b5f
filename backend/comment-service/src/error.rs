use thiserror::Error;
use tonic::Status;
use uuid::Uuid;

use crate::dao::DaoError;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by CommentService handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid UUID")]
    InvalidUuid,

    #[error("invalid video ID")]
    InvalidVideoId,

    #[error("comment not found")]
    CommentNotFound,

    #[error(transparent)]
    Dao(DaoError),

    /// Status returned by video-service, forwarded as is
    #[error(transparent)]
    Grpc(Status),
}

impl From<DaoError> for ServiceError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ServiceError::CommentNotFound,
            other => ServiceError::Dao(other),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidUuid | ServiceError::InvalidVideoId => {
                Status::invalid_argument(err.to_string())
            }
            ServiceError::CommentNotFound => Status::not_found(err.to_string()),
            ServiceError::Dao(e) => Status::internal(e.to_string()),
            ServiceError::Grpc(status) => status,
        }
    }
}

pub fn parse_comment_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| ServiceError::InvalidUuid)
}

/// Video ids are MongoDB ObjectIds; the hex form is kept as is
pub fn validate_video_id(value: &str) -> Result<&str> {
    mongodb::bson::oid::ObjectId::parse_str(value)
        .map(|_| value)
        .map_err(|_| ServiceError::InvalidVideoId)
}
