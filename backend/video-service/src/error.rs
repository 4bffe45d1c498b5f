use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tonic::Status;

use crate::dao::DaoError;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by VideoService handlers
///
/// Malformed ids and missing videos map to stable statuses; anything else from
/// the data layer is passed through as `Internal` with its original message.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid object ID")]
    InvalidObjectId,

    #[error("video not found")]
    VideoNotFound,

    #[error(transparent)]
    Dao(DaoError),
}

impl From<DaoError> for ServiceError {
    fn from(err: DaoError) -> Self {
        match err {
            DaoError::NotFound => ServiceError::VideoNotFound,
            other => ServiceError::Dao(other),
        }
    }
}

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidObjectId => Status::invalid_argument(err.to_string()),
            ServiceError::VideoNotFound => Status::not_found(err.to_string()),
            ServiceError::Dao(e) => Status::internal(e.to_string()),
        }
    }
}

pub fn parse_object_id(value: &str) -> Result<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| ServiceError::InvalidObjectId)
}
