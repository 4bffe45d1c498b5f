//! gRPC server for CommentService

use std::sync::Arc;

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use crate::clients::{grpc_timeout, VideoLookup};
use crate::dao::{Comment, CommentDao, NewComment};
use crate::error::{parse_comment_id, validate_video_id, ServiceError};

pub mod proto {
    pub mod comment {
        pub mod v1 {
            tonic::include_proto!("comment.v1");
        }
    }
}

pub use proto::comment::v1::{
    comment_service_server, CommentInfo, CreateCommentRequest, CreateCommentResponse,
    DeleteCommentByVideoIdRequest, DeleteCommentByVideoIdResponse, DeleteCommentRequest,
    DeleteCommentResponse, HealthzRequest, HealthzResponse, ListCommentRequest,
    ListCommentResponse, UpdateCommentRequest, UpdateCommentResponse,
};

/// Fully qualified service name reported to grpc.health.v1
pub const SERVICE_NAME: &str = "comment.v1.CommentService";

#[derive(Clone)]
pub struct CommentServiceImpl {
    comment_dao: Arc<dyn CommentDao>,
    video_client: Arc<dyn VideoLookup>,
}

impl CommentServiceImpl {
    pub fn new(comment_dao: Arc<dyn CommentDao>, video_client: Arc<dyn VideoLookup>) -> Self {
        Self {
            comment_dao,
            video_client,
        }
    }
}

#[tonic::async_trait]
impl comment_service_server::CommentService for CommentServiceImpl {
    async fn healthz(
        &self,
        _request: Request<HealthzRequest>,
    ) -> Result<Response<HealthzResponse>, Status> {
        Ok(Response::new(HealthzResponse {
            status: "ok".to_string(),
        }))
    }

    async fn list_comment(
        &self,
        request: Request<ListCommentRequest>,
    ) -> Result<Response<ListCommentResponse>, Status> {
        let req = request.into_inner();
        let video_id = validate_video_id(&req.video_id)?;
        debug!(video_id, limit = req.limit, offset = req.offset, "Listing comments");

        let comments = self
            .comment_dao
            .list_by_video_id(video_id, i64::from(req.limit), i64::from(req.offset))
            .await
            .map_err(ServiceError::from)?;

        Ok(Response::new(ListCommentResponse {
            comments: comments.into_iter().map(CommentInfo::from).collect(),
        }))
    }

    async fn create_comment(
        &self,
        request: Request<CreateCommentRequest>,
    ) -> Result<Response<CreateCommentResponse>, Status> {
        let deadline = grpc_timeout(request.metadata());
        let req = request.into_inner();
        let video_id = validate_video_id(&req.video_id)?;

        if let Err(status) = self.video_client.get_video(video_id, deadline).await {
            warn!(
                video_id,
                code = ?status.code(),
                "Video lookup failed, comment not created"
            );
            return Err(ServiceError::Grpc(status).into());
        }

        let id = self
            .comment_dao
            .create(NewComment {
                video_id: req.video_id.clone(),
                content: req.content,
            })
            .await
            .map_err(ServiceError::from)?;

        info!(comment_id = %id, video_id = %req.video_id, "Created comment");
        Ok(Response::new(CreateCommentResponse { id: id.to_string() }))
    }

    async fn update_comment(
        &self,
        request: Request<UpdateCommentRequest>,
    ) -> Result<Response<UpdateCommentResponse>, Status> {
        let req = request.into_inner();
        let id = parse_comment_id(&req.id)?;

        let comment = self
            .comment_dao
            .update(id, &req.content)
            .await
            .map_err(|e| {
                let err = ServiceError::from(e);
                warn!(comment_id = %id, error = %err, "UpdateComment failed");
                err
            })?;

        info!(comment_id = %id, "Updated comment");
        Ok(Response::new(UpdateCommentResponse {
            comment: Some(comment.into()),
        }))
    }

    async fn delete_comment(
        &self,
        request: Request<DeleteCommentRequest>,
    ) -> Result<Response<DeleteCommentResponse>, Status> {
        let req = request.into_inner();
        let id = parse_comment_id(&req.id)?;

        self.comment_dao.delete(id).await.map_err(|e| {
            let err = ServiceError::from(e);
            warn!(comment_id = %id, error = %err, "DeleteComment failed");
            err
        })?;

        info!(comment_id = %id, "Deleted comment");
        Ok(Response::new(DeleteCommentResponse {}))
    }

    async fn delete_comment_by_video_id(
        &self,
        request: Request<DeleteCommentByVideoIdRequest>,
    ) -> Result<Response<DeleteCommentByVideoIdResponse>, Status> {
        let req = request.into_inner();
        let video_id = validate_video_id(&req.video_id)?;

        let deleted = self
            .comment_dao
            .delete_by_video_id(video_id)
            .await
            .map_err(ServiceError::from)?;

        info!(video_id, deleted, "Deleted comments for video");
        Ok(Response::new(DeleteCommentByVideoIdResponse {}))
    }
}

pub fn to_ts(dt: DateTime<Utc>) -> Option<Timestamp> {
    Some(Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    })
}

impl From<Comment> for CommentInfo {
    fn from(comment: Comment) -> Self {
        CommentInfo {
            id: comment.id.to_string(),
            video_id: comment.video_id,
            content: comment.content,
            created_at: to_ts(comment.created_at),
            updated_at: to_ts(comment.updated_at),
        }
    }
}
