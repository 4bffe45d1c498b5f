//! gRPC server for VideoService
//!
//! Every handler is a single round trip to the [`VideoDao`]: ids are
//! validated first, DAO results are mapped into the protobuf schema.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use prost_types::Timestamp;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use crate::dao::{Video, VideoDao};
use crate::error::{parse_object_id, ServiceError};

// Generated protobuf types and service traits
pub mod proto {
    pub mod video {
        pub mod v1 {
            tonic::include_proto!("video.v1");
        }
    }
}

pub use proto::video::v1::{
    video_service_server, DeleteVideoRequest, DeleteVideoResponse, GetVideoRequest,
    GetVideoResponse, HealthzRequest, HealthzResponse, ListVideoRequest, ListVideoResponse,
    VideoInfo,
};

/// Fully qualified service name reported to grpc.health.v1
pub const SERVICE_NAME: &str = "video.v1.VideoService";

/// VideoService gRPC server implementation
#[derive(Clone)]
pub struct VideoServiceImpl {
    video_dao: Arc<dyn VideoDao>,
}

impl VideoServiceImpl {
    pub fn new(video_dao: Arc<dyn VideoDao>) -> Self {
        Self { video_dao }
    }
}

#[tonic::async_trait]
impl video_service_server::VideoService for VideoServiceImpl {
    async fn healthz(
        &self,
        _request: Request<HealthzRequest>,
    ) -> Result<Response<HealthzResponse>, Status> {
        Ok(Response::new(HealthzResponse {
            status: "ok".to_string(),
        }))
    }

    async fn get_video(
        &self,
        request: Request<GetVideoRequest>,
    ) -> Result<Response<GetVideoResponse>, Status> {
        let req = request.into_inner();
        let id = parse_object_id(&req.id)?;
        debug!(video_id = %id, "Getting video");

        let video = self.video_dao.get(id).await.map_err(|e| {
            let err = ServiceError::from(e);
            warn!(video_id = %id, error = %err, "GetVideo failed");
            err
        })?;

        Ok(Response::new(GetVideoResponse {
            video: Some(video.into()),
        }))
    }

    async fn list_video(
        &self,
        request: Request<ListVideoRequest>,
    ) -> Result<Response<ListVideoResponse>, Status> {
        let req = request.into_inner();
        debug!(limit = req.limit, skip = req.skip, "Listing videos");

        let videos = self
            .video_dao
            .list(req.limit, req.skip)
            .await
            .map_err(ServiceError::from)?;

        Ok(Response::new(ListVideoResponse {
            videos: videos.into_iter().map(VideoInfo::from).collect(),
        }))
    }

    async fn delete_video(
        &self,
        request: Request<DeleteVideoRequest>,
    ) -> Result<Response<DeleteVideoResponse>, Status> {
        let req = request.into_inner();
        let id = parse_object_id(&req.id)?;

        self.video_dao.delete(id).await.map_err(|e| {
            let err = ServiceError::from(e);
            warn!(video_id = %id, error = %err, "DeleteVideo failed");
            err
        })?;

        info!(video_id = %id, "Deleted video");
        Ok(Response::new(DeleteVideoResponse {}))
    }
}

pub fn to_ts(dt: DateTime<Utc>) -> Option<Timestamp> {
    Some(Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    })
}

impl From<Video> for VideoInfo {
    fn from(video: Video) -> Self {
        VideoInfo {
            id: video.id.to_hex(),
            width: video.width,
            height: video.height,
            size: video.size,
            duration: video.duration,
            url: video.url,
            status: video.status,
            variants: video.variants,
            created_at: to_ts(video.created_at),
            updated_at: to_ts(video.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::oid::ObjectId;
    use std::collections::HashMap;

    #[test]
    fn test_video_to_proto() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let id = ObjectId::new();
        let video = Video {
            id,
            width: 1280,
            height: 720,
            size: 1024,
            duration: 12.25,
            url: "https://cdn.example.com/v.mp4".to_string(),
            status: "ready".to_string(),
            variants: HashMap::from([("480p".to_string(), "v_480.mp4".to_string())]),
            created_at: created,
            updated_at: created + chrono::Duration::milliseconds(1500),
        };

        let info = VideoInfo::from(video);

        assert_eq!(info.id, id.to_hex());
        assert_eq!(info.width, 1280);
        assert_eq!(info.variants.get("480p").map(String::as_str), Some("v_480.mp4"));
        assert_eq!(
            info.created_at,
            Some(Timestamp {
                seconds: created.timestamp(),
                nanos: 0
            })
        );
        assert_eq!(info.updated_at.unwrap().nanos, 500_000_000);
    }
}
