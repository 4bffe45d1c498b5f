//! Outbound calls to video-service

use std::time::Duration;

use async_trait::async_trait;
use grpc_clients::video::GetVideoRequest;
use grpc_clients::VideoServiceClient;
use tonic::metadata::MetadataMap;
use tonic::transport::Channel;
use tonic::{Request, Status};

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";

/// Existence check for the video a comment is attached to
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// `Ok(())` when the video exists, otherwise the status video-service returned.
    ///
    /// `timeout` is the caller's remaining deadline, if it sent one.
    async fn get_video(&self, video_id: &str, timeout: Option<Duration>) -> Result<(), Status>;
}

/// [`VideoLookup`] backed by the generated VideoService client
#[derive(Clone)]
pub struct GrpcVideoLookup {
    client: VideoServiceClient<Channel>,
}

impl GrpcVideoLookup {
    pub fn new(client: VideoServiceClient<Channel>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoLookup for GrpcVideoLookup {
    async fn get_video(&self, video_id: &str, timeout: Option<Duration>) -> Result<(), Status> {
        let mut request = Request::new(GetVideoRequest {
            id: video_id.to_string(),
        });
        if let Some(timeout) = timeout {
            request.set_timeout(timeout);
        }

        // Channel clones share the underlying connection
        let mut client = self.client.clone();
        client.get_video(request).await?;
        Ok(())
    }
}

/// Deadline the caller attached to an incoming request
///
/// The header value is at most 8 digits followed by a unit: `H`, `M`, `S`,
/// `m` (millis), `u` (micros) or `n` (nanos). Malformed values are ignored.
pub fn grpc_timeout(metadata: &MetadataMap) -> Option<Duration> {
    let value = metadata.get(GRPC_TIMEOUT_HEADER)?.to_str().ok()?;
    if value.len() < 2 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 60 * 60)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}
