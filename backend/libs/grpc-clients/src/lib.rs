/// gRPC Clients Library
///
/// Centralizes client stub generation for inter-service calls and the channel
/// configuration those clients share.
pub mod config;

use std::sync::Arc;
use thiserror::Error;
use tonic::transport::Channel;

pub mod video {
    pub mod v1 {
        tonic::include_proto!("video.v1");
    }
    pub use v1::*;
}

pub use config::GrpcConfig;
pub use video::video_service_client::VideoServiceClient;

/// Errors raised while building outbound channels
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("failed to read TLS material: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct GrpcClientPool {
    video_client: Arc<VideoServiceClient<Channel>>,
}

impl GrpcClientPool {
    /// Create the client pool from configuration
    ///
    /// If a peer is unreachable at startup the client is backed by a lazy channel
    /// to the same endpoint, so calls fail (or succeed once the peer is up)
    /// instead of blocking initialization.
    pub async fn new(config: &GrpcConfig) -> Result<Self, ClientError> {
        let channel =
            connect_or_lazy(config, &config.video_service_url, "video-service").await?;

        Ok(Self {
            video_client: Arc::new(VideoServiceClient::new(channel)),
        })
    }

    pub fn video(&self) -> VideoServiceClient<Channel> {
        (*self.video_client).clone()
    }
}

async fn connect_or_lazy(
    config: &GrpcConfig,
    url: &str,
    service_name: &str,
) -> Result<Channel, ClientError> {
    let endpoint = config.make_endpoint(url)?;

    match endpoint.connect().await {
        Ok(channel) => {
            tracing::debug!("Connected to {} at {}", service_name, url);
            Ok(channel)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to {} at {}: {}; calls will retry the connection lazily",
                service_name,
                url,
                e
            );
            Ok(endpoint.connect_lazy())
        }
    }
}
