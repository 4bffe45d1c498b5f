/// gRPC Configuration
///
/// Endpoint configuration for outbound inter-service gRPC calls.
use db_pool::env_utils::{env_non_empty, parse_env_flag, parse_env_with_default};
use std::fs;
use std::time::Duration;

use tonic::transport::{Certificate, ClientTlsConfig, Endpoint, Identity};

use crate::ClientError;

#[derive(Debug, Clone)]
pub struct GrpcConfig {
    /// Video Service endpoint
    pub video_service_url: String,

    /// gRPC connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// gRPC request timeout in seconds
    pub request_timeout_secs: u64,

    /// HTTP/2 keep-alive interval in seconds
    pub keepalive_interval_secs: u64,

    /// HTTP/2 keep-alive timeout in seconds
    pub keepalive_timeout_secs: u64,

    /// Enable TLS/mTLS for gRPC clients
    pub tls_enabled: bool,
    /// Optional custom domain name for TLS SNI/verification
    pub tls_domain_name: Option<String>,
    /// Path to CA certificate (PEM)
    pub tls_ca_cert_path: Option<String>,
    /// Path to client certificate (PEM) for mTLS
    pub tls_client_cert_path: Option<String>,
    /// Path to client private key (PEM) for mTLS
    pub tls_client_key_path: Option<String>,
}

impl GrpcConfig {
    /// Load configuration from environment variables
    /// Falls back to in-cluster defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            video_service_url: env_non_empty("GRPC_VIDEO_SERVICE_URL")
                .unwrap_or(defaults.video_service_url),
            connection_timeout_secs: parse_env_with_default(
                "GRPC_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            ),
            request_timeout_secs: parse_env_with_default(
                "GRPC_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            ),
            keepalive_interval_secs: parse_env_with_default(
                "GRPC_KEEPALIVE_INTERVAL_SECS",
                defaults.keepalive_interval_secs,
            ),
            keepalive_timeout_secs: parse_env_with_default(
                "GRPC_KEEPALIVE_TIMEOUT_SECS",
                defaults.keepalive_timeout_secs,
            ),

            // TLS/mTLS
            tls_enabled: parse_env_flag("GRPC_TLS_ENABLED", false),
            tls_domain_name: env_non_empty("GRPC_TLS_DOMAIN_NAME"),
            tls_ca_cert_path: env_non_empty("GRPC_TLS_CA_CERT_PATH"),
            tls_client_cert_path: env_non_empty("GRPC_TLS_CLIENT_CERT_PATH"),
            tls_client_key_path: env_non_empty("GRPC_TLS_CLIENT_KEY_PATH"),
        }
    }

    /// Configuration for local development
    pub fn development() -> Self {
        Self {
            video_service_url: "http://localhost:50051".to_string(),
            ..Self::default()
        }
    }

    /// Build a tonic Endpoint from URL with timeouts/keepalive and optional TLS/mTLS
    pub fn make_endpoint(&self, url: &str) -> Result<Endpoint, ClientError> {
        let mut ep = Endpoint::from_shared(url.to_string())?
            .connect_timeout(Duration::from_secs(self.connection_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .http2_keep_alive_interval(Duration::from_secs(self.keepalive_interval_secs))
            .keep_alive_timeout(Duration::from_secs(self.keepalive_timeout_secs))
            .tcp_nodelay(true);

        if self.tls_enabled {
            let mut tls = ClientTlsConfig::new();

            if let Some(ca_path) = &self.tls_ca_cert_path {
                let ca_pem = fs::read(ca_path)?;
                tls = tls.ca_certificate(Certificate::from_pem(ca_pem));
            }

            if let Some(domain) = &self.tls_domain_name {
                tls = tls.domain_name(domain);
            }

            if let (Some(cert_path), Some(key_path)) =
                (&self.tls_client_cert_path, &self.tls_client_key_path)
            {
                let cert_pem = fs::read(cert_path)?;
                let key_pem = fs::read(key_path)?;
                tls = tls.identity(Identity::from_pem(cert_pem, key_pem));
            }

            ep = ep.tls_config(tls)?;
        }

        Ok(ep)
    }
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            video_service_url: "http://video-service:50051".to_string(),
            connection_timeout_secs: 10,
            request_timeout_secs: 30,
            keepalive_interval_secs: 30,
            keepalive_timeout_secs: 10,
            tls_enabled: false,
            tls_domain_name: None,
            tls_ca_cert_path: None,
            tls_client_cert_path: None,
            tls_client_key_path: None,
        }
    }
}
