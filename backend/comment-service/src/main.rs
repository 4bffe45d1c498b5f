use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tonic::transport::{Certificate, Identity, Server, ServerTlsConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grpc_health::{HealthManager, HealthManagerBuilder, HealthStatus};
use comment_service::clients::GrpcVideoLookup;
use comment_service::config::{Config, GrpcConfig};
use comment_service::dao::MongoCommentDao;
use comment_service::grpc::{
    comment_service_server::CommentServiceServer, CommentServiceImpl, SERVICE_NAME,
};
use grpc_clients::GrpcClientPool;

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

async fn ready(readiness: web::Data<watch::Receiver<HealthStatus>>) -> HttpResponse {
    if readiness.borrow().is_serving() {
        HttpResponse::Ok().body("READY")
    } else {
        HttpResponse::ServiceUnavailable().body("NOT READY")
    }
}

async fn server_builder(grpc_config: &GrpcConfig) -> Result<Server> {
    if let (Some(cert_path), Some(key_path), Some(ca_path)) = (
        &grpc_config.server_cert_path,
        &grpc_config.server_key_path,
        &grpc_config.ca_cert_path,
    ) {
        info!("Configuring gRPC server with mTLS");

        let cert = tokio::fs::read(cert_path)
            .await
            .context("Failed to read server certificate")?;
        let key = tokio::fs::read(key_path)
            .await
            .context("Failed to read server key")?;
        let ca_cert = tokio::fs::read(ca_path)
            .await
            .context("Failed to read CA certificate")?;

        let tls_config = ServerTlsConfig::new()
            .identity(Identity::from_pem(cert, key))
            .client_ca_root(Certificate::from_pem(ca_cert));

        return Server::builder()
            .tls_config(tls_config)
            .context("Failed to configure TLS");
    }

    info!("Running gRPC server without mTLS (development mode)");
    Ok(Server::builder())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting comment-service v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: env={}, http_port={}, grpc_port={}",
        config.app.env, config.app.http_port, config.grpc.port
    );

    config.database.log_config();
    let database = db_pool::create_client(config.database.clone())
        .await
        .context("Failed to connect to MongoDB")?;

    let comment_dao = MongoCommentDao::new(&database);
    comment_dao
        .ensure_indexes()
        .await
        .context("Failed to create comment indexes")?;

    info!(
        "Connecting to video-service at {}",
        config.clients.video_service_url
    );
    let clients = GrpcClientPool::new(&config.clients)
        .await
        .context("Failed to configure video-service client")?;
    let video_lookup = Arc::new(GrpcVideoLookup::new(clients.video()));

    let comment_service = CommentServiceImpl::new(Arc::new(comment_dao), video_lookup);

    let (health_manager, health_service) = HealthManagerBuilder::new()
        .with_service_name(SERVICE_NAME)
        .with_mongo(database.clone())
        .build()
        .await;
    let readiness = health_manager.subscribe();
    let health_manager = Arc::new(tokio::sync::Mutex::new(health_manager));
    let health_task = HealthManager::start_background_check(
        health_manager,
        Duration::from_secs(config.health.check_interval_secs),
    );

    let grpc_addr = format!("{}:{}", config.app.host, config.grpc.port)
        .parse()
        .context("Invalid gRPC address")?;
    let http_addr = format!("{}:{}", config.app.host, config.app.http_port);

    info!("Starting servers:");
    info!("  - HTTP health checks: http://{}", http_addr);
    info!("  - gRPC service: grpc://{}", grpc_addr);

    let mut join_set = JoinSet::new();

    let readiness_data = web::Data::new(readiness);
    let http_server = HttpServer::new(move || {
        App::new()
            .app_data(readiness_data.clone())
            .route("/health", web::get().to(|| async { "OK" }))
            .route("/ready", web::get().to(ready))
    })
    .bind(&http_addr)
    .context("Failed to bind HTTP server")?
    .run();

    join_set.spawn(async move {
        http_server
            .await
            .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))
    });

    let mut grpc_server = server_builder(&config.grpc).await?;
    join_set.spawn(async move {
        grpc_server
            .add_service(health_service)
            .add_service(CommentServiceServer::new(comment_service))
            .serve_with_shutdown(grpc_addr, shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("gRPC server error: {}", e))
    });

    info!("comment-service is running");

    let result = match join_set.join_next().await {
        Some(Ok(Ok(()))) => Ok(()),
        Some(Ok(Err(e))) => {
            tracing::error!("Server failed: {:#}", e);
            Err(e)
        }
        Some(Err(e)) => {
            tracing::error!("Server task panicked: {:#}", e);
            Err(anyhow::anyhow!("Server task panicked: {}", e))
        }
        None => Ok(()),
    };

    health_task.abort();
    join_set.abort_all();
    info!("comment-service shutting down");
    result
}
