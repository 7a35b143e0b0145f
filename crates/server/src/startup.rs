use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::auth;
use service::ragflow::RagflowService;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Resolve the JWT secret: config file first, then env, then a dev default.
fn load_jwt_secret() -> String {
    configs::load_default()
        .ok()
        .and_then(|cfg| {
            let mut auth = cfg.auth;
            auth.normalize_from_env();
            auth.jwt_secret
        })
        .or_else(|| env::var("JWT_SECRET").ok())
        .unwrap_or_else(|| "dev-secret-change-me".to_string())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // DB connection + schema
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    // Integration settings are snapshotted once here; POST /admin/ragflow/reload re-reads them
    let ragflow = Arc::new(RagflowService::load(&db).await?);
    info!(configured = ragflow.is_configured(), "ragflow settings loaded");

    let state = auth::ServerState {
        db,
        auth: auth::ServerAuthConfig { jwt_secret: load_jwt_secret() },
        ragflow,
    };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting console server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
