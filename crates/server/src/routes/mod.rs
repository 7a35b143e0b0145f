pub mod contents;
pub mod params;
pub mod ragflow;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{self, ServerState};
use common::types::Health;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public, read and management routes.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    // Read routes
    let read_api = Router::new()
        .route("/ragflow/datasets", get(ragflow::datasets))
        .route("/ragflow/retrieval", post(ragflow::retrieval))
        .route("/admin/contents", get(contents::list))
        .route("/admin/contents/by-code/:code", get(contents::get_by_code))
        .route("/admin/contents/:id", get(contents::get))
        .route_layer(middleware::from_fn(|req, next| {
            auth::require_permission(auth::PERM_KB_READ, req, next)
        }));

    // Management routes
    let manage_api = Router::new()
        .route("/admin/contents", post(contents::create))
        .route("/admin/contents/:id", put(contents::update).delete(contents::delete))
        .route("/admin/params", get(params::list).put(params::upsert))
        .route("/admin/params/:code", delete(params::delete))
        .route("/admin/ragflow/reload", post(ragflow::reload))
        .route_layer(middleware::from_fn(|req, next| {
            auth::require_permission(auth::PERM_CONTENT_MANAGE, req, next)
        }));

    let swagger = SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi());

    // Compose
    public
        .merge(read_api)
        .merge(manage_api)
        .merge(swagger)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token_state,
        ))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
