use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::ServerState;
use crate::errors::JsonApiError;
use service::ragflow::{Dataset, DEFAULT_TOP_K};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DatasetQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RetrievalInput {
    pub question: String,
    #[serde(default)]
    pub dataset_ids: Vec<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ReloadOutput {
    pub configured: bool,
}

/// Knowledge-base dataset listing. Upstream or configuration failures
/// degrade to an empty list; this endpoint never fails.
#[utoipa::path(
    get, path = "/ragflow/datasets", tag = "ragflow",
    params(DatasetQuery),
    responses((status = 200, description = "List of datasets; empty on any upstream failure"))
)]
pub async fn datasets(State(state): State<ServerState>, Query(q): Query<DatasetQuery>) -> Json<Vec<Dataset>> {
    let page = q.page.unwrap_or(1);
    let page_size = q.page_size.unwrap_or(1000);
    let list = state.ragflow.datasets(page, page_size).await;
    info!(count = list.len(), page, page_size, "list ragflow datasets");
    Json(list)
}

/// Retrieval over the configured knowledge base; same degrade-to-empty
/// contract as dataset listing.
#[utoipa::path(
    post, path = "/ragflow/retrieval", tag = "ragflow",
    request_body = crate::openapi::RetrievalInputDoc,
    responses((status = 200, description = "Chunk contents; empty on any upstream failure"))
)]
pub async fn retrieval(State(state): State<ServerState>, Json(input): Json<RetrievalInput>) -> Json<Vec<String>> {
    let top_k = input.top_k.unwrap_or(DEFAULT_TOP_K);
    let chunks = state
        .ragflow
        .retrieve_chunks(&input.question, &input.dataset_ids, top_k)
        .await;
    info!(count = chunks.len(), top_k, "ragflow retrieval");
    Json(chunks)
}

/// Re-read the integration settings from the parameter store.
#[utoipa::path(
    post, path = "/admin/ragflow/reload", tag = "ragflow",
    responses(
        (status = 200, description = "Settings reloaded"),
        (status = 500, description = "Reload Failed")
    )
)]
pub async fn reload(State(state): State<ServerState>) -> Result<Json<ReloadOutput>, JsonApiError> {
    match state.ragflow.reload(&state.db).await {
        Ok(configured) => {
            info!(configured, "ragflow settings reloaded");
            Ok(Json(ReloadOutput { configured }))
        }
        Err(e) => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Reload Failed", Some(e.to_string()))),
    }
}
