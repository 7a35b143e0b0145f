use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::ServerState;
use crate::errors::JsonApiError;
use service::errors::ServiceError;
use service::param_service;

#[derive(Debug, Deserialize, Serialize)]
pub struct UpsertParamInput {
    pub code: String,
    pub value: String,
    #[serde(default)]
    pub remark: Option<String>,
}

#[utoipa::path(
    get, path = "/admin/params", tag = "params",
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<models::sys_param::Model>>, JsonApiError> {
    match param_service::list_params(&state.db).await {
        Ok(list) => Ok(Json(list)),
        Err(e) => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string()))),
    }
}

#[utoipa::path(
    put, path = "/admin/params", tag = "params",
    request_body = crate::openapi::UpsertParamInputDoc,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Save Failed")
    )
)]
pub async fn upsert(State(state): State<ServerState>, Json(input): Json<UpsertParamInput>) -> Result<Json<models::sys_param::Model>, JsonApiError> {
    match param_service::set_value(&state.db, &input.code, &input.value, input.remark.as_deref()).await {
        Ok(saved) => {
            info!(code = %saved.code, "param saved");
            Ok(Json(saved))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
            }
            _ => {
                error!(err = %e, "save param failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Save Failed", Some(e.to_string())))
            }
        },
    }
}

#[utoipa::path(
    delete, path = "/admin/params/{code}", tag = "params",
    params(("code" = String, Path, description = "Parameter code")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(code): Path<String>) -> StatusCode {
    match param_service::delete_param(&state.db, &code).await {
        Ok(true) => {
            info!(%code, "param deleted");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete param failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
