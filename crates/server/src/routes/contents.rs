use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::ServerState;
use crate::errors::JsonApiError;
use common::pagination::Pagination;
use service::content::{ContentPatch, ContentService, NewContent, SeaOrmContentRepository};
use service::errors::ServiceError;

fn content_service(state: &ServerState) -> ContentService<SeaOrmContentRepository> {
    ContentService::new(Arc::new(SeaOrmContentRepository { db: state.db.clone() }))
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub tenant_id: Option<Uuid>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateContentInput {
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    pub code: i32,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub img_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub introduction: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    #[serde(default)]
    pub sort: Option<i32>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub creator: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct UpdateContentInput {
    pub code: Option<i32>,
    pub category_id: Option<i32>,
    pub img_url: Option<String>,
    pub name: Option<String>,
    pub introduction: Option<String>,
    pub body: Option<String>,
    pub voice: Option<String>,
    pub sort: Option<i32>,
    pub enabled: Option<bool>,
    pub updater: Option<String>,
}

#[utoipa::path(
    get, path = "/admin/contents", tag = "content",
    params(ListQuery),
    responses(
        (status = 200, description = "List OK"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(State(state): State<ServerState>, Query(q): Query<ListQuery>) -> Result<Json<Vec<models::content::Model>>, JsonApiError> {
    let page = Pagination {
        page: q.page.unwrap_or(1),
        per_page: q.per_page.unwrap_or(20),
    };
    match content_service(&state).list(q.tenant_id, page).await {
        Ok(list) => {
            info!(count = list.len(), "list contents");
            Ok(Json(list))
        }
        Err(e) => Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", Some(e.to_string()))),
    }
}

#[utoipa::path(
    post, path = "/admin/contents", tag = "content",
    request_body = crate::openapi::CreateContentInputDoc,
    responses(
        (status = 200, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(State(state): State<ServerState>, Json(input): Json<CreateContentInput>) -> Result<Json<models::content::Model>, JsonApiError> {
    let tid = input.tenant_id.unwrap_or_else(Uuid::new_v4);
    info!(code = input.code, name = %input.name, tenant_id = %tid, "content_create_request");

    let new = NewContent {
        tenant_id: tid,
        code: input.code,
        category_id: input.category_id,
        img_url: input.img_url,
        name: input.name,
        introduction: input.introduction,
        body: input.body,
        voice: input.voice,
        sort: input.sort.unwrap_or(0),
        enabled: input.enabled.unwrap_or(false),
        creator: input.creator,
    };
    match content_service(&state).create(&state.db, new).await {
        Ok(m) => {
            info!(id = %m.id, tenant_id = %tid, code = m.code, "created content");
            Ok(Json(m))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
            }
            _ => {
                error!(err = %e, "create content failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", Some(e.to_string())))
            }
        },
    }
}

#[utoipa::path(
    get, path = "/admin/contents/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<models::content::Model>, StatusCode> {
    match content_service(&state).get(id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, "get content failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    get, path = "/admin/contents/by-code/{code}", tag = "content",
    params(("code" = i32, Path, description = "External content code")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_by_code(State(state): State<ServerState>, Path(code): Path<i32>) -> Result<Json<models::content::Model>, StatusCode> {
    // 查不到不算错误；存储错误按 500 上抛
    match content_service(&state).get_by_code(code).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(err = %e, code, "get content by code failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[utoipa::path(
    put, path = "/admin/contents/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content ID")),
    request_body = crate::openapi::UpdateContentInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(State(state): State<ServerState>, Path(id): Path<Uuid>, Json(input): Json<UpdateContentInput>) -> Result<Json<models::content::Model>, JsonApiError> {
    let patch = ContentPatch {
        code: input.code,
        category_id: input.category_id,
        img_url: input.img_url,
        name: input.name,
        introduction: input.introduction,
        body: input.body,
        voice: input.voice,
        sort: input.sort,
        enabled: input.enabled,
        updater: input.updater,
    };
    match content_service(&state).update(id, patch).await {
        Ok(m) => {
            info!(id = %m.id, "updated content");
            Ok(Json(m))
        }
        Err(e) => match e {
            ServiceError::Validation(_) | ServiceError::Model(_) => {
                Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(e.to_string())))
            }
            ServiceError::NotFound(_) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(e.to_string()))),
            _ => {
                error!(err = %e, "update content failed");
                Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update Failed", Some(e.to_string())))
            }
        },
    }
}

#[utoipa::path(
    delete, path = "/admin/contents/{id}", tag = "content",
    params(("id" = Uuid, Path, description = "Content ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<Uuid>) -> StatusCode {
    match content_service(&state).delete(id).await {
        Ok(true) => {
            info!(id = %id, "deleted content");
            StatusCode::NO_CONTENT
        }
        Ok(false) => StatusCode::NOT_FOUND,
        Err(e) => {
            error!(err = %e, "delete content failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
