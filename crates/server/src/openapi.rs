use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct CreateContentInputDoc {
    pub tenant_id: Option<Uuid>,
    pub code: i32,
    pub category_id: Option<i32>,
    pub img_url: Option<String>,
    pub name: String,
    pub introduction: Option<String>,
    pub body: Option<String>,
    pub voice: Option<String>,
    pub sort: Option<i32>,
    pub enabled: Option<bool>,
    pub creator: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct UpdateContentInputDoc {
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

#[derive(utoipa::ToSchema)]
pub struct UpsertParamInputDoc {
    pub code: String,
    pub value: String,
    pub remark: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct RetrievalInputDoc {
    pub question: String,
    pub dataset_ids: Vec<String>,
    pub top_k: Option<usize>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::contents::list,
        crate::routes::contents::create,
        crate::routes::contents::get,
        crate::routes::contents::get_by_code,
        crate::routes::contents::update,
        crate::routes::contents::delete,
        crate::routes::ragflow::datasets,
        crate::routes::ragflow::retrieval,
        crate::routes::ragflow::reload,
        crate::routes::params::list,
        crate::routes::params::upsert,
        crate::routes::params::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CreateContentInputDoc,
            UpdateContentInputDoc,
            UpsertParamInputDoc,
            RetrievalInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "content"),
        (name = "ragflow"),
        (name = "params")
    )
)]
pub struct ApiDoc;
