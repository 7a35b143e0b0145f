pub mod repository;
pub mod service;

pub use repository::{ContentRepository, SeaOrmContentRepository};
pub use service::ContentService;

use uuid::Uuid;

/// Input for inserting a content record.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub tenant_id: Uuid,
    pub code: i32,
    pub category_id: Option<i32>,
    pub img_url: Option<String>,
    pub name: String,
    pub introduction: Option<String>,
    pub body: Option<String>,
    pub voice: Option<String>,
    pub sort: i32,
    pub enabled: bool,
    pub creator: Option<String>,
}

/// Field changes applied to an existing record; `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
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
