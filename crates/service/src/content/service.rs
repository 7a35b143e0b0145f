use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::content::{ContentPatch, ContentRepository, NewContent};
use crate::errors::ServiceError;
use crate::tenant_service;
use common::pagination::Pagination;

/// Application service encapsulating content business rules:
/// validation, tenant existence policy, audit fields.
pub struct ContentService<R: ContentRepository> {
    repo: Arc<R>,
}

impl<R: ContentRepository> ContentService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create with policy: auto-create tenant if missing.
    #[instrument(skip(self, db, new), fields(tenant_id = %new.tenant_id, code = new.code))]
    pub async fn create(&self, db: &DatabaseConnection, new: NewContent) -> Result<models::content::Model, ServiceError> {
        models::content::validate_name(&new.name)?;
        models::content::validate_code(new.code)?;
        tenant_service::ensure_tenant(db, new.tenant_id).await?;
        let created = self.repo.insert(new).await?;
        info!(id = %created.id, code = created.code, "content_created");
        Ok(created)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<models::content::Model>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Lookup by external code; absent result is not an error.
    pub async fn get_by_code(&self, code: i32) -> Result<Option<models::content::Model>, ServiceError> {
        self.repo.find_by_code(code).await
    }

    pub async fn list(&self, tenant_id: Option<Uuid>, page: Pagination) -> Result<Vec<models::content::Model>, ServiceError> {
        self.repo.list(tenant_id, page).await
    }

    pub async fn update(&self, id: Uuid, patch: ContentPatch) -> Result<models::content::Model, ServiceError> {
        if let Some(name) = &patch.name {
            models::content::validate_name(name)?;
        }
        if let Some(code) = patch.code {
            models::content::validate_code(code)?;
        }
        self.repo.update(id, patch).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let deleted = self.repo.soft_delete(id).await?;
        if deleted {
            info!(%id, "content_soft_deleted");
        }
        Ok(deleted)
    }
}
