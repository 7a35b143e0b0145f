use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use crate::content::{ContentPatch, NewContent};
use crate::errors::ServiceError;
use common::pagination::Pagination;
use models::content;

/// Persistence capability for content records. Every read excludes
/// soft-deleted rows.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<content::Model>, ServiceError>;
    /// First live row carrying the code; uniqueness is not guaranteed.
    async fn find_by_code(&self, code: i32) -> Result<Option<content::Model>, ServiceError>;
    async fn list(&self, tenant_id: Option<Uuid>, page: Pagination) -> Result<Vec<content::Model>, ServiceError>;
    async fn insert(&self, new: NewContent) -> Result<content::Model, ServiceError>;
    async fn update(&self, id: Uuid, patch: ContentPatch) -> Result<content::Model, ServiceError>;
    /// Mark a row deleted; returns false when no live row matched.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmContentRepository {
    pub db: DatabaseConnection,
}

fn live() -> Select<content::Entity> {
    content::Entity::find().filter(content::Column::DeletedAt.is_null())
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<content::Model>, ServiceError> {
        live()
            .filter(content::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn find_by_code(&self, code: i32) -> Result<Option<content::Model>, ServiceError> {
        // code 不保证唯一，按创建时间取第一条，保证结果可复现
        live()
            .filter(content::Column::Code.eq(code))
            .order_by_asc(content::Column::CreatedAt)
            .order_by_asc(content::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn list(&self, tenant_id: Option<Uuid>, page: Pagination) -> Result<Vec<content::Model>, ServiceError> {
        let (page_idx, per_page) = page.normalize();
        let mut finder = live();
        if let Some(tid) = tenant_id {
            finder = finder.filter(content::Column::TenantId.eq(tid));
        }
        finder
            .order_by_asc(content::Column::Sort)
            .order_by_asc(content::Column::CreatedAt)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn insert(&self, new: NewContent) -> Result<content::Model, ServiceError> {
        let now = Utc::now().into();
        let am = content::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(new.tenant_id),
            code: Set(new.code),
            category_id: Set(new.category_id),
            img_url: Set(new.img_url),
            name: Set(new.name),
            introduction: Set(new.introduction),
            body: Set(new.body),
            voice: Set(new.voice),
            sort: Set(new.sort),
            enabled: Set(new.enabled),
            creator: Set(new.creator),
            updater: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };
        am.insert(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn update(&self, id: Uuid, patch: ContentPatch) -> Result<content::Model, ServiceError> {
        let current = self.find_by_id(id).await?;
        let Some(existing) = current else { return Err(ServiceError::not_found("content")) };
        let mut am: content::ActiveModel = existing.into();
        if let Some(c) = patch.code { am.code = Set(c); }
        if let Some(c) = patch.category_id { am.category_id = Set(Some(c)); }
        if let Some(u) = patch.img_url { am.img_url = Set(Some(u)); }
        if let Some(n) = patch.name { am.name = Set(n); }
        if let Some(i) = patch.introduction { am.introduction = Set(Some(i)); }
        if let Some(b) = patch.body { am.body = Set(Some(b)); }
        if let Some(v) = patch.voice { am.voice = Set(Some(v)); }
        if let Some(s) = patch.sort { am.sort = Set(s); }
        if let Some(e) = patch.enabled { am.enabled = Set(e); }
        if let Some(u) = patch.updater { am.updater = Set(Some(u)); }
        am.updated_at = Set(Utc::now().into());
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let current = self.find_by_id(id).await?;
        let Some(existing) = current else { return Ok(false) };
        let mut am: content::ActiveModel = existing.into();
        am.deleted_at = Set(Some(Utc::now().into()));
        am.update(&self.db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        Ok(true)
    }
}
