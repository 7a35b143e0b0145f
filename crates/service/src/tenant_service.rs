use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::tenant;

/// Create a tenant.
pub async fn create_tenant(db: &DatabaseConnection, name: &str) -> Result<tenant::Model, ServiceError> {
    let created = tenant::create(db, name).await?;
    Ok(created)
}

/// Get tenant by id.
pub async fn get_tenant(db: &DatabaseConnection, id: Uuid) -> Result<Option<tenant::Model>, ServiceError> {
    Ok(tenant::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?)
}

/// Update tenant name.
pub async fn update_tenant_name(db: &DatabaseConnection, id: Uuid, name: &str) -> Result<tenant::Model, ServiceError> {
    tenant::validate_name(name)?;
    let mut am: tenant::ActiveModel = tenant::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("tenant"))?
        .into();
    am.name = Set(name.to_string());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Hard delete tenant; content rows cascade.
pub async fn delete_tenant(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    tenant::Entity::delete_by_id(id).exec(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(())
}

/// Ensure a tenant row exists, creating a placeholder one if missing.
pub async fn ensure_tenant(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let maybe = tenant::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    if maybe.is_none() {
        let am = tenant::ActiveModel {
            id: Set(id),
            name: Set(format!("auto-tenant-{}", id)),
            created_at: Set(Utc::now().into()),
        };
        am.insert(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
        tracing::info!(tenant_id = %id, "auto_created_tenant");
    }
    Ok(())
}
