use sea_orm::DatabaseConnection;

use crate::errors::ServiceError;
use models::sys_param;

/// Read one parameter value by code; absence is a normal condition.
pub async fn get_value(db: &DatabaseConnection, code: &str) -> Result<Option<String>, ServiceError> {
    Ok(sys_param::get_by_code(db, code).await?.map(|p| p.value))
}

/// Create or replace a parameter.
pub async fn set_value(
    db: &DatabaseConnection,
    code: &str,
    value: &str,
    remark: Option<&str>,
) -> Result<sys_param::Model, ServiceError> {
    let saved = sys_param::upsert(db, code, value, remark).await?;
    Ok(saved)
}

/// List all parameters ordered by code.
pub async fn list_params(db: &DatabaseConnection) -> Result<Vec<sys_param::Model>, ServiceError> {
    Ok(sys_param::list(db).await?)
}

/// Delete a parameter; returns true if a row was removed.
pub async fn delete_param(db: &DatabaseConnection, code: &str) -> Result<bool, ServiceError> {
    Ok(sys_param::delete_by_code(db, code).await?)
}
