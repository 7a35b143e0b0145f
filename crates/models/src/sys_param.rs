use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

/// Key-value configuration row queried at runtime for feature settings.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sys_param")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code: String,
    pub value: String,
    pub remark: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_code(code: &str) -> Result<(), errors::ModelError> {
    if code.trim().is_empty() {
        return Err(errors::ModelError::Validation("param code required".into()));
    }
    Ok(())
}

pub async fn upsert(
    db: &DatabaseConnection,
    code: &str,
    value: &str,
    remark: Option<&str>,
) -> Result<Model, errors::ModelError> {
    validate_code(code)?;
    let now = Utc::now().into();
    if let Some(existing) = Entity::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
    {
        let mut am: ActiveModel = existing.into();
        am.value = Set(value.to_string());
        if let Some(r) = remark { am.remark = Set(Some(r.to_string())); }
        am.updated_at = Set(now);
        am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            value: Set(value.to_string()),
            remark: Set(remark.map(|r| r.to_string())),
            updated_at: Set(now),
        };
        am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    }
}

pub async fn get_by_code(db: &DatabaseConnection, code: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, errors::ModelError> {
    Entity::find()
        .order_by_asc(Column::Code)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn delete_by_code(db: &DatabaseConnection, code: &str) -> Result<bool, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::Code.eq(code))
        .exec(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(res.rows_affected > 0)
}
