//! Issuance, lookup and revocation of API keys backed by the `api_keys` table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use uuid::Uuid;

use crate::database::models::api_keys;
use crate::errors::AppError;

pub async fn issue(db: &DatabaseConnection, name: &str) -> Result<api_keys::Model, AppError> {
    let new_key = api_keys::ActiveModel {
        key: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        latest_query_date: Set(None),
        total_queries: Set(0),
        ..Default::default()
    };

    let created = new_key.insert(db).await?;
    Ok(created)
}

/// Checks a presented key value and records the use.
pub async fn authorize(
    db: &DatabaseConnection,
    key_value: &str,
) -> Result<api_keys::Model, AppError> {
    let key = api_keys::Entity::find()
        .filter(api_keys::Column::Key.eq(key_value))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Forbidden("Invalid API key".to_string()))?;

    if !key.is_active {
        return Err(AppError::Forbidden("API key has been revoked".to_string()));
    }

    let next_total = key.total_queries + 1;
    let mut active = key.into_active_model();
    active.latest_query_date = Set(Some(chrono::Utc::now()));
    active.total_queries = Set(next_total);
    let updated = active.update(db).await?;

    Ok(updated)
}

/// Deactivates a key. Already-revoked keys pass through untouched.
pub async fn revoke(db: &DatabaseConnection, id: i32) -> Result<api_keys::Model, AppError> {
    let key = api_keys::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("API key with id {} not found", id)))?;

    if !key.is_active {
        return Ok(key);
    }

    let mut active = key.into_active_model();
    active.is_active = Set(false);
    let updated = active.update(db).await?;
    Ok(updated)
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<api_keys::Model>, AppError> {
    let keys = api_keys::Entity::find().all(db).await?;
    Ok(keys)
}
