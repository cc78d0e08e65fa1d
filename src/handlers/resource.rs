use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde_json::Value;

use crate::database::store::RecordFields;
use crate::entity::{self, EntityDef};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::policy::Actor;
use crate::resource::{ListQuery, Page, ResourceService};

fn resolve_entity(slug: &str) -> Result<&'static EntityDef, ApiError> {
    entity::resolve(slug)
        .ok_or_else(|| ApiError::not_found(format!("Unknown resource type: {}", slug)))
}

/// GET /v1/:entity - Search, sort and paginate the collection
pub async fn index(
    Path(entity): Path<String>,
    Query(query): Query<ListQuery>,
    Extension(service): Extension<Arc<ResourceService>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Page> {
    let def = resolve_entity(&entity)?;
    let page = service.list(def, &actor, query).await?;
    Ok(ApiResponse::success(page))
}

/// GET /v1/:entity/all - Full reference listing, no pagination
pub async fn all(
    Path(entity): Path<String>,
    Extension(service): Extension<Arc<ResourceService>>,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Vec<RecordFields>> {
    let def = resolve_entity(&entity)?;
    let records = service
        .get_all(def, actor.as_ref().map(|Extension(a)| a))
        .await?;
    Ok(ApiResponse::success(records))
}

/// GET /v1/:entity/:id - Fetch a single record
pub async fn show(
    Path((entity, id)): Path<(String, i64)>,
    Extension(service): Extension<Arc<ResourceService>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<RecordFields> {
    let def = resolve_entity(&entity)?;
    let record = service.get(def, &actor, id).await?;
    Ok(ApiResponse::success(record))
}

/// POST /v1/:entity - Create a record from a validated payload
pub async fn store(
    Path(entity): Path<String>,
    Extension(service): Extension<Arc<ResourceService>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<Value>,
) -> ApiResult<RecordFields> {
    let def = resolve_entity(&entity)?;
    let (record, message) = service.create(def, &actor, payload).await?;
    Ok(ApiResponse::created(record).message(message))
}

/// PUT /v1/:entity/:id - Update the supplied fields of a record
pub async fn update(
    Path((entity, id)): Path<(String, i64)>,
    Extension(service): Extension<Arc<ResourceService>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<Value>,
) -> ApiResult<RecordFields> {
    let def = resolve_entity(&entity)?;
    let (record, message) = service.update(def, &actor, id, payload).await?;
    Ok(ApiResponse::success(record).message(message))
}

/// DELETE /v1/:entity/:id - Remove a record
pub async fn destroy(
    Path((entity, id)): Path<(String, i64)>,
    Extension(service): Extension<Arc<ResourceService>>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<()> {
    let def = resolve_entity(&entity)?;
    let message = service.remove(def, &actor, id).await?;
    Ok(ApiResponse::message_only(message))
}
