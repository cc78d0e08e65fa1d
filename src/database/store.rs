use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::EntityDef;
use crate::resource::query::ListParams;

/// Records travel as wire-ready JSON objects: id, schema fields, timestamps
pub type RecordFields = serde_json::Map<String, serde_json::Value>;

/// Errors from storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The persistence seam of the resource service.
///
/// `select_page` receives parameters that the service has already
/// normalized: positive page/limit and a sort field from the entity's
/// allow-list. Implementations order by that field with an id-ascending
/// tie-break so listings are deterministic.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn select_page(
        &self,
        def: &'static EntityDef,
        params: &ListParams,
    ) -> Result<(Vec<RecordFields>, i64), StoreError>;

    async fn select_all(&self, def: &'static EntityDef) -> Result<Vec<RecordFields>, StoreError>;

    async fn select_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<RecordFields>, StoreError>;

    async fn insert(
        &self,
        def: &'static EntityDef,
        fields: RecordFields,
    ) -> Result<RecordFields, StoreError>;

    /// Returns `None` when the id does not exist
    async fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        fields: RecordFields,
    ) -> Result<Option<RecordFields>, StoreError>;

    /// Returns whether a record was removed
    async fn delete(&self, def: &'static EntityDef, id: i64) -> Result<bool, StoreError>;

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

pub type SharedStore = Arc<dyn ResourceStore>;
