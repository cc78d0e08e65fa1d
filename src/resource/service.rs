use std::sync::Arc;

use serde_json::Value;

use crate::database::store::{RecordFields, SharedStore};
use crate::entity::{EntityDef, WriteMode};
use crate::error::ApiError;
use crate::policy::{Action, Actor, PolicyEngine};
use crate::resource::pagination::Page;
use crate::resource::query::{ListParams, ListQuery};

/// The generic resource service: one implementation of
/// list / get / getAll / create / update / remove for every entity in the
/// registry. Authorization runs before validation and before any store
/// access, so a denied operation has no observable effect.
pub struct ResourceService {
    store: SharedStore,
    policy: Arc<dyn PolicyEngine>,
}

impl ResourceService {
    pub fn new(store: SharedStore, policy: Arc<dyn PolicyEngine>) -> Self {
        Self { store, policy }
    }

    fn authorize(
        &self,
        actor: &Actor,
        def: &'static EntityDef,
        action: Action,
    ) -> Result<(), ApiError> {
        let permission = def.permission(action);
        if self.policy.allows(actor, &permission) {
            Ok(())
        } else {
            Err(ApiError::forbidden(format!(
                "Missing permission: {}",
                permission
            )))
        }
    }

    /// Search, sort and paginate one entity collection
    pub async fn list(
        &self,
        def: &'static EntityDef,
        actor: &Actor,
        query: ListQuery,
    ) -> Result<Page, ApiError> {
        self.authorize(actor, def, Action::List)?;
        let params = ListParams::from_query(def, query)?;
        let (items, total) = self.store.select_page(def, &params).await?;
        Ok(Page::new(items, total, params.page, params.limit))
    }

    pub async fn get(
        &self,
        def: &'static EntityDef,
        actor: &Actor,
        id: i64,
    ) -> Result<RecordFields, ApiError> {
        self.authorize(actor, def, Action::View)?;
        self.store
            .select_by_id(def, id)
            .await?
            .ok_or_else(|| Self::missing(def, id))
    }

    /// Full unpaginated listing, for public reference consumption.
    /// Entities not flagged `public_all` require the view permission.
    pub async fn get_all(
        &self,
        def: &'static EntityDef,
        actor: Option<&Actor>,
    ) -> Result<Vec<RecordFields>, ApiError> {
        if !def.public_all {
            let actor = actor
                .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;
            self.authorize(actor, def, Action::View)?;
        }
        Ok(self.store.select_all(def).await?)
    }

    pub async fn create(
        &self,
        def: &'static EntityDef,
        actor: &Actor,
        payload: Value,
    ) -> Result<(RecordFields, String), ApiError> {
        self.authorize(actor, def, Action::Create)?;
        let fields = crate::entity::fields::validate_payload(def.fields, &payload, WriteMode::Create)?;
        let record = self.store.insert(def, fields).await?;
        Ok((record, def.created_message()))
    }

    /// Applies only the supplied fields; everything else keeps its prior value
    pub async fn update(
        &self,
        def: &'static EntityDef,
        actor: &Actor,
        id: i64,
        payload: Value,
    ) -> Result<(RecordFields, String), ApiError> {
        self.authorize(actor, def, Action::Edit)?;
        let fields = crate::entity::fields::validate_payload(def.fields, &payload, WriteMode::Update)?;
        let record = self
            .store
            .update(def, id, fields)
            .await?
            .ok_or_else(|| Self::missing(def, id))?;
        Ok((record, def.updated_message()))
    }

    pub async fn remove(
        &self,
        def: &'static EntityDef,
        actor: &Actor,
        id: i64,
    ) -> Result<String, ApiError> {
        self.authorize(actor, def, Action::Delete)?;
        if !self.store.delete(def, id).await? {
            return Err(Self::missing(def, id));
        }
        Ok(def.deleted_message())
    }

    fn missing(def: &'static EntityDef, id: i64) -> ApiError {
        ApiError::not_found(format!("No {} record with id {}", def.slug, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::entity::BANNERS;
    use crate::policy::CapabilityPolicy;
    use serde_json::json;

    fn service() -> ResourceService {
        ResourceService::new(Arc::new(MemoryStore::new()), Arc::new(CapabilityPolicy))
    }

    fn admin() -> Actor {
        Actor::new("admin", vec!["*".to_string()])
    }

    fn reader() -> Actor {
        Actor::new("reader", vec!["banner_listar".to_string()])
    }

    #[tokio::test]
    async fn denied_create_leaves_no_trace() {
        let svc = service();
        let err = svc
            .create(&BANNERS, &reader(), json!({"title": "Promo"}))
            .await
            .expect_err("reader cannot create");
        assert_eq!(err.status_code(), 403);

        let page = svc
            .list(&BANNERS, &admin(), ListQuery::default())
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service();
        let (record, message) = svc
            .create(
                &BANNERS,
                &admin(),
                json!({"title": "Promo", "subtitle": "Save now", "image": "x.png"}),
            )
            .await
            .unwrap();
        assert_eq!(message, "Banner creado Satisfactoriamente");
        let id = record.get("id").and_then(Value::as_i64).unwrap();

        let fetched = svc.get(&BANNERS, &admin(), id).await.unwrap();
        assert_eq!(fetched.get("title").unwrap(), "Promo");
        assert_eq!(fetched.get("subtitle").unwrap(), "Save now");
        assert_eq!(fetched.get("image").unwrap(), "x.png");
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let svc = service();
        let (record, _) = svc
            .create(
                &BANNERS,
                &admin(),
                json!({"title": "Promo", "subtitle": "Save now"}),
            )
            .await
            .unwrap();
        let id = record.get("id").and_then(Value::as_i64).unwrap();

        let (updated, message) = svc
            .update(&BANNERS, &admin(), id, json!({"subtitle": "Last week"}))
            .await
            .unwrap();
        assert_eq!(message, "Banner actualizado Satisfactoriamente");
        assert_eq!(updated.get("title").unwrap(), "Promo");
        assert_eq!(updated.get("subtitle").unwrap(), "Last week");
    }

    #[tokio::test]
    async fn remove_then_get_is_not_found() {
        let svc = service();
        let (record, _) = svc
            .create(&BANNERS, &admin(), json!({"title": "Promo"}))
            .await
            .unwrap();
        let id = record.get("id").and_then(Value::as_i64).unwrap();

        let message = svc.remove(&BANNERS, &admin(), id).await.unwrap();
        assert_eq!(message, "Banner eliminado Satisfactoriamente");
        assert_eq!(
            svc.get(&BANNERS, &admin(), id).await.unwrap_err().status_code(),
            404
        );
        assert_eq!(
            svc.remove(&BANNERS, &admin(), id)
                .await
                .unwrap_err()
                .status_code(),
            404
        );
    }

    #[tokio::test]
    async fn get_all_is_open_for_public_entities() {
        let svc = service();
        svc.create(&BANNERS, &admin(), json!({"title": "Promo"}))
            .await
            .unwrap();
        let all = svc.get_all(&BANNERS, None).await.unwrap();
        assert_eq!(all.len(), 1);
    }
}
