use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgArguments, PgPool, Row};

use crate::entity::EntityDef;
use crate::resource::query::ListParams;

use super::sql;
use super::store::{RecordFields, ResourceStore, StoreError};

/// Postgres-backed resource store.
///
/// Statements come from `database::sql` (registry identifiers, bound
/// values) and rows are rendered to JSON inside the database, so results
/// are wire-ready without per-entity row types.
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn bind<'q>(
        query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
        value: &'q Value,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
        match value {
            Value::Null => {
                let none: Option<String> = None;
                query.bind(none)
            }
            Value::String(s) => query.bind(s.as_str()),
            Value::Bool(b) => query.bind(b.to_string()),
            other => query.bind(other.to_string()),
        }
    }

    fn row_fields(row: sqlx::postgres::PgRow) -> Result<RecordFields, StoreError> {
        let value: Value = row.try_get("row")?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(StoreError::Query(format!(
                "expected JSON object row, got {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn select_page(
        &self,
        def: &'static EntityDef,
        params: &ListParams,
    ) -> Result<(Vec<RecordFields>, i64), StoreError> {
        let count_query = sql::count(def, params.search.as_deref());
        let mut counting = sqlx::query(&count_query.sql);
        for bind in &count_query.binds {
            counting = Self::bind(counting, bind);
        }
        let total: i64 = counting.fetch_one(&self.pool).await?.try_get("count")?;

        let page_query = sql::select_page(def, params);
        let mut selecting = sqlx::query(&page_query.sql);
        for bind in &page_query.binds {
            selecting = Self::bind(selecting, bind);
        }
        let rows = selecting.fetch_all(&self.pool).await?;
        let items = rows
            .into_iter()
            .map(Self::row_fields)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((items, total))
    }

    async fn select_all(&self, def: &'static EntityDef) -> Result<Vec<RecordFields>, StoreError> {
        let rows = sqlx::query(&sql::select_all(def)).fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_fields).collect()
    }

    async fn select_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<RecordFields>, StoreError> {
        let row = sqlx::query(&sql::select_by_id(def))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Self::row_fields).transpose()
    }

    async fn insert(
        &self,
        def: &'static EntityDef,
        fields: RecordFields,
    ) -> Result<RecordFields, StoreError> {
        let query = sql::insert(def, &fields);
        let mut inserting = sqlx::query(&query.sql);
        for bind in &query.binds {
            inserting = Self::bind(inserting, bind);
        }
        let row = inserting.fetch_one(&self.pool).await?;
        Self::row_fields(row)
    }

    async fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        fields: RecordFields,
    ) -> Result<Option<RecordFields>, StoreError> {
        let query = sql::update(def, &fields);
        let mut updating = sqlx::query(&query.sql);
        for bind in &query.binds {
            updating = Self::bind(updating, bind);
        }
        let row = updating.bind(id).fetch_optional(&self.pool).await?;
        row.map(Self::row_fields).transpose()
    }

    async fn delete(&self, def: &'static EntityDef, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(&sql::delete(def))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
