use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::entity::EntityDef;
use crate::resource::query::{ListParams, SortOrder};

use super::store::{RecordFields, ResourceStore, StoreError};

/// In-memory resource store.
///
/// Backs the test suite and storage-less local runs. Implements the same
/// search -> sort -> paginate pipeline as the Postgres store, so listing
/// semantics can be exercised without a database.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<&'static str, Table>>,
}

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, RecordFields>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(def: &EntityDef, row: &RecordFields, term: &str) -> bool {
        let needle = term.to_lowercase();
        def.searchable.iter().any(|field| {
            row.get(*field)
                .and_then(Value::as_str)
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    fn compare(a: &RecordFields, b: &RecordFields, field: &str) -> Ordering {
        let left = a.get(field).unwrap_or(&Value::Null);
        let right = b.get(field).unwrap_or(&Value::Null);
        match (left, right) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Null, _) => Ordering::Less,
            (_, Value::Null) => Ordering::Greater,
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (x, y) => x.to_string().cmp(&y.to_string()),
        }
    }

    fn row_id(row: &RecordFields) -> i64 {
        row.get("id").and_then(Value::as_i64).unwrap_or(0)
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn select_page(
        &self,
        def: &'static EntityDef,
        params: &ListParams,
    ) -> Result<(Vec<RecordFields>, i64), StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(def.table).map(|t| &t.rows);

        let mut matching: Vec<RecordFields> = rows
            .map(|rows| {
                rows.values()
                    .filter(|row| match &params.search {
                        Some(term) => Self::matches(def, row, term),
                        None => true,
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let total = matching.len() as i64;

        matching.sort_by(|a, b| {
            let primary = Self::compare(a, b, params.sort);
            let primary = match params.order {
                SortOrder::Asc => primary,
                SortOrder::Desc => primary.reverse(),
            };
            // Ties break by id ascending regardless of direction
            primary.then_with(|| Self::row_id(a).cmp(&Self::row_id(b)))
        });

        let offset = params.offset() as usize;
        let items = matching
            .into_iter()
            .skip(offset)
            .take(params.limit as usize)
            .collect();

        Ok((items, total))
    }

    async fn select_all(&self, def: &'static EntityDef) -> Result<Vec<RecordFields>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(def.table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn select_by_id(
        &self,
        def: &'static EntityDef,
        id: i64,
    ) -> Result<Option<RecordFields>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.get(def.table).and_then(|t| t.rows.get(&id).cloned()))
    }

    async fn insert(
        &self,
        def: &'static EntityDef,
        fields: RecordFields,
    ) -> Result<RecordFields, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(def.table).or_default();
        table.next_id += 1;
        let id = table.next_id;

        let now = Utc::now().to_rfc3339();
        let mut record = RecordFields::new();
        record.insert("id".to_string(), Value::from(id));
        for (key, value) in fields {
            record.insert(key, value);
        }
        record.insert("created_at".to_string(), Value::from(now.clone()));
        record.insert("updated_at".to_string(), Value::from(now));

        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        def: &'static EntityDef,
        id: i64,
        fields: RecordFields,
    ) -> Result<Option<RecordFields>, StoreError> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(def.table).or_default();
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        for (key, value) in fields {
            row.insert(key, value);
        }
        row.insert(
            "updated_at".to_string(),
            Value::from(Utc::now().to_rfc3339()),
        );
        Ok(Some(row.clone()))
    }

    async fn delete(&self, def: &'static EntityDef, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .get_mut(def.table)
            .map(|t| t.rows.remove(&id).is_some())
            .unwrap_or(false))
    }
}
