use sqlx::PgPool;

use crate::entity::{EntityDef, ENTITIES};

use super::store::StoreError;

/// Generate the CREATE TABLE statement for one entity. All schema fields
/// are TEXT; kind constraints are enforced at the validation layer.
pub fn create_table_ddl(def: &EntityDef) -> String {
    let mut columns = vec!["\"id\" BIGSERIAL PRIMARY KEY".to_string()];
    for field in def.fields {
        columns.push(format!("\"{}\" TEXT", field.name));
    }
    columns.push("\"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now()".to_string());
    columns.push("\"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT now()".to_string());

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" ({})",
        def.table,
        columns.join(", ")
    )
}

/// Create any missing entity tables at startup
pub async fn ensure_tables(pool: &PgPool) -> Result<(), StoreError> {
    for def in ENTITIES {
        let ddl = create_table_ddl(def);
        sqlx::query(&ddl).execute(pool).await?;
        tracing::info!("Ensured table '{}' for /v1/{}", def.table, def.slug);
    }
    Ok(())
}
