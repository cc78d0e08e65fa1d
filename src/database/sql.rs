use serde_json::Value;

use crate::entity::EntityDef;
use crate::resource::query::ListParams;

use super::store::RecordFields;

/// A generated statement plus its bound parameters.
///
/// Identifiers (table, columns) come exclusively from the static entity
/// registry; everything client-supplied is bound.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub binds: Vec<Value>,
}

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident)
}

/// Escape LIKE metacharacters so the search term matches literally
fn like_pattern(term: &str) -> String {
    let escaped: String = term
        .chars()
        .flat_map(|c| match c {
            '\\' | '%' | '_' => vec!['\\', c],
            _ => vec![c],
        })
        .collect();
    format!("%{}%", escaped)
}

fn search_clause(def: &EntityDef, next_param: usize) -> String {
    let alternatives: Vec<String> = def
        .searchable
        .iter()
        .map(|field| format!("{} ILIKE ${} ESCAPE '\\'", quote(field), next_param))
        .collect();
    format!("({})", alternatives.join(" OR "))
}

fn order_clause(params: &ListParams) -> String {
    if params.sort == "id" {
        format!("ORDER BY {} {}", quote("id"), params.order.to_sql())
    } else {
        format!(
            "ORDER BY {} {}, {} ASC",
            quote(params.sort),
            params.order.to_sql(),
            quote("id")
        )
    }
}

/// SELECT for one page, rows rendered to JSON by the database
pub fn select_page(def: &'static EntityDef, params: &ListParams) -> SqlQuery {
    let mut binds = Vec::new();
    let where_clause = match &params.search {
        Some(term) => {
            binds.push(Value::String(like_pattern(term)));
            format!("WHERE {}", search_clause(def, 1))
        }
        None => String::new(),
    };

    let sql = [
        "SELECT row_to_json(t) AS row FROM (SELECT * FROM".to_string(),
        quote(def.table),
        where_clause,
        order_clause(params),
        format!("LIMIT {} OFFSET {}", params.limit, params.offset()),
        ") t".to_string(),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    SqlQuery { sql, binds }
}

/// COUNT over the same narrowed set as `select_page`
pub fn count(def: &'static EntityDef, search: Option<&str>) -> SqlQuery {
    match search {
        Some(term) => SqlQuery {
            sql: format!(
                "SELECT COUNT(*) AS count FROM {} WHERE {}",
                quote(def.table),
                search_clause(def, 1)
            ),
            binds: vec![Value::String(like_pattern(term))],
        },
        None => SqlQuery {
            sql: format!("SELECT COUNT(*) AS count FROM {}", quote(def.table)),
            binds: vec![],
        },
    }
}

pub fn select_all(def: &'static EntityDef) -> String {
    format!(
        "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} ORDER BY \"id\" ASC) t",
        quote(def.table)
    )
}

pub fn select_by_id(def: &'static EntityDef) -> String {
    format!(
        "SELECT row_to_json(t) AS row FROM (SELECT * FROM {} WHERE \"id\" = $1) t",
        quote(def.table)
    )
}

pub fn insert(def: &'static EntityDef, fields: &RecordFields) -> SqlQuery {
    let mut columns = Vec::new();
    let mut placeholders = Vec::new();
    let mut binds = Vec::new();

    for (index, (name, value)) in fields.iter().enumerate() {
        columns.push(quote(name));
        placeholders.push(format!("${}", index + 1));
        binds.push(value.clone());
    }

    let sql = format!(
        "INSERT INTO {} AS t ({}) VALUES ({}) RETURNING row_to_json(t) AS row",
        quote(def.table),
        columns.join(", "),
        placeholders.join(", ")
    );

    SqlQuery { sql, binds }
}

/// UPDATE of the supplied fields only; the id is the final bind
pub fn update(def: &'static EntityDef, fields: &RecordFields) -> SqlQuery {
    let mut assignments = Vec::new();
    let mut binds = Vec::new();

    for (index, (name, value)) in fields.iter().enumerate() {
        assignments.push(format!("{} = ${}", quote(name), index + 1));
        binds.push(value.clone());
    }
    assignments.push("\"updated_at\" = now()".to_string());

    let sql = format!(
        "UPDATE {} AS t SET {} WHERE \"id\" = ${} RETURNING row_to_json(t) AS row",
        quote(def.table),
        assignments.join(", "),
        binds.len() + 1
    );

    SqlQuery { sql, binds }
}

pub fn delete(def: &'static EntityDef) -> String {
    format!("DELETE FROM {} WHERE \"id\" = $1", quote(def.table))
}
