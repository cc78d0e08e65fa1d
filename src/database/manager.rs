use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config;

use super::store::StoreError;

/// Build the connection pool from `DATABASE_URL`.
///
/// `PADRON_DB_NAME` swaps the database name in the URL path, so one
/// connection string can serve several deployments.
pub async fn connect_from_env() -> Result<PgPool, StoreError> {
    let connection_string = build_connection_string()?;
    let db_config = &config::config().database;

    let pool = PgPoolOptions::new()
        .max_connections(db_config.max_connections)
        .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
        .connect(&connection_string)
        .await?;

    tracing::info!("Connected database pool ({} max connections)", db_config.max_connections);
    Ok(pool)
}

fn build_connection_string() -> Result<String, StoreError> {
    let base = std::env::var("DATABASE_URL")
        .map_err(|_| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;

    let mut url = url::Url::parse(&base)
        .map_err(|_| StoreError::Unavailable("DATABASE_URL is not a valid URL".to_string()))?;

    if let Ok(db_name) = std::env::var("PADRON_DB_NAME") {
        if !is_valid_db_name(&db_name) {
            return Err(StoreError::Unavailable(format!(
                "Invalid database name: {}",
                db_name
            )));
        }
        url.set_path(&format!("/{}", db_name));
    }

    Ok(url.to_string())
}

fn is_valid_db_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.chars().next().map(|c| !c.is_ascii_digit()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_name_validation() {
        assert!(is_valid_db_name("padron_main"));
        assert!(is_valid_db_name("padron2"));
        assert!(!is_valid_db_name(""));
        assert!(!is_valid_db_name("2padron"));
        assert!(!is_valid_db_name("padron;drop"));
    }
}
