use anyhow::Context;

use crate::database::{ddl, manager};

pub async fn handle() -> anyhow::Result<()> {
    let pool = manager::connect_from_env()
        .await
        .context("failed to connect database")?;

    ddl::ensure_tables(&pool)
        .await
        .context("failed to create tables")?;

    println!("Entity tables are ready");
    Ok(())
}
