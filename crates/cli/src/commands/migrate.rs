//! PostgreSQL schema setup.
//!
//! Idempotent: every statement is `CREATE ... IF NOT EXISTS`.

use anyhow::Result;
use liftlog_core::AppConfig;
use liftlog_storage::PgStorage;

pub(crate) async fn run(config: &AppConfig) -> Result<()> {
    let url = config.database_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("LIFTLOG_DATABASE_URL or DATABASE_URL must be set for migration")
    })?;
    let storage = PgStorage::new(url).await?;
    storage.migrate().await?;
    println!("Schema is up to date.");
    Ok(())
}
