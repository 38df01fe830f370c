//! Database configuration module.
//!
//! Opens the `SQLite` database behind the `SQLite` storage backend and creates
//! its tables from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs.

use crate::entities::StoredState;
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::debug;

/// Connects to `database_url`, creating the parent directory of a file-backed
/// `SQLite` database if needed.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(parent) = sqlite_file_path(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    debug!(database_url, "Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut stored_state_table = schema.create_table_from_entity(StoredState);
    stored_state_table.if_not_exists();

    db.execute(builder.build(&stored_state_table)).await?;

    Ok(())
}

/// Filesystem path of a `sqlite://` URL, or `None` for in-memory databases.
fn sqlite_file_path(database_url: &str) -> Option<&Path> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path.contains(":memory:") {
        None
    } else {
        Some(Path::new(path))
    }
}
