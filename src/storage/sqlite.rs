//! `SQLite` backend - one row per key in the `stored_state` table.

use crate::{
    config::database,
    core::store::StateBackend,
    entities::{StoredState, stored_state},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Backend storing values in a `SeaORM`-managed `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    db: DatabaseConnection,
}

impl SqliteBackend {
    /// Wraps an existing connection. Tables must already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connects to `database_url` and creates missing tables.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let db = database::create_connection(database_url).await?;
        database::create_tables(&db).await?;
        Ok(Self::new(db))
    }
}

impl StateBackend for SqliteBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let row = StoredState::find()
            .filter(stored_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(row.map(|r| r.value))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let existing = StoredState::find()
            .filter(stored_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        if let Some(row) = existing {
            let mut active_model: stored_state::ActiveModel = row.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_row = stored_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_row.insert(&self.db).await?;
        }

        debug!(key, bytes = value.len(), "Stored state row");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_read_missing_key() -> Result<()> {
        let backend = SqliteBackend::new(setup_test_db().await?);
        assert_eq!(backend.read("nothing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_write_updates_existing_row() -> Result<()> {
        let db = setup_test_db().await?;
        let backend = SqliteBackend::new(db.clone());

        backend.write("snapshot", "one").await?;
        backend.write("snapshot", "two").await?;
        assert_eq!(backend.read("snapshot").await?, Some("two".to_string()));

        // Verify only one record exists
        let count = StoredState::find()
            .filter(stored_state::Column::Key.eq("snapshot"))
            .count(&db)
            .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_keys_are_independent() -> Result<()> {
        let backend = SqliteBackend::new(setup_test_db().await?);
        backend.write("a", "1").await?;
        backend.write("b", "2").await?;

        assert_eq!(backend.read("a").await?, Some("1".to_string()));
        assert_eq!(backend.read("b").await?, Some("2".to_string()));
        Ok(())
    }
}
