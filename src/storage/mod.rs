//! Storage backends for the usage store.

/// One JSON file per key
pub mod file;
/// In-process map
pub mod memory;
/// `SeaORM` over `SQLite`
pub mod sqlite;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::{
    config::settings::{BackendKind, Settings},
    core::store::StateBackend,
    errors::Result,
};
use tracing::info;

/// Backend chosen at runtime from [`Settings`].
#[derive(Debug)]
pub enum AnyBackend {
    /// See [`SqliteBackend`]
    Sqlite(SqliteBackend),
    /// See [`FileBackend`]
    File(FileBackend),
    /// See [`MemoryBackend`]
    Memory(MemoryBackend),
}

impl AnyBackend {
    /// Opens the backend selected by `settings`.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let backend = match settings.backend {
            BackendKind::Sqlite => {
                Self::Sqlite(SqliteBackend::connect(&settings.database_url).await?)
            }
            BackendKind::File => Self::File(FileBackend::new(&settings.state_dir)),
            BackendKind::Memory => Self::Memory(MemoryBackend::new()),
        };
        info!(backend = ?settings.backend, "Storage backend ready");
        Ok(backend)
    }
}

impl StateBackend for AnyBackend {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::Sqlite(b) => b.read(key).await,
            Self::File(b) => b.read(key).await,
            Self::Memory(b) => b.read(key).await,
        }
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::Sqlite(b) => b.write(key, value).await,
            Self::File(b) => b.write(key, value).await,
            Self::Memory(b) => b.write(key, value).await,
        }
    }
}
