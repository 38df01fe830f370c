//! Runtime settings read from the environment.
//!
//! `main` loads `.env` with `dotenvy` before calling [`Settings::from_env`], so
//! every value here can come from either the process environment or that file.

use crate::errors::{Error, Result};
use std::{path::PathBuf, str::FromStr};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/benefit_buddy.sqlite?mode=rwc";
const DEFAULT_CATALOG_PATH: &str = "catalog.toml";
const DEFAULT_STATE_DIR: &str = "data";

/// Where the usage snapshot is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// `SQLite` database at `DATABASE_URL`
    #[default]
    Sqlite,
    /// JSON file inside `STATE_DIR`
    File,
    /// Nothing is persisted
    Memory,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "file" | "json" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(Error::Config {
                message: format!("Unknown STATE_BACKEND '{other}', expected sqlite, file or memory"),
            }),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `SeaORM` connection string (`DATABASE_URL`)
    pub database_url: String,
    /// Catalog TOML file (`CATALOG_PATH`)
    pub catalog_path: PathBuf,
    /// Storage backend (`STATE_BACKEND`)
    pub backend: BackendKind,
    /// Directory for the file backend (`STATE_DIR`)
    pub state_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            backend: BackendKind::default(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl Settings {
    /// Reads settings from environment variables, falling back to defaults.
    ///
    /// # Errors
    /// Returns `Error::Config` if `STATE_BACKEND` names an unknown backend.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup` instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let backend = match lookup("STATE_BACKEND") {
            Some(value) => value.parse()?,
            None => defaults.backend,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            catalog_path: lookup("CATALOG_PATH").map_or(defaults.catalog_path, PathBuf::from),
            backend,
            state_dir: lookup("STATE_DIR").map_or(defaults.state_dir, PathBuf::from),
        })
    }
}
