/// Card catalog loading from catalog.toml
pub mod catalog;

/// Database connection and table creation
pub mod database;

/// Runtime settings from environment variables
pub mod settings;
