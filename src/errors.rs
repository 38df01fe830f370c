//! Unified error types and result handling.

use thiserror::Error;

/// Errors surfaced by the catalog loader, the storage backends and the CLI.
///
/// The period calculator has no error channel, and the usage store swallows
/// persistence failures after logging them, so most of these only reach the
/// caller through configuration loading or explicit user commands.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or catalog data could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what went wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem error from the file backend or the catalog loader
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A card id that is not part of the catalog
    #[error("Card not found: {card_id}")]
    CardNotFound {
        /// The id that was looked up
        card_id: String,
    },

    /// A benefit id that is not part of the catalog
    #[error("Benefit not found: {benefit_id}")]
    BenefitNotFound {
        /// The id that was looked up
        benefit_id: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
