//! Shared test utilities.
//!
//! This module provides helpers for setting up test databases, building small
//! catalogs and capturing tracing output in tests.

use crate::{
    core::{
        catalog::{Benefit, Card, Catalog, Issuer},
        period::Cycle,
        store::StateBackend,
    },
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a benefit with a generated title and description.
pub fn sample_benefit(card_id: &str, id: &str, cycle: Cycle, amount: Option<f64>) -> Benefit {
    Benefit {
        id: id.to_string(),
        card_id: card_id.to_string(),
        title: format!("{id} title"),
        description: format!("{cycle} benefit"),
        amount,
        cycle,
        merchant: None,
    }
}

/// Creates a card issued by `Other` with the given benefits.
pub fn sample_card(id: &str, benefits: Vec<Benefit>) -> Card {
    Card {
        id: id.to_string(),
        name: format!("Card {id}"),
        issuer: Issuer::Other,
        color: "bg-zinc-500".to_string(),
        image: None,
        benefits,
    }
}

/// Catalog used by the wallet scenario tests.
///
/// * `card-a` ("Card A"): `card-a-monthly` ($10, Monthly) and `card-a-annual` ($100, Annual)
/// * `card-b` ("Card B"): `card-b-quarterly` ($25, Quarterly)
pub fn scenario_catalog() -> Catalog {
    let monthly = Benefit {
        title: "Monthly Credit".to_string(),
        description: "Ten dollars every month".to_string(),
        ..sample_benefit("card-a", "card-a-monthly", Cycle::Monthly, Some(10.0))
    };
    let annual = Benefit {
        title: "Annual Credit".to_string(),
        ..sample_benefit("card-a", "card-a-annual", Cycle::Annual, Some(100.0))
    };
    let quarterly = sample_benefit("card-b", "card-b-quarterly", Cycle::Quarterly, Some(25.0));

    Catalog::new(vec![
        Card {
            name: "Card A".to_string(),
            ..sample_card("card-a", vec![monthly, annual])
        },
        Card {
            name: "Card B".to_string(),
            issuer: Issuer::Chase,
            ..sample_card("card-b", vec![quarterly])
        },
    ])
}

/// Backend whose every operation fails, for exercising the store's recovery paths.
#[derive(Debug, Clone, Copy)]
pub struct FailingBackend;

impl StateBackend for FailingBackend {
    async fn read(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Config {
            message: "storage unavailable".to_string(),
        })
    }

    async fn write(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Io(std::io::Error::other("quota exceeded")))
    }
}
