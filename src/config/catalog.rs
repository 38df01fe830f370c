//! Card catalog loading from catalog.toml
//!
//! The catalog is static configuration: a list of `[[cards]]`, each with its
//! `[[cards.benefits]]`. It is validated once at load time. Values outside the
//! closed sets (cycle, issuer) are logged and replaced with safe defaults so a
//! partially malformed catalog still produces a usable app.

use crate::{
    core::{
        catalog::{Benefit, Card, Catalog, Issuer},
        period::Cycle,
    },
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration structure representing the entire catalog.toml file
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Cards in display order
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

/// Configuration for a single card
#[derive(Debug, Deserialize, Clone)]
pub struct CardConfig {
    /// Unique card id
    pub id: String,
    /// Display name
    pub name: String,
    /// Issuer, one of Amex, Chase, Citi, Capital One, Other
    pub issuer: String,
    /// Display color tag
    #[serde(default)]
    pub color: String,
    /// Optional card image path
    pub image: Option<String>,
    /// Benefits in display order
    #[serde(default)]
    pub benefits: Vec<BenefitConfig>,
}

/// Configuration for a single benefit
#[derive(Debug, Deserialize, Clone)]
pub struct BenefitConfig {
    /// Unique benefit id
    pub id: String,
    /// Short title
    pub title: String,
    /// Redemption details
    #[serde(default)]
    pub description: String,
    /// Dollar value per cycle
    pub amount: Option<f64>,
    /// Monthly, Quarterly, Semi-Annual or Annual
    pub cycle: String,
    /// Merchant restriction
    pub merchant: Option<String>,
}

impl From<CatalogConfig> for Catalog {
    fn from(config: CatalogConfig) -> Self {
        Self::new(config.cards.into_iter().map(Card::from).collect())
    }
}

impl From<CardConfig> for Card {
    fn from(config: CardConfig) -> Self {
        let card_id = config.id;
        let benefits = config
            .benefits
            .into_iter()
            .map(|benefit| benefit.into_benefit(&card_id))
            .collect();

        Self {
            issuer: Issuer::from_catalog(&config.issuer),
            id: card_id,
            name: config.name,
            color: config.color,
            image: config.image,
            benefits,
        }
    }
}

impl BenefitConfig {
    fn into_benefit(self, card_id: &str) -> Benefit {
        let amount = match self.amount {
            Some(amount) if !amount.is_finite() || amount < 0.0 => {
                warn!(benefit_id = %self.id, amount, "Ignoring invalid benefit amount");
                None
            }
            other => other,
        };

        Benefit {
            cycle: Cycle::from_catalog(&self.cycle),
            id: self.id,
            card_id: card_id.to_string(),
            title: self.title,
            description: self.description,
            amount,
            merchant: self.merchant,
        }
    }
}

/// Parses and validates a catalog document.
///
/// # Errors
/// Returns `Error::Config` if the TOML is invalid or required fields are missing.
pub fn parse_catalog(contents: &str) -> Result<Catalog> {
    let config: CatalogConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })?;
    Ok(config.into())
}

/// Loads the catalog from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let path_ref = path.as_ref();
    debug!("Attempting to load catalog from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {path_ref:?}: {e}"),
    })?;

    let catalog = parse_catalog(&contents)?;
    info!(cards = catalog.len(), "Loaded catalog from {:?}", path_ref);
    Ok(catalog)
}
