//! Card catalog - the static, read-only set of cards and their benefits.
//!
//! A [`Catalog`] is built once by the loader in `config::catalog` and never
//! mutated afterwards. Lookups preserve catalog order, which is the order the
//! wallet and library views present cards in.

use crate::core::period::Cycle;
use std::{collections::HashSet, fmt};
use tracing::warn;

/// Card issuer. Catalog data outside this set is mapped to [`Issuer::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issuer {
    /// American Express
    Amex,
    /// Chase
    Chase,
    /// Citi
    Citi,
    /// Capital One
    CapitalOne,
    /// Any other issuer
    Other,
}

impl Issuer {
    /// Display spelling, as used in catalog data.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Amex => "Amex",
            Self::Chase => "Chase",
            Self::Citi => "Citi",
            Self::CapitalOne => "Capital One",
            Self::Other => "Other",
        }
    }

    /// Parses an issuer coming from catalog data, logging a warning and
    /// substituting [`Issuer::Other`] for unknown values.
    #[must_use]
    pub fn from_catalog(value: &str) -> Self {
        match value.trim() {
            "Amex" | "American Express" => Self::Amex,
            "Chase" => Self::Chase,
            "Citi" => Self::Citi,
            "Capital One" => Self::CapitalOne,
            "Other" => Self::Other,
            unknown => {
                warn!(issuer = unknown, "Unknown issuer, defaulting to Other");
                Self::Other
            }
        }
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurring benefit attached to exactly one card.
#[derive(Debug, Clone, PartialEq)]
pub struct Benefit {
    /// Catalog-wide unique identifier
    pub id: String,
    /// Id of the owning card
    pub card_id: String,
    /// Short title (e.g., "Uber Cash")
    pub title: String,
    /// Longer explanation of how to redeem it
    pub description: String,
    /// Dollar value per cycle, when the benefit has one
    pub amount: Option<f64>,
    /// How often the benefit resets
    pub cycle: Cycle,
    /// Merchant the credit applies to, if restricted
    pub merchant: Option<String>,
}

impl Benefit {
    /// Dollar value used for dashboard totals; benefits without an amount count as zero.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.amount.unwrap_or(0.0)
    }
}

/// A credit card and its ordered benefits.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Catalog-wide unique identifier
    pub id: String,
    /// Display name (e.g., "Amex Platinum")
    pub name: String,
    /// Issuing bank
    pub issuer: Issuer,
    /// Display color tag, used when no image is available
    pub color: String,
    /// Optional path to a card image
    pub image: Option<String>,
    /// Benefits in catalog order
    pub benefits: Vec<Benefit>,
}

impl Card {
    /// Benefits of this card that reset on `cycle`, in catalog order.
    pub fn benefits_with_cycle(&self, cycle: Cycle) -> impl Iterator<Item = &Benefit> {
        self.benefits.iter().filter(move |b| b.cycle == cycle)
    }
}

/// Immutable, ordered collection of cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    cards: Vec<Card>,
}

impl Catalog {
    /// Builds a catalog, dropping cards and benefits whose id was already seen.
    ///
    /// Usage records are keyed by benefit id alone, so benefit ids must be
    /// unique across the whole catalog, not just within a card.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        let mut card_ids = HashSet::new();
        let mut benefit_ids = HashSet::new();
        let mut kept = Vec::with_capacity(cards.len());

        for mut card in cards {
            if !card_ids.insert(card.id.clone()) {
                warn!(card_id = %card.id, "Duplicate card id in catalog, skipping");
                continue;
            }
            card.benefits.retain(|benefit| {
                let fresh = benefit_ids.insert(benefit.id.clone());
                if !fresh {
                    warn!(benefit_id = %benefit.id, card_id = %benefit.card_id, "Duplicate benefit id in catalog, skipping");
                }
                fresh
            });
            kept.push(card);
        }

        Self { cards: kept }
    }

    /// All cards in catalog order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Looks up a card by id.
    #[must_use]
    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    /// Looks up a benefit by id across all cards.
    #[must_use]
    pub fn benefit(&self, benefit_id: &str) -> Option<&Benefit> {
        self.cards
            .iter()
            .flat_map(|c| c.benefits.iter())
            .find(|b| b.id == benefit_id)
    }

    /// Cards whose id is in `owned_ids`, in catalog order. Ids that are not in
    /// the catalog are ignored.
    pub fn owned_cards<'a>(&'a self, owned_ids: &[String]) -> impl Iterator<Item = &'a Card> {
        self.cards.iter().filter(move |c| owned_ids.contains(&c.id))
    }

    /// Benefits of the owned cards that reset on `cycle`.
    #[must_use]
    pub fn benefits_for(&self, owned_ids: &[String], cycle: Cycle) -> Vec<&Benefit> {
        self.owned_cards(owned_ids)
            .flat_map(|c| c.benefits_with_cycle(cycle))
            .collect()
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the catalog has no cards at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
