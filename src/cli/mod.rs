//! CLI layer - argument parsing, the shared app context and command dispatch.

/// Command handlers (wallet, library, periods)
pub mod commands;

use crate::{
    core::{catalog::Catalog, period::Cycle, store::{StateBackend, UsageStore}},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Track recurring credit card benefits across monthly, quarterly,
/// semi-annual and annual cycles.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Evaluate periods as of this date (YYYY-MM-DD) instead of today
    #[arg(short, long, global = true)]
    pub date: Option<NaiveDate>,

    /// Catalog file, overriding `CATALOG_PATH`
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Subcommand; without one the wallet or the library is shown
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show benefits of the owned cards for the current period of a cycle
    Wallet {
        /// Monthly, quarterly, semi-annual or annual
        #[arg(short, long, default_value = "monthly")]
        cycle: Cycle,
    },
    /// List every card in the catalog and whether it is owned
    Library,
    /// Add a card to the wallet, or remove it if already owned
    ToggleCard {
        /// Card id as shown by `library`
        card_id: String,
    },
    /// Mark a benefit used for its current period, or unmark it
    ToggleBenefit {
        /// Benefit id as shown by `wallet`
        benefit_id: String,
    },
    /// Show the current period of every cycle
    Periods,
}

/// Shared data available to all commands.
///
/// `reference` picks the periods being looked at; `today` is only used for
/// counting days remaining. They differ when `--date` is given.
#[derive(Debug)]
pub struct App<B> {
    /// Card catalog loaded at startup
    pub catalog: Catalog,
    /// User data and its persistence
    pub store: UsageStore<B>,
    /// Date whose periods are shown and toggled
    pub reference: NaiveDate,
    /// Actual current date
    pub today: NaiveDate,
}

impl<B: StateBackend> App<B> {
    /// Creates a new `App` context.
    #[must_use]
    pub const fn new(
        catalog: Catalog,
        store: UsageStore<B>,
        reference: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        Self {
            catalog,
            store,
            reference,
            today,
        }
    }

    /// Runs `command` and returns the text to print.
    ///
    /// # Errors
    /// Returns `Error::CardNotFound` or `Error::BenefitNotFound` when a toggle
    /// names an id that is not in the catalog.
    pub async fn execute(&mut self, command: Option<Command>) -> Result<String> {
        match command {
            None => Ok(commands::home(self)),
            Some(Command::Wallet { cycle }) => Ok(commands::wallet(self, cycle)),
            Some(Command::Library) => Ok(commands::library(self)),
            Some(Command::ToggleCard { card_id }) => commands::toggle_card(self, &card_id).await,
            Some(Command::ToggleBenefit { benefit_id }) => {
                commands::toggle_benefit(self, &benefit_id).await
            }
            Some(Command::Periods) => Ok(commands::periods(self)),
        }
    }
}

/// The single line printed to stderr when a command fails.
#[must_use]
pub fn render_error(err: &Error) -> String {
    format!("Error: {err}")
}
