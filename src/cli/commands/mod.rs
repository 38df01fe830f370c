//! Command implementations organized by screen.

/// Card library and ownership toggling
pub mod library;
/// Period overview
pub mod periods;
/// Wallet screen and benefit usage toggling
pub mod wallet;

pub use library::*;
pub use periods::*;
pub use wallet::*;

use crate::{
    cli::App,
    core::{store::StateBackend, wallet::{View, default_view}},
};

/// Shows the wallet when any card is owned, otherwise the library.
pub fn home<B: StateBackend>(app: &App<B>) -> String {
    match default_view(app.store.data()) {
        View::Wallet => wallet(app, crate::core::period::Cycle::Monthly),
        View::Library => library(app),
    }
}
