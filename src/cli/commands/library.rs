//! Card library commands - `library` and `toggle-card`.

use crate::{
    cli::App,
    core::{report, store::StateBackend, wallet::LibraryView},
    errors::{Error, Result},
};
use tracing::warn;

/// Renders every catalog card with its ownership state.
pub fn library<B: StateBackend>(app: &App<B>) -> String {
    report::render_library(&LibraryView::build(&app.catalog, app.store.data()))
}

/// Adds the card to the wallet, or removes it if already owned.
///
/// Usage history of a removed card is kept, so adding it back restores it.
///
/// # Errors
/// Returns `Error::CardNotFound` if the id is not in the catalog.
pub async fn toggle_card<B: StateBackend>(app: &mut App<B>, card_id: &str) -> Result<String> {
    let Some(card) = app.catalog.card(card_id) else {
        warn!(card_id, "Refusing to toggle unknown card");
        return Err(Error::CardNotFound {
            card_id: card_id.to_string(),
        });
    };
    let name = card.name.clone();

    let owned = app.store.toggle_card_ownership(card_id).await;
    Ok(if owned {
        format!("✅ Added {name} to your wallet.")
    } else {
        format!("Removed {name} from your wallet.")
    })
}
