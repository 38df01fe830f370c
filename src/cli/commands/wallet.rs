//! Wallet commands - `wallet` and `toggle-benefit`.

use crate::{
    cli::App,
    core::{
        period::{Cycle, derive_key},
        report,
        store::StateBackend,
        wallet::WalletView,
    },
    errors::{Error, Result},
};
use tracing::warn;

/// Renders the wallet filtered to `cycle`.
pub fn wallet<B: StateBackend>(app: &App<B>, cycle: Cycle) -> String {
    let view = WalletView::build(
        &app.catalog,
        app.store.data(),
        cycle,
        app.reference,
        app.today,
    );
    report::render_wallet(&view)
}

/// Flips the usage flag of a benefit for the period its own cycle is in at
/// the reference date.
///
/// # Errors
/// Returns `Error::BenefitNotFound` if the id is not in the catalog.
pub async fn toggle_benefit<B: StateBackend>(
    app: &mut App<B>,
    benefit_id: &str,
) -> Result<String> {
    let Some(benefit) = app.catalog.benefit(benefit_id) else {
        warn!(benefit_id, "Refusing to toggle unknown benefit");
        return Err(Error::BenefitNotFound {
            benefit_id: benefit_id.to_string(),
        });
    };
    let title = benefit.title.clone();
    let period = derive_key(benefit.cycle, app.reference);

    if !app.store.data().owns(&benefit.card_id) {
        warn!(benefit_id, card_id = %benefit.card_id, "Toggling a benefit of a card that is not owned");
    }

    let used = app.store.toggle_benefit_usage(benefit_id, &period).await;
    Ok(if used {
        format!("✅ Marked {title} as used for {period}.")
    } else {
        format!("Marked {title} as unused for {period}.")
    })
}
