//! Period overview command.

use crate::{cli::App, core::{report, store::StateBackend}};

/// Renders the current key, label and end date of every cycle.
pub fn periods<B: StateBackend>(app: &App<B>) -> String {
    report::render_periods(app.reference, app.today)
}
