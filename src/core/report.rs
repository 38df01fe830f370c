//! Text rendering of the wallet, library and period overviews.
//!
//! Functions here take the view models from `core::wallet` and return plain
//! strings; the CLI decides where they are printed.

use crate::core::{
    period::{Cycle, cycle_end_date, days_remaining_at, derive_key, derive_label},
    wallet::{LibraryView, Urgency, ValueDashboard, WalletView},
};
use chrono::NaiveDate;

/// Formats a dollar amount the way the dashboard shows it: whole dollars
/// without decimals, thousands grouped (`$1,250`), cents only when present
/// (`$12.50`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = format!("{:.2}", amount.abs());
    let (whole, fraction) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction == "00" {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{fraction}")
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: u32, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = progress_percent.min(100) as usize;

    let filled = (clamped * length + 50) / 100;
    let empty = length.saturating_sub(filled);

    format!(
        "[{}{}] {progress_percent}%",
        "█".repeat(filled),
        "░".repeat(empty)
    )
}

fn format_days_remaining(days: u32) -> String {
    match days {
        0 => "Resets after today".to_string(),
        1 => "1 day left".to_string(),
        n => format!("{n} days left"),
    }
}

const fn urgency_marker(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Critical => "!!",
        Urgency::Soon => "! ",
        Urgency::Relaxed => "  ",
    }
}

fn dashboard_lines(dashboard: &ValueDashboard) -> Vec<String> {
    let mut value = format!(
        "  {} / {}",
        format_amount(dashboard.used_value),
        format_amount(dashboard.total_value)
    );
    if dashboard.remaining_value() > 0.0 {
        value.push_str(&format!(
            "  ({} remaining)",
            format_amount(dashboard.remaining_value())
        ));
    }

    vec![
        "PERIOD VALUE".to_string(),
        value,
        format!(
            "  {} of {} benefits used  {}",
            dashboard.used_count,
            dashboard.benefit_count,
            format_progress_bar(dashboard.usage_percent(), None)
        ),
        format!(
            "{} {}",
            urgency_marker(dashboard.urgency()),
            format_days_remaining(dashboard.days_remaining)
        ),
    ]
}

/// Renders the wallet screen.
#[must_use]
pub fn render_wallet(view: &WalletView<'_>) -> String {
    if !view.has_cards {
        return [
            "Your wallet is empty.",
            "Add the credit cards you own to start tracking your recurring benefits:",
            "  benefit-buddy library",
            "  benefit-buddy toggle-card <card-id>",
        ]
        .join("\n");
    }

    let mut lines = vec![
        format!("{}  |  PERIOD STATUS", view.cycle.filter_label()),
        format!(
            "{} ({}, ends {})",
            view.period_label,
            view.period_key,
            view.ends_at.date()
        ),
        String::new(),
    ];

    let Some(dashboard) = &view.dashboard else {
        lines.push(format!(
            "No benefits match the {} cycle for your selected cards.",
            view.cycle
        ));
        return lines.join("\n");
    };
    lines.extend(dashboard_lines(dashboard));

    for section in &view.sections {
        lines.push(String::new());
        lines.push(format!(
            "{} ({})  {} / {} Used  {}",
            section.card.name,
            section.card.issuer,
            section.used_count(),
            section.benefits.len(),
            format_progress_bar(section.progress_percent(), Some(8))
        ));

        for status in &section.benefits {
            let benefit = status.benefit;
            let check = if status.used { "[x]" } else { "[ ]" };
            let amount = benefit
                .amount
                .map_or_else(|| "Benefit".to_string(), format_amount);
            lines.push(format!("  {check} {amount:>8}  {}  ({})", benefit.title, benefit.id));
            if !benefit.description.is_empty() {
                lines.push(format!("      {}", benefit.description));
            }
        }
    }

    lines.join("\n")
}

/// Renders the card library.
#[must_use]
pub fn render_library(view: &LibraryView<'_>) -> String {
    let mut lines = vec![
        "CARD LIBRARY".to_string(),
        "Select the cards you own to add them to your wallet.".to_string(),
        String::new(),
    ];

    if view.entries.is_empty() {
        lines.push("The catalog has no cards.".to_string());
        return lines.join("\n");
    }

    let name_width = view
        .entries
        .iter()
        .map(|e| e.card.name.chars().count())
        .max()
        .unwrap_or(0);

    lines.extend(view.entries.iter().map(|entry| {
        let check = if entry.owned { "[x]" } else { "[ ]" };
        format!(
            "{check} {:<name_width$}  {:<11}  {:>2} Benefits tracked  ({})",
            entry.card.name,
            entry.card.issuer.as_str(),
            entry.benefit_count(),
            entry.card.id,
        )
    }));

    lines.join("\n")
}

/// Renders the current period of every cycle as of `reference`, counting days
/// remaining from `today`.
#[must_use]
pub fn render_periods(reference: NaiveDate, today: NaiveDate) -> String {
    Cycle::ALL
        .iter()
        .map(|&cycle| {
            format!(
                "{:<12}  {:<8}  {:<17}  ends {}  {}",
                cycle.filter_label(),
                derive_key(cycle, reference).as_str(),
                derive_label(cycle, reference),
                cycle_end_date(cycle, reference).date(),
                format_days_remaining(days_remaining_at(cycle, reference, today)),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
