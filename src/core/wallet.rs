//! Wallet and library view models.
//!
//! These are framework-agnostic: they combine the catalog, the user's data and
//! the period calculator into plain structs that the CLI renders. The wallet
//! shows owned cards' benefits for one cycle, scoped to that cycle's current
//! period; the library lists every catalog card with its ownership flag.

use crate::core::{
    catalog::{Benefit, Card, Catalog},
    period::{Cycle, PeriodKey, cycle_end_date, days_remaining_at, derive_key, derive_label},
    usage::UserData,
};
use chrono::{NaiveDate, NaiveDateTime};

/// Top-level screen of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Owned cards and their benefit usage
    Wallet,
    /// All catalog cards, to add or remove from the wallet
    Library,
}

/// First screen to show: the library until the user owns a card, then the wallet.
#[must_use]
pub fn default_view(data: &UserData) -> View {
    if data.owned_card_ids().is_empty() {
        View::Library
    } else {
        View::Wallet
    }
}

/// How close the current period is to resetting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// A week or less left
    Critical,
    /// Two weeks or less left
    Soon,
    /// More than two weeks left
    Relaxed,
}

impl Urgency {
    /// Classifies a days-remaining count.
    #[must_use]
    pub const fn from_days_remaining(days: u32) -> Self {
        match days {
            0..=7 => Self::Critical,
            8..=14 => Self::Soon,
            _ => Self::Relaxed,
        }
    }
}

/// Rounds `part / whole` to a whole percentage, 0 when `whole` is zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    // part <= whole for every caller, so the result is in [0, 100]
    ((part / whole) * 100.0).round() as u32
}

/// One benefit and whether it was used in the current period.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitStatus<'a> {
    /// The catalog benefit
    pub benefit: &'a Benefit,
    /// Used in the current period
    pub used: bool,
}

/// An owned card with the benefits that match the selected cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSection<'a> {
    /// The catalog card
    pub card: &'a Card,
    /// Matching benefits in catalog order
    pub benefits: Vec<BenefitStatus<'a>>,
}

impl CardSection<'_> {
    /// Number of benefits marked used.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.benefits.iter().filter(|b| b.used).count()
    }

    /// Rounded share of this card's benefits that were used.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> u32 {
        percent(self.used_count() as f64, self.benefits.len() as f64)
    }
}

/// Aggregate value summary for the wallet's current period.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDashboard {
    /// Sum of all visible benefit amounts
    pub total_value: f64,
    /// Sum of the amounts of used benefits
    pub used_value: f64,
    /// Number of visible benefits
    pub benefit_count: usize,
    /// Number of used benefits
    pub used_count: usize,
    /// Days until the period resets
    pub days_remaining: u32,
}

impl ValueDashboard {
    fn from_sections(sections: &[CardSection<'_>], days_remaining: u32) -> Self {
        let statuses = sections.iter().flat_map(|s| s.benefits.iter());
        let mut dashboard = Self {
            total_value: 0.0,
            used_value: 0.0,
            benefit_count: 0,
            used_count: 0,
            days_remaining,
        };

        for status in statuses {
            let value = status.benefit.value();
            dashboard.total_value += value;
            dashboard.benefit_count += 1;
            if status.used {
                dashboard.used_value += value;
                dashboard.used_count += 1;
            }
        }

        dashboard
    }

    /// Value still available this period.
    #[must_use]
    pub fn remaining_value(&self) -> f64 {
        self.total_value - self.used_value
    }

    /// Rounded share of the total value that was used, 0 when there is no value.
    #[must_use]
    pub fn usage_percent(&self) -> u32 {
        percent(self.used_value, self.total_value)
    }

    /// Urgency derived from the days remaining.
    #[must_use]
    pub const fn urgency(&self) -> Urgency {
        Urgency::from_days_remaining(self.days_remaining)
    }
}

/// Everything the wallet screen shows for one cycle filter.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletView<'a> {
    /// Selected cycle filter
    pub cycle: Cycle,
    /// Current period of that cycle
    pub period_key: PeriodKey,
    /// Human-readable name of the period
    pub period_label: String,
    /// Last instant of the period
    pub ends_at: NaiveDateTime,
    /// Whether the user owns any catalog card at all
    pub has_cards: bool,
    /// Owned cards with at least one matching benefit, in catalog order
    pub sections: Vec<CardSection<'a>>,
    /// Present only when at least one benefit matches
    pub dashboard: Option<ValueDashboard>,
}

impl<'a> WalletView<'a> {
    /// Builds the wallet for `cycle` as of `reference`, counting days remaining
    /// from `today`.
    #[must_use]
    pub fn build(
        catalog: &'a Catalog,
        data: &UserData,
        cycle: Cycle,
        reference: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let period_key = derive_key(cycle, reference);
        let owned = data.owned_card_ids();

        let sections: Vec<CardSection<'a>> = catalog
            .owned_cards(owned)
            .filter_map(|card| {
                let benefits: Vec<_> = card
                    .benefits_with_cycle(cycle)
                    .map(|benefit| BenefitStatus {
                        benefit,
                        used: data.is_used(&benefit.id, &period_key),
                    })
                    .collect();
                (!benefits.is_empty()).then_some(CardSection { card, benefits })
            })
            .collect();

        let dashboard = (!sections.is_empty()).then(|| {
            ValueDashboard::from_sections(&sections, days_remaining_at(cycle, reference, today))
        });

        Self {
            cycle,
            period_label: derive_label(cycle, reference),
            ends_at: cycle_end_date(cycle, reference),
            period_key,
            has_cards: catalog.owned_cards(owned).next().is_some(),
            sections,
            dashboard,
        }
    }

    /// Whether any owned card has a benefit on this cycle.
    #[must_use]
    pub fn has_benefits(&self) -> bool {
        !self.sections.is_empty()
    }
}

/// One catalog card as shown in the library.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryEntry<'a> {
    /// The catalog card
    pub card: &'a Card,
    /// Whether the user owns it
    pub owned: bool,
}

impl LibraryEntry<'_> {
    /// Number of benefits the card tracks.
    #[must_use]
    pub fn benefit_count(&self) -> usize {
        self.card.benefits.len()
    }
}

/// Every catalog card with its ownership flag, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryView<'a> {
    /// Library entries
    pub entries: Vec<LibraryEntry<'a>>,
}

impl<'a> LibraryView<'a> {
    /// Builds the library view.
    #[must_use]
    pub fn build(catalog: &'a Catalog, data: &UserData) -> Self {
        let entries = catalog
            .cards()
            .iter()
            .map(|card| LibraryEntry {
                card,
                owned: data.owns(&card.id),
            })
            .collect();
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{sample_benefit, sample_card, scenario_catalog};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_default_view() {
        let mut data = UserData::default();
        assert_eq!(default_view(&data), View::Library);
        data.toggle_card("card-a");
        assert_eq!(default_view(&data), View::Wallet);
    }

    #[test]
    fn test_urgency_thresholds() {
        assert_eq!(Urgency::from_days_remaining(0), Urgency::Critical);
        assert_eq!(Urgency::from_days_remaining(7), Urgency::Critical);
        assert_eq!(Urgency::from_days_remaining(8), Urgency::Soon);
        assert_eq!(Urgency::from_days_remaining(14), Urgency::Soon);
        assert_eq!(Urgency::from_days_remaining(15), Urgency::Relaxed);
    }

    #[test]
    fn test_monthly_wallet_scenario() {
        let catalog = scenario_catalog();
        let mut data = UserData::default();
        data.toggle_card("card-a");
        let today = date(2024, 1, 15);

        let wallet = WalletView::build(&catalog, &data, Cycle::Monthly, today, today);
        assert_eq!(wallet.period_key.as_str(), "2024-01");
        assert_eq!(wallet.period_label, "January 2024");
        assert_eq!(wallet.sections.len(), 1);
        assert_eq!(wallet.sections[0].benefits.len(), 1);
        assert_eq!(wallet.sections[0].benefits[0].benefit.id, "card-a-monthly");

        let dashboard = wallet.dashboard.unwrap();
        assert_eq!(dashboard.total_value, 10.0);
        assert_eq!(dashboard.used_value, 0.0);
        assert_eq!(dashboard.usage_percent(), 0);
        assert_eq!(dashboard.days_remaining, 16);
        assert_eq!(dashboard.urgency(), Urgency::Relaxed);

        data.toggle_usage("card-a-monthly", &wallet.period_key);
        let wallet = WalletView::build(&catalog, &data, Cycle::Monthly, today, today);
        let dashboard = wallet.dashboard.unwrap();
        assert_eq!(dashboard.total_value, 10.0);
        assert_eq!(dashboard.used_value, 10.0);
        assert_eq!(dashboard.usage_percent(), 100);
        assert_eq!(dashboard.remaining_value(), 0.0);
        assert_eq!(wallet.sections[0].progress_percent(), 100);
    }

    #[test]
    fn test_usage_from_previous_month_does_not_carry_over() {
        let catalog = scenario_catalog();
        let mut data = UserData::default();
        data.toggle_card("card-a");
        let jan = date(2024, 1, 15);
        data.toggle_usage("card-a-monthly", &derive_key(Cycle::Monthly, jan));

        let feb = date(2024, 2, 1);
        let wallet = WalletView::build(&catalog, &data, Cycle::Monthly, feb, feb);
        assert!(!wallet.sections[0].benefits[0].used);
    }

    #[test]
    fn test_cycle_without_benefits_has_no_dashboard() {
        let catalog = scenario_catalog();
        let mut data = UserData::default();
        data.toggle_card("card-a");
        let today = date(2024, 5, 5);

        let wallet = WalletView::build(&catalog, &data, Cycle::Quarterly, today, today);
        assert!(wallet.has_cards);
        assert!(!wallet.has_benefits());
        assert!(wallet.dashboard.is_none());
    }

    #[test]
    fn test_empty_wallet() {
        let catalog = scenario_catalog();
        let data = UserData::default();
        let today = date(2024, 5, 5);

        let wallet = WalletView::build(&catalog, &data, Cycle::Monthly, today, today);
        assert!(!wallet.has_cards);
        assert!(wallet.sections.is_empty());
    }

    #[test]
    fn test_benefits_without_amount_count_as_zero() {
        let catalog = Catalog::new(vec![sample_card(
            "c",
            vec![
                sample_benefit("c", "c-lounge", Cycle::Annual, None),
                sample_benefit("c", "c-credit", Cycle::Annual, Some(50.0)),
            ],
        )]);
        let mut data = UserData::default();
        data.toggle_card("c");
        let today = date(2024, 12, 28);
        data.toggle_usage("c-lounge", &derive_key(Cycle::Annual, today));

        let wallet = WalletView::build(&catalog, &data, Cycle::Annual, today, today);
        let dashboard = wallet.dashboard.unwrap();
        assert_eq!(dashboard.total_value, 50.0);
        assert_eq!(dashboard.used_value, 0.0);
        assert_eq!(dashboard.used_count, 1);
        assert_eq!(dashboard.benefit_count, 2);
        assert_eq!(dashboard.urgency(), Urgency::Critical);
        assert_eq!(wallet.sections[0].progress_percent(), 50);
    }

    #[test]
    fn test_days_remaining_is_relative_to_today() {
        let catalog = scenario_catalog();
        let mut data = UserData::default();
        data.toggle_card("card-a");

        // Looking at January while it is already January 31st
        let wallet =
            WalletView::build(&catalog, &data, Cycle::Monthly, date(2024, 1, 2), date(2024, 1, 31));
        assert_eq!(wallet.dashboard.unwrap().days_remaining, 0);
    }

    #[test]
    fn test_library_view() {
        let catalog = scenario_catalog();
        let mut data = UserData::default();
        data.toggle_card("card-a");

        let library = LibraryView::build(&catalog, &data);
        assert_eq!(library.entries.len(), 2);
        assert!(library.entries[0].owned);
        assert_eq!(library.entries[0].benefit_count(), 2);
        assert!(!library.entries[1].owned);
    }
}
