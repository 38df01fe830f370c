//! User data - owned cards and per-period benefit usage.
//!
//! [`UserData`] is the only mutable, persisted entity. It is serialized as one
//! JSON snapshot of the form
//! `{ "ownedCardIds": [..], "usage": { "<benefitId>_<periodKey>": bool } }`.
//! Inside the process usage is keyed by the structured [`UsageKey`]; the
//! underscore encoding exists only at the JSON boundary. Stored records whose
//! key cannot be decoded are logged and carried along verbatim, so saving a
//! loaded snapshot never loses them.

use crate::core::period::PeriodKey;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;
use tracing::warn;

/// Identifies one benefit within one concrete period.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UsageKey {
    benefit_id: String,
    period: PeriodKey,
}

impl UsageKey {
    /// Creates a key for `benefit_id` in `period`.
    pub fn new(benefit_id: impl Into<String>, period: PeriodKey) -> Self {
        Self {
            benefit_id: benefit_id.into(),
            period,
        }
    }

    /// The benefit this key refers to.
    #[must_use]
    pub fn benefit_id(&self) -> &str {
        &self.benefit_id
    }

    /// The period this key refers to.
    #[must_use]
    pub const fn period(&self) -> &PeriodKey {
        &self.period
    }
}

impl fmt::Display for UsageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.benefit_id, self.period)
    }
}

/// Error returned for stored usage keys that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed usage key '{0}'")]
pub struct ParseUsageKeyError(String);

impl FromStr for UsageKey {
    type Err = ParseUsageKeyError;

    /// Splits on the last `_`. Period keys never contain one, so benefit ids
    /// are free to.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseUsageKeyError(s.to_string());
        let (benefit_id, period) = s.rsplit_once('_').ok_or_else(malformed)?;
        if benefit_id.is_empty() {
            return Err(malformed());
        }
        let period = period.parse().map_err(|_| malformed())?;
        Ok(Self::new(benefit_id, period))
    }
}

/// The user's owned cards and usage flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Snapshot", into = "Snapshot")]
pub struct UserData {
    /// Owned card ids in the order they were added
    owned_card_ids: Vec<String>,
    /// Usage flags; absent means unused
    usage: BTreeMap<UsageKey, bool>,
    /// Stored records whose key could not be decoded, written back untouched
    unrecognized: BTreeMap<String, bool>,
}

impl UserData {
    /// Owned card ids in the order they were added.
    #[must_use]
    pub fn owned_card_ids(&self) -> &[String] {
        &self.owned_card_ids
    }

    /// Whether the user owns `card_id`.
    #[must_use]
    pub fn owns(&self, card_id: &str) -> bool {
        self.owned_card_ids.iter().any(|id| id == card_id)
    }

    /// Adds `card_id` to the owned set or removes it. Returns the new membership.
    pub fn toggle_card(&mut self, card_id: &str) -> bool {
        if self.owns(card_id) {
            self.owned_card_ids.retain(|id| id != card_id);
            false
        } else {
            self.owned_card_ids.push(card_id.to_string());
            true
        }
    }

    /// Whether `benefit_id` is marked used in `period`.
    #[must_use]
    pub fn is_used(&self, benefit_id: &str, period: &PeriodKey) -> bool {
        self.usage
            .get(&UsageKey::new(benefit_id, period.clone()))
            .copied()
            .unwrap_or(false)
    }

    /// Flips the usage flag of `benefit_id` in `period`, treating a missing
    /// record as unused. Returns the new flag.
    ///
    /// Flipping back to unused keeps an explicit `false` record.
    pub fn toggle_usage(&mut self, benefit_id: &str, period: &PeriodKey) -> bool {
        let flag = self
            .usage
            .entry(UsageKey::new(benefit_id, period.clone()))
            .or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// All stored usage records, including those of past periods.
    #[must_use]
    pub const fn usage(&self) -> &BTreeMap<UsageKey, bool> {
        &self.usage
    }
}

/// Wire form of [`UserData`], with usage keys in their `benefitId_periodKey`
/// string encoding.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default, alias = "myCardIds")]
    owned_card_ids: Vec<String>,
    #[serde(default)]
    usage: BTreeMap<String, bool>,
}

impl From<Snapshot> for UserData {
    fn from(snapshot: Snapshot) -> Self {
        let mut usage = BTreeMap::new();
        let mut unrecognized = BTreeMap::new();
        for (raw, used) in snapshot.usage {
            match raw.parse::<UsageKey>() {
                Ok(key) => {
                    usage.insert(key, used);
                }
                Err(e) => {
                    warn!("Keeping stored usage record as-is: {e}");
                    unrecognized.insert(raw, used);
                }
            }
        }

        Self {
            owned_card_ids: snapshot.owned_card_ids,
            usage,
            unrecognized,
        }
    }
}

impl From<UserData> for Snapshot {
    fn from(data: UserData) -> Self {
        let mut usage = data.unrecognized;
        usage.extend(data.usage.into_iter().map(|(key, used)| (key.to_string(), used)));
        Self {
            owned_card_ids: data.owned_card_ids,
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::period::{Cycle, derive_key};
    use chrono::NaiveDate;

    fn key(s: &str) -> PeriodKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_usage_key_encoding() {
        let k = UsageKey::new("amex_plat_uber", key("2024-01"));
        assert_eq!(k.to_string(), "amex_plat_uber_2024-01");

        let decoded: UsageKey = "amex_plat_uber_2024-01".parse().unwrap();
        assert_eq!(decoded.benefit_id(), "amex_plat_uber");
        assert_eq!(decoded.period(), &key("2024-01"));
    }

    #[test]
    fn test_usage_key_rejects_malformed() {
        for bad in ["no-delimiter", "_2024-01", "benefit_", "benefit_2024-13", "benefit_H1"] {
            assert!(bad.parse::<UsageKey>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_toggle_usage_twice_restores_state() {
        let mut data = UserData::default();
        let period = key("2024-Q1");

        assert!(!data.is_used("b1", &period));
        assert!(data.toggle_usage("b1", &period));
        assert!(data.is_used("b1", &period));
        assert!(!data.toggle_usage("b1", &period));
        assert!(!data.is_used("b1", &period));
    }

    #[test]
    fn test_usage_is_scoped_per_period() {
        let mut data = UserData::default();
        let jan = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();

        data.toggle_usage("uber", &derive_key(Cycle::Monthly, jan));
        assert!(data.is_used("uber", &derive_key(Cycle::Monthly, jan)));
        assert!(!data.is_used("uber", &derive_key(Cycle::Monthly, feb)));
    }

    #[test]
    fn test_toggle_card_twice_restores_membership() {
        let mut data = UserData::default();
        data.toggle_card("gold");

        assert!(data.toggle_card("plat"));
        assert_eq!(data.owned_card_ids(), ["gold", "plat"]);
        assert!(!data.toggle_card("plat"));
        assert_eq!(data.owned_card_ids(), ["gold"]);
    }

    #[test]
    fn test_json_shape() {
        let mut data = UserData::default();
        data.toggle_card("plat");
        data.toggle_usage("plat_uber", &key("2024-01"));

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ownedCardIds": ["plat"],
                "usage": { "plat_uber_2024-01": true }
            })
        );
    }

    #[test]
    fn test_legacy_field_name_and_bad_keys() {
        let json = r#"{
            "myCardIds": ["gold"],
            "usage": { "dining_2024-03": true, "garbage": true, "hotel_2024": false }
        }"#;
        let data: UserData = serde_json::from_str(json).unwrap();

        assert_eq!(data.owned_card_ids(), ["gold"]);
        assert_eq!(data.usage().len(), 2);
        assert!(data.is_used("dining", &key("2024-03")));
        assert!(!data.is_used("hotel", &key("2024")));
        assert_eq!(data.unrecognized.get("garbage"), Some(&true));
    }

    #[test]
    fn test_undecodable_keys_are_written_back() {
        let json = serde_json::json!({
            "ownedCardIds": ["a"],
            "usage": { "a-uber_2024-01": true, "legacy": true, "_2024": false }
        });
        let mut data: UserData = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(data.usage().len(), 1);
        assert_eq!(serde_json::to_value(&data).unwrap(), json);

        data.toggle_usage("a-uber", &key("2024-02"));
        let written = serde_json::to_value(&data).unwrap();
        assert_eq!(written["usage"]["legacy"], true);
        assert_eq!(written["usage"]["_2024"], false);
        assert_eq!(written["usage"]["a-uber_2024-02"], true);
    }

    #[test]
    fn test_missing_fields_default() {
        let data: UserData = serde_json::from_str("{}").unwrap();
        assert_eq!(data, UserData::default());
    }
}
