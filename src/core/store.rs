//! Usage store - owns the user's data and persists it through a backend.
//!
//! The store is an explicit state container: whoever needs user data holds a
//! reference to the [`UsageStore`], and the storage mechanism is injected as a
//! [`StateBackend`]. Every mutation writes the full snapshot back immediately.
//!
//! Persistence never fails loudly. A missing or corrupt snapshot loads as the
//! empty default, and a failed write is logged while the in-memory data stays
//! authoritative for the rest of the session.

use crate::{
    core::{period::PeriodKey, usage::UserData},
    errors::Result,
};
use tracing::{debug, error, info, instrument};

/// Fixed key the snapshot is stored under.
pub const STORAGE_KEY: &str = "cc_benefit_tracker_v1";

/// Key-value storage for opaque string blobs.
#[allow(async_fn_in_trait)] // Backends are used through generics, never as trait objects
pub trait StateBackend {
    /// Returns the value stored under `key`, or `None` when there is none.
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Owned state container for [`UserData`].
#[derive(Debug)]
pub struct UsageStore<B> {
    backend: B,
    data: UserData,
}

impl<B: StateBackend> UsageStore<B> {
    /// Opens the store, loading the persisted snapshot once.
    pub async fn open(backend: B) -> Self {
        let mut store = Self {
            backend,
            data: UserData::default(),
        };
        store.data = store.load().await;
        store
    }

    /// Current user data.
    #[must_use]
    pub const fn data(&self) -> &UserData {
        &self.data
    }

    /// The injected backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Reads the persisted snapshot.
    ///
    /// Returns the empty default when nothing is stored, when the stored blob
    /// is not valid JSON, or when the backend cannot be read.
    #[instrument(skip(self))]
    pub async fn load(&self) -> UserData {
        match self.backend.read(STORAGE_KEY).await {
            Ok(Some(raw)) if !raw.trim().is_empty() => match serde_json::from_str(&raw) {
                Ok(data) => data,
                Err(e) => {
                    error!("Failed to parse stored user data, starting empty: {e}");
                    UserData::default()
                }
            },
            Ok(_) => {
                debug!("No stored user data, starting empty");
                UserData::default()
            }
            Err(e) => {
                error!("Failed to load user data, starting empty: {e}");
                UserData::default()
            }
        }
    }

    /// Writes `data` as the full snapshot. Failures are logged, not returned.
    #[instrument(skip_all)]
    pub async fn save(&self, data: &UserData) {
        let raw = match serde_json::to_string(data) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to encode user data: {e}");
                return;
            }
        };

        match self.backend.write(STORAGE_KEY, &raw).await {
            Ok(()) => debug!(bytes = raw.len(), "Saved user data"),
            Err(e) => error!("Failed to save user data: {e}"),
        }
    }

    /// Adds or removes `card_id` from the owned cards and persists.
    /// Returns whether the card is owned afterwards.
    pub async fn toggle_card_ownership(&mut self, card_id: &str) -> bool {
        let owned = self.data.toggle_card(card_id);
        info!(card_id, owned, "Toggled card ownership");
        self.save(&self.data).await;
        owned
    }

    /// Flips the usage flag of `benefit_id` in `period` and persists.
    /// Returns whether the benefit is used afterwards.
    pub async fn toggle_benefit_usage(&mut self, benefit_id: &str, period: &PeriodKey) -> bool {
        let used = self.data.toggle_usage(benefit_id, period);
        info!(benefit_id, period = %period, used, "Toggled benefit usage");
        self.save(&self.data).await;
        used
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        storage::MemoryBackend,
        test_utils::{FailingBackend, init_test_tracing},
    };

    fn key(s: &str) -> PeriodKey {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_snapshot_is_default() {
        init_test_tracing();
        let store = UsageStore::open(MemoryBackend::new()).await;
        assert_eq!(store.data(), &UserData::default());
    }

    #[tokio::test]
    async fn test_load_malformed_snapshot_is_default() {
        init_test_tracing();
        let backend = MemoryBackend::with_value(STORAGE_KEY, "{ not json");
        let store = UsageStore::open(backend).await;
        assert_eq!(store.data(), &UserData::default());
    }

    #[tokio::test]
    async fn test_load_unreadable_backend_is_default() {
        init_test_tracing();
        let store = UsageStore::open(FailingBackend).await;
        assert_eq!(store.data(), &UserData::default());
    }

    #[tokio::test]
    async fn test_toggles_are_persisted() {
        init_test_tracing();
        let mut store = UsageStore::open(MemoryBackend::new()).await;

        assert!(store.toggle_card_ownership("plat").await);
        assert!(store.toggle_benefit_usage("plat_uber", &key("2024-01")).await);

        let stored = store.backend().get(STORAGE_KEY).await.unwrap();
        let reloaded: UserData = serde_json::from_str(&stored).unwrap();
        assert_eq!(&reloaded, store.data());
        assert!(reloaded.owns("plat"));
        assert!(reloaded.is_used("plat_uber", &key("2024-01")));
    }

    #[tokio::test]
    async fn test_reopen_sees_previous_session() {
        init_test_tracing();
        let mut first = UsageStore::open(MemoryBackend::new()).await;
        first.toggle_card_ownership("gold").await;
        let stored = first.backend().get(STORAGE_KEY).await.unwrap();

        let second = UsageStore::open(MemoryBackend::with_value(STORAGE_KEY, &stored)).await;
        assert_eq!(second.data().owned_card_ids(), ["gold"]);
    }

    #[tokio::test]
    async fn test_toggle_twice_round_trips() {
        init_test_tracing();
        let mut store = UsageStore::open(MemoryBackend::new()).await;
        let period = key("2024-H1");

        store.toggle_card_ownership("csr").await;
        store.toggle_card_ownership("csr").await;
        assert!(store.data().owned_card_ids().is_empty());

        store.toggle_benefit_usage("csr_travel", &period).await;
        store.toggle_benefit_usage("csr_travel", &period).await;
        assert!(!store.data().is_used("csr_travel", &period));
    }

    #[tokio::test]
    async fn test_save_of_load_is_idempotent() {
        init_test_tracing();
        let json = r#"{"ownedCardIds":["a","b"],"usage":{"a_dining_2024-02":true,"b_hotel_2024":false,"legacy":true,"_2024":true}}"#;
        let store = UsageStore::open(MemoryBackend::with_value(STORAGE_KEY, json)).await;

        let loaded = store.load().await;
        store.save(&loaded).await;
        let again = store.load().await;

        assert_eq!(loaded, again);
        let first: serde_json::Value = serde_json::from_str(json).unwrap();
        let second: serde_json::Value =
            serde_json::from_str(&store.backend().get(STORAGE_KEY).await.unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_in_memory_state() {
        init_test_tracing();
        let mut store = UsageStore::open(FailingBackend).await;

        assert!(store.toggle_card_ownership("plat").await);
        assert!(store.toggle_benefit_usage("plat_saks", &key("2024-H2")).await);

        assert!(store.data().owns("plat"));
        assert!(store.data().is_used("plat_saks", &key("2024-H2")));
    }
}
