//! Provider store client.
//!
//! Owns the local provider list and keeps it synchronized with the remote
//! resource. All mutations go through a confirmed remote round-trip; nothing
//! is applied optimistically. Every failure ends here: it is converted to a
//! human-readable message in a single current-error slot so a consuming
//! surface can render it instead of crashing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::api::ProviderApi;
use crate::error::{ApiError, StoreError};
use crate::types::{DisplayEntry, NewProvider, Provider, ProviderId};

#[derive(Default)]
struct StoreState {
    providers: Vec<Provider>,
    last_error: Option<String>,
    /// Pending wait-time text per in-progress edit gesture. Kept out of the
    /// canonical records so a poll's full-list replace cannot clobber it.
    edits: HashMap<ProviderId, String>,
}

/// Point-in-time copy of the store for rendering (admin view).
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub providers: Vec<Provider>,
    pub last_error: Option<String>,
    pub edits: HashMap<ProviderId, String>,
}

/// In-memory provider list synchronized against the remote resource.
///
/// Shared by handle (`Arc<ProviderStore>`); the lock is only held for local
/// state, never across a remote await. Overlapping refreshes are tolerated:
/// last response wins.
pub struct ProviderStore {
    api: Arc<dyn ProviderApi>,
    state: Mutex<StoreState>,
}

impl ProviderStore {
    pub fn new(api: Arc<dyn ProviderApi>) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    // ---------------------------------------------------------------------
    // Read views
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.lock().unwrap();
        StoreSnapshot {
            providers: state.providers.clone(),
            last_error: state.last_error.clone(),
            edits: state.edits.clone(),
        }
    }

    /// All records, insertion order preserved (admin list).
    pub fn providers(&self) -> Vec<Provider> {
        self.state.lock().unwrap().providers.clone()
    }

    /// The public display projection: visible providers only, wait time
    /// masked when `show_wait_time` is off.
    pub fn display_entries(&self) -> Vec<DisplayEntry> {
        let state = self.state.lock().unwrap();
        state
            .providers
            .iter()
            .filter(|p| p.visible)
            .map(|p| DisplayEntry {
                name: p.name.clone(),
                wait_time: p.show_wait_time.then_some(p.wait_time),
            })
            .collect()
    }

    /// The current-error slot. `None` once a cycle succeeds again.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().last_error.clone()
    }

    // ---------------------------------------------------------------------
    // Synchronization
    // ---------------------------------------------------------------------

    /// Fetch the full collection and replace the local list wholesale.
    ///
    /// On a transport or server error the list is left untouched; the next
    /// scheduled poll is the implicit retry. A malformed (non-list) payload
    /// degrades the list to empty so the display keeps rendering.
    pub async fn refresh(&self) -> Result<(), StoreError> {
        match self.api.list().await {
            Ok(providers) => {
                let mut state = self.state.lock().unwrap();
                // Open edit gestures survive the replace; only gestures for
                // records that no longer exist are dropped.
                state
                    .edits
                    .retain(|id, _| providers.iter().any(|p| p.id == *id));
                debug!(count = providers.len(), "provider list refreshed");
                state.providers = providers;
                state.last_error = None;
                Ok(())
            }
            Err(err @ ApiError::UnexpectedShape) => {
                let mut state = self.state.lock().unwrap();
                state.providers.clear();
                state.edits.clear();
                state.last_error = Some(err.to_string());
                Err(err.into())
            }
            Err(err) => {
                self.state.lock().unwrap().last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    // ---------------------------------------------------------------------
    // Mutations (confirmed round-trips)
    // ---------------------------------------------------------------------

    /// Validate and create a provider; the server-returned canonical record
    /// is appended to the local list.
    ///
    /// `wait_time` is accepted as text, matching the input surface: it must
    /// parse to a non-negative integer or the call is rejected locally with
    /// no remote round-trip.
    pub async fn create(&self, name: &str, wait_time: &str) -> Result<Provider, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.fail(StoreError::Validation(
                "provider name is required".to_string(),
            )));
        }
        let wait_time = match parse_wait_time(wait_time) {
            Some(minutes) => minutes,
            None => {
                return Err(self.fail(StoreError::Validation(
                    "wait time must be a non-negative number of minutes".to_string(),
                )))
            }
        };

        let input = NewProvider::new(name, wait_time);
        match self.api.create(&input).await {
            Ok(created) => {
                let mut state = self.state.lock().unwrap();
                debug!(id = %created.id, name = %created.name, "provider created");
                state.providers.push(created.clone());
                state.last_error = None;
                Ok(created)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Delete a provider remotely; the local record is removed only after
    /// the server confirms.
    pub async fn remove(&self, id: ProviderId) -> Result<(), StoreError> {
        match self.api.delete(id).await {
            Ok(()) => {
                let mut state = self.state.lock().unwrap();
                state.providers.retain(|p| p.id != id);
                state.edits.remove(&id);
                state.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Flip a provider's inclusion in the public display.
    pub async fn toggle_visible(&self, id: ProviderId) -> Result<Provider, StoreError> {
        let mut updated = self.find(id)?;
        updated.visible = !updated.visible;
        self.push_update(updated).await
    }

    /// Flip whether a provider's wait time is rendered on the display.
    pub async fn toggle_show_wait_time(&self, id: ProviderId) -> Result<Provider, StoreError> {
        let mut updated = self.find(id)?;
        updated.show_wait_time = !updated.show_wait_time;
        self.push_update(updated).await
    }

    /// Adjust a provider's wait time by a fixed step, clamped at zero.
    pub async fn adjust_wait_time(
        &self,
        id: ProviderId,
        delta: i32,
    ) -> Result<Provider, StoreError> {
        let mut updated = self.find(id)?;
        updated.wait_time = (updated.wait_time + delta).max(0);
        self.push_update(updated).await
    }

    // ---------------------------------------------------------------------
    // Manual edit gesture
    // ---------------------------------------------------------------------

    /// Open an edit gesture, seeding the pending text from the current
    /// wait time.
    pub fn begin_edit(&self, id: ProviderId) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(current) = state.providers.iter().find(|p| p.id == id) else {
            let err = StoreError::UnknownId(id);
            state.last_error = Some(err.to_string());
            return Err(err);
        };
        let seed = current.wait_time.to_string();
        state.edits.insert(id, seed);
        Ok(())
    }

    /// Update the pending text of an open edit gesture.
    ///
    /// Only the empty string or an ASCII digit sequence is accepted, stored
    /// verbatim; anything else (sign, letters, decimals) is ignored and the
    /// pending value stays as it was. Returns whether the text was accepted.
    pub fn change_edit_value(&self, id: ProviderId, text: &str) -> bool {
        if !text.is_empty() && !text.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        let mut state = self.state.lock().unwrap();
        match state.edits.get_mut(&id) {
            Some(pending) => {
                *pending = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Commit an open edit gesture: parse the pending text and push the
    /// updated record. Unparseable input sets a validation error, makes no
    /// remote call, and leaves the gesture open.
    pub async fn commit_edit(&self, id: ProviderId) -> Result<Provider, StoreError> {
        let (pending, mut updated) = {
            let mut state = self.state.lock().unwrap();
            let Some(pending) = state.edits.get(&id).cloned() else {
                let err =
                    StoreError::Validation(format!("no edit in progress for provider {id}"));
                state.last_error = Some(err.to_string());
                return Err(err);
            };
            let Some(current) = state.providers.iter().find(|p| p.id == id).cloned() else {
                let err = StoreError::UnknownId(id);
                state.last_error = Some(err.to_string());
                return Err(err);
            };
            (pending, current)
        };

        let wait_time = match parse_wait_time(&pending) {
            Some(minutes) => minutes,
            None => {
                return Err(self.fail(StoreError::Validation(
                    "wait time must be a non-negative number of minutes".to_string(),
                )))
            }
        };
        updated.wait_time = wait_time;

        let committed = self.push_update(updated).await?;
        self.state.lock().unwrap().edits.remove(&id);
        Ok(committed)
    }

    /// Abandon an open edit gesture; no remote effect.
    pub fn cancel_edit(&self, id: ProviderId) {
        self.state.lock().unwrap().edits.remove(&id);
    }

    /// Whether an edit gesture is open for the given id.
    pub fn is_editing(&self, id: ProviderId) -> bool {
        self.state.lock().unwrap().edits.contains_key(&id)
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    /// Clone the local record for id, recording an error if it is unknown.
    fn find(&self, id: ProviderId) -> Result<Provider, StoreError> {
        let mut state = self.state.lock().unwrap();
        match state.providers.iter().find(|p| p.id == id).cloned() {
            Some(provider) => Ok(provider),
            None => {
                let err = StoreError::UnknownId(id);
                state.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Full-record remote update; the local record is replaced only on
    /// confirmation.
    async fn push_update(&self, updated: Provider) -> Result<Provider, StoreError> {
        match self.api.update(&updated).await {
            Ok(()) => {
                let mut state = self.state.lock().unwrap();
                if let Some(slot) = state.providers.iter_mut().find(|p| p.id == updated.id) {
                    *slot = updated.clone();
                }
                state.last_error = None;
                Ok(updated)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Record an error in the current-error slot and hand it back.
    fn fail(&self, err: StoreError) -> StoreError {
        self.state.lock().unwrap().last_error = Some(err.to_string());
        err
    }
}

/// Parse user-entered wait-time text: digits only, non-negative.
fn parse_wait_time(text: &str) -> Option<i32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProviderApi;
    use tokio_test::assert_ok;

    fn store_with(api: MockProviderApi) -> (Arc<MockProviderApi>, ProviderStore) {
        let api = Arc::new(api);
        let store = ProviderStore::new(api.clone());
        (api, store)
    }

    fn seeded() -> MockProviderApi {
        MockProviderApi::new().with_provider(Provider {
            id: ProviderId(1),
            name: "Dr. Johnson".to_string(),
            wait_time: 5,
            visible: true,
            show_wait_time: true,
        })
    }

    #[tokio::test]
    async fn create_appends_server_record_once() {
        let (api, store) = store_with(MockProviderApi::new());

        let created = store.create("  Dr. Chen  ", "15").await.unwrap();
        assert_eq!(created.name, "Dr. Chen");
        assert_eq!(created.wait_time, 15);
        assert_eq!(api.create_calls().len(), 1);

        let providers = store.providers();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, created.id);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn create_rejects_blank_name_without_remote_call() {
        let (api, store) = store_with(MockProviderApi::new());

        let err = store.create("   ", "5").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(api.create_calls().is_empty());
        assert!(store.last_error().is_some());
        assert!(store.providers().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_non_numeric_wait_time() {
        let (api, store) = store_with(MockProviderApi::new());

        assert!(store.create("Dr. Chen", "-3").await.is_err());
        assert!(store.create("Dr. Chen", "soon").await.is_err());
        assert!(store.create("Dr. Chen", "1.5").await.is_err());
        assert!(api.create_calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_list_and_clears_error() {
        let (api, store) = store_with(seeded());

        api.fail_next(ApiError::Network("connection refused".to_string()));
        assert!(store.refresh().await.is_err());
        assert!(store.last_error().is_some());
        // prior list untouched by a transport failure
        assert!(store.providers().is_empty());

        store.refresh().await.unwrap();
        assert_eq!(store.providers().len(), 1);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn refresh_network_error_keeps_prior_list() {
        let (api, store) = store_with(seeded());
        tokio_test::assert_ok!(store.refresh().await);
        assert_eq!(store.providers().len(), 1);

        api.fail_next(ApiError::Network("timed out".to_string()));
        assert!(store.refresh().await.is_err());
        assert_eq!(store.providers().len(), 1);
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn malformed_list_payload_empties_list_and_sets_error() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();
        assert_eq!(store.providers().len(), 1);

        api.fail_next(ApiError::UnexpectedShape);
        assert!(store.refresh().await.is_err());
        assert!(store.providers().is_empty());
        assert!(store.last_error().is_some());

        // next successful poll restores the list and clears the error
        store.refresh().await.unwrap();
        assert_eq!(store.providers().len(), 1);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn remove_only_after_confirmation() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        api.fail_next(ApiError::Api {
            status: 500,
            body: "boom".to_string(),
        });
        assert!(store.remove(ProviderId(1)).await.is_err());
        assert_eq!(store.providers().len(), 1, "no optimistic removal");

        store.remove(ProviderId(1)).await.unwrap();
        assert!(store.providers().is_empty());
        assert_eq!(api.delete_calls(), vec![ProviderId(1), ProviderId(1)]);
    }

    #[tokio::test]
    async fn double_toggle_restores_visibility() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        let original = store.providers()[0].visible;
        store.toggle_visible(ProviderId(1)).await.unwrap();
        assert_eq!(store.providers()[0].visible, !original);
        store.toggle_visible(ProviderId(1)).await.unwrap();
        assert_eq!(store.providers()[0].visible, original);
        assert_eq!(api.update_calls().len(), 2);
    }

    #[tokio::test]
    async fn adjust_wait_time_clamps_at_zero() {
        let (_api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        let updated = store.adjust_wait_time(ProviderId(1), -10).await.unwrap();
        assert_eq!(updated.wait_time, 0);
        assert_eq!(store.providers()[0].wait_time, 0);
    }

    #[tokio::test]
    async fn update_failure_leaves_pre_attempt_state() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        api.fail_next(ApiError::Network("unreachable".to_string()));
        assert!(store.adjust_wait_time(ProviderId(1), 5).await.is_err());
        assert_eq!(store.providers()[0].wait_time, 5);
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn unknown_id_is_rejected_locally() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        let err = store.toggle_visible(ProviderId(99)).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownId(_)));
        assert!(api.update_calls().is_empty());
    }

    #[tokio::test]
    async fn edit_gesture_accepts_digits_and_empty_only() {
        let (_api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        store.begin_edit(ProviderId(1)).unwrap();
        assert_eq!(store.snapshot().edits[&ProviderId(1)], "5");

        assert!(store.change_edit_value(ProviderId(1), ""));
        assert!(store.change_edit_value(ProviderId(1), "7"));
        assert!(!store.change_edit_value(ProviderId(1), "-3"));
        assert!(!store.change_edit_value(ProviderId(1), "7a"));
        assert!(!store.change_edit_value(ProviderId(1), "1.5"));
        assert_eq!(store.snapshot().edits[&ProviderId(1)], "7");
    }

    #[tokio::test]
    async fn commit_edit_updates_record_and_closes_gesture() {
        let (api, store) = store_with(seeded());
        tokio_test::assert_ok!(store.refresh().await);

        store.begin_edit(ProviderId(1)).unwrap();
        assert!(store.change_edit_value(ProviderId(1), "7"));
        let committed = store.commit_edit(ProviderId(1)).await.unwrap();
        assert_eq!(committed.wait_time, 7);
        assert_eq!(store.providers()[0].wait_time, 7);
        assert!(!store.is_editing(ProviderId(1)));
        assert_eq!(api.update_calls().len(), 1);
    }

    #[tokio::test]
    async fn commit_edit_rejects_empty_value_and_stays_open() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        store.begin_edit(ProviderId(1)).unwrap();
        assert!(store.change_edit_value(ProviderId(1), ""));
        let err = store.commit_edit(ProviderId(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(api.update_calls().is_empty());
        assert!(store.is_editing(ProviderId(1)));
        assert!(store.last_error().is_some());
    }

    #[tokio::test]
    async fn cancel_edit_has_no_remote_effect() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        store.begin_edit(ProviderId(1)).unwrap();
        store.cancel_edit(ProviderId(1));
        assert!(!store.is_editing(ProviderId(1)));
        assert!(api.update_calls().is_empty());
        assert_eq!(store.providers()[0].wait_time, 5);
    }

    #[tokio::test]
    async fn open_edits_survive_refresh_until_record_disappears() {
        let (api, store) = store_with(seeded());
        store.refresh().await.unwrap();

        store.begin_edit(ProviderId(1)).unwrap();
        assert!(store.change_edit_value(ProviderId(1), "42"));

        // a poll landing mid-edit must not clobber the pending text
        store.refresh().await.unwrap();
        assert_eq!(store.snapshot().edits[&ProviderId(1)], "42");

        // but once the record is gone remotely, the gesture is pruned
        api.clear_providers();
        store.refresh().await.unwrap();
        assert!(!store.is_editing(ProviderId(1)));
    }

    #[tokio::test]
    async fn display_projection_filters_and_masks() {
        let api = MockProviderApi::new()
            .with_provider(Provider {
                id: ProviderId(1),
                name: "Dr. Johnson".to_string(),
                wait_time: 5,
                visible: true,
                show_wait_time: true,
            })
            .with_provider(Provider {
                id: ProviderId(2),
                name: "Dr. Chen".to_string(),
                wait_time: 20,
                visible: true,
                show_wait_time: false,
            })
            .with_provider(Provider {
                id: ProviderId(3),
                name: "Dr. Patel".to_string(),
                wait_time: 10,
                visible: false,
                show_wait_time: true,
            });
        let (_api, store) = store_with(api);
        store.refresh().await.unwrap();

        let entries = store.display_entries();
        assert_eq!(
            entries,
            vec![
                DisplayEntry {
                    name: "Dr. Johnson".to_string(),
                    wait_time: Some(5),
                },
                DisplayEntry {
                    name: "Dr. Chen".to_string(),
                    wait_time: None,
                },
            ]
        );
    }
}
