//! Mock implementation of [`ProviderApi`] for tests.
//!
//! Behaves like a tiny in-memory provider resource: `create` assigns ids,
//! `update`/`delete` apply to the canned collection, and every call is
//! recorded so tests can assert on exactly what went over the wire.
//! Failures are scripted with [`MockProviderApi::fail_next`].

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::ProviderApi;
use crate::error::ApiError;
use crate::types::{NewProvider, Provider, ProviderId};

pub struct MockProviderApi {
    providers: Mutex<Vec<Provider>>,
    next_id: AtomicI64,
    list_calls: AtomicUsize,
    create_calls: Mutex<Vec<NewProvider>>,
    update_calls: Mutex<Vec<Provider>>,
    delete_calls: Mutex<Vec<ProviderId>>,
    fail_next: Mutex<Option<ApiError>>,
}

impl MockProviderApi {
    pub fn new() -> Self {
        Self {
            providers: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            list_calls: AtomicUsize::new(0),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Seed the canned collection with a record.
    pub fn with_provider(self, provider: Provider) -> Self {
        {
            let mut providers = self.providers.lock().unwrap();
            let floor = provider.id.0 + 1;
            if self.next_id.load(Ordering::SeqCst) < floor {
                self.next_id.store(floor, Ordering::SeqCst);
            }
            providers.push(provider);
        }
        self
    }

    /// Script the next call (of any operation) to fail with `error`.
    pub fn fail_next(&self, error: ApiError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    /// Drop every canned record, as if another client emptied the table.
    pub fn clear_providers(&self) {
        self.providers.lock().unwrap().clear();
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> Vec<NewProvider> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<Provider> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<ProviderId> {
        self.delete_calls.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Option<ApiError> {
        self.fail_next.lock().unwrap().take()
    }
}

impl Default for MockProviderApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderApi for MockProviderApi {
    async fn list(&self) -> Result<Vec<Provider>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn create(&self, input: &NewProvider) -> Result<Provider, ApiError> {
        self.create_calls.lock().unwrap().push(input.clone());
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let created = Provider {
            id: ProviderId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: input.name.clone(),
            wait_time: input.wait_time,
            visible: input.visible,
            show_wait_time: input.show_wait_time,
        };
        self.providers.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, provider: &Provider) -> Result<(), ApiError> {
        self.update_calls.lock().unwrap().push(provider.clone());
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut providers = self.providers.lock().unwrap();
        match providers.iter_mut().find(|p| p.id == provider.id) {
            Some(slot) => {
                *slot = provider.clone();
                Ok(())
            }
            None => Err(ApiError::Api {
                status: 404,
                body: format!("provider {} not found", provider.id),
            }),
        }
    }

    async fn delete(&self, id: ProviderId) -> Result<(), ApiError> {
        self.delete_calls.lock().unwrap().push(id);
        if let Some(error) = self.take_failure() {
            return Err(error);
        }
        let mut providers = self.providers.lock().unwrap();
        let before = providers.len();
        providers.retain(|p| p.id != id);
        if providers.len() == before {
            return Err(ApiError::Api {
                status: 404,
                body: format!("provider {id} not found"),
            });
        }
        Ok(())
    }
}
