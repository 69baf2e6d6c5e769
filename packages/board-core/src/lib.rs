//! Synchronization core for the waitboard status display.
//!
//! Keeps a local provider list consistent with a remote provider resource
//! under intermittent connectivity and surface visibility changes.
//!
//! Two pieces:
//!
//! - [`ProviderStore`] owns the local list and routes every mutation through
//!   a confirmed remote round-trip.
//! - [`PollScheduler`] decides when the store refreshes: fixed-interval
//!   polling while the display surface is visible, suspended while hidden,
//!   with an immediate resync on recovery.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use board_core::{HttpProviderApi, Mode, PollScheduler, ProviderStore};
//!
//! let api = Arc::new(HttpProviderApi::new("http://localhost:8080"));
//! let store = Arc::new(ProviderStore::new(api));
//! let scheduler = PollScheduler::new(store.clone());
//! scheduler.set_mode(Mode::Display);
//!
//! // ... render store.display_entries() until shutdown ...
//! scheduler.shutdown();
//! ```

pub mod api;
pub mod error;
pub mod scheduler;
pub mod store;
pub mod testing;
pub mod types;

pub use api::{HttpProviderApi, ProviderApi};
pub use error::{ApiError, StoreError};
pub use scheduler::{Mode, PollScheduler, CLOCK_TICK_INTERVAL, DATA_POLL_INTERVAL};
pub use store::{ProviderStore, StoreSnapshot};
pub use types::{DisplayEntry, NewProvider, Provider, ProviderId};
