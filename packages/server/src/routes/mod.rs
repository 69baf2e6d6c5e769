pub mod health;
pub mod providers;

pub use health::health_handler;
pub use providers::{create_provider, delete_provider, list_providers, update_provider};
