//! Backend for the waitboard status display.
//!
//! Exposes the provider list from a Postgres table as plain JSON-over-HTTP
//! CRUD, consumed by the admin panel and the public display board.

pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

pub use app::build_app;
pub use config::Config;
