mod database;
mod secrets;
mod state_builder;

pub use database::{build_audit_event_store, run_migrations};
pub use secrets::build_secret_provider;
pub use state_builder::build_app_state;
