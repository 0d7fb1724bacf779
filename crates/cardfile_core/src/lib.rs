//! Core domain logic for Cardfile, a single-record contact form.
//! This crate is the single source of truth for binding and persistence
//! behavior; the GUI toolkit layer consumes it and stays out of the repo.

pub mod binding;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use binding::bridge::{Binding, BindingError, BoundControl, EditHook};
pub use binding::observable::ObservableContact;
pub use binding::property::{Property, SubscriptionId};
pub use config::{environment_from_env, ConfigError, ConfigResult, ConnectionConfig, Environments};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactField, ContactId};
pub use model::greeting::{GreetingChoice, GREETINGS};
pub use repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
pub use service::form_session::FormSession;

/// Application display name used in window titles and the About dialog.
pub const APP_NAME: &str = "Cardfile";

const LICENSE: &str = "MIT License";

/// Returns the application version baked in at compile time.
pub fn app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Message body for the About dialog: name and version, then the license
/// notice after a blank line.
pub fn about_text() -> String {
    format!("{APP_NAME} {}\n\n{LICENSE}", app_version())
}
