//! Domain model for the contact form.
//!
//! # Responsibility
//! - Define the canonical data structures the binding and storage layers
//!   share.
//! - Keep one record-centric shape for the single-window UI.
//!
//! # Invariants
//! - The contact record is identified by a store-assigned `ContactId`.
//! - Preference state (greeting selection) never reaches the store.

pub mod contact;
pub mod greeting;
