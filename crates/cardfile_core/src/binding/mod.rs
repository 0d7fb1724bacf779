//! Two-way binding between toolkit controls and model attributes.
//!
//! # Responsibility
//! - Provide the observable property cell, the control bridge, and the
//!   observable record projection the form composer binds against.
//! - Keep the composer and the persistence layer unaware of each other.
//!
//! # Invariants
//! - All binding state is single-threaded; nothing in this module is `Send`.
//! - Every registration made at bind time is released at teardown.

pub mod bridge;
pub mod observable;
pub mod property;
