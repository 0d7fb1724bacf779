//! Seed data for a freshly created store.
//!
//! # Responsibility
//! - Define the canonical first contact the seed task loads.
//!
//! # Invariants
//! - Seed data is plain records; loading it goes through the repository like
//!   any other write.

use crate::model::contact::Contact;

/// The contact the seed task inserts into an empty store.
pub fn seed_contact() -> Contact {
    Contact {
        id: None,
        first_name: String::from("Chip"),
        last_name: String::from("Castle"),
        email: String::from("chip@chipcastle.com"),
        phone: String::from("555-555-5555"),
        street: String::from("Any street"),
        city: String::from("Inlet Beach"),
        state_or_province: String::from("FL"),
        zip_or_postal_code: String::from("55555"),
        country: String::from("US"),
    }
}
