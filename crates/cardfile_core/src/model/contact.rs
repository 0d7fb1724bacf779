//! Contact domain model.
//!
//! # Responsibility
//! - Define the single editable contact record and its bindable fields.
//! - Keep field access keyed by `ContactField` so binding code never relies
//!   on string-based reflection.
//!
//! # Invariants
//! - `ContactField::ALL` lists every bindable attribute in form order, and
//!   that order matches the enum's declaration order.
//! - Absent text is the empty string; the model never uses a sentinel value.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier (SQLite `INTEGER PRIMARY KEY AUTOINCREMENT`).
pub type ContactId = i64;

/// Bindable contact attributes, declared in the order the form lays its
/// entry widgets out top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    Phone,
    Street,
    City,
    StateOrProvince,
    ZipOrPostalCode,
    Country,
}

impl ContactField {
    /// Every bindable field, in form order.
    pub const ALL: [ContactField; 9] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Street,
        ContactField::City,
        ContactField::StateOrProvince,
        ContactField::ZipOrPostalCode,
        ContactField::Country,
    ];

    /// Attribute name used by bind-by-name lookups; doubles as the storage
    /// column name.
    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::FirstName => "first_name",
            ContactField::LastName => "last_name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Street => "street",
            ContactField::City => "city",
            ContactField::StateOrProvince => "state_or_province",
            ContactField::ZipOrPostalCode => "zip_or_postal_code",
            ContactField::Country => "country",
        }
    }

    /// Resolves an attribute name, or `None` when no such field exists.
    ///
    /// A `None` here is a form-construction error for callers; see
    /// `BindingError::UnknownField`.
    pub fn from_name(name: &str) -> Option<ContactField> {
        ContactField::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
    }

    /// Human-readable label shown next to the entry widget.
    pub fn label(self) -> &'static str {
        match self {
            ContactField::FirstName => "First name",
            ContactField::LastName => "Last name",
            ContactField::Email => "Email",
            ContactField::Phone => "Phone",
            ContactField::Street => "Street address",
            ContactField::City => "City",
            ContactField::StateOrProvince => "State/Province",
            ContactField::ZipOrPostalCode => "Zip/Postal code",
            ContactField::Country => "Country",
        }
    }
}

/// One contact record: the single row this application ever edits.
///
/// All nine attributes are plain text. The id is `None` until the store has
/// assigned one; timestamps stay store-managed and are not mirrored here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned id; `None` for a record that was never persisted.
    pub id: Option<ContactId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state_or_province: String,
    pub zip_or_postal_code: String,
    pub country: String,
}

impl Contact {
    /// Creates an unsaved contact with every field empty.
    pub fn new_blank() -> Self {
        Self::default()
    }

    /// Reads one field's current text.
    pub fn field(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Street => &self.street,
            ContactField::City => &self.city,
            ContactField::StateOrProvince => &self.state_or_province,
            ContactField::ZipOrPostalCode => &self.zip_or_postal_code,
            ContactField::Country => &self.country,
        }
    }

    /// Overwrites one field with the given text.
    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ContactField::FirstName => self.first_name = value,
            ContactField::LastName => self.last_name = value,
            ContactField::Email => self.email = value,
            ContactField::Phone => self.phone = value,
            ContactField::Street => self.street = value,
            ContactField::City => self.city = value,
            ContactField::StateOrProvince => self.state_or_province = value,
            ContactField::ZipOrPostalCode => self.zip_or_postal_code = value,
            ContactField::Country => self.country = value,
        }
    }
}
