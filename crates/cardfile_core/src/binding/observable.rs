//! Observable projection of one contact record.
//!
//! # Responsibility
//! - Expose each bindable contact field as a `Property<String>` the bridge
//!   can link a control to.
//! - Convert between the flat `Contact` record and the per-field properties.
//!
//! # Invariants
//! - Property order matches `ContactField::ALL`.
//! - `apply` only notifies fields whose stored text actually changed.

use std::cell::Cell;

use crate::binding::property::Property;
use crate::model::contact::{Contact, ContactField, ContactId};

/// Per-field observable view over one contact.
///
/// This is the binding target handed to the form composer: one property per
/// entry widget, plus the store id the session saves against.
#[derive(Debug)]
pub struct ObservableContact {
    id: Cell<Option<ContactId>>,
    fields: [Property<String>; ContactField::ALL.len()],
}

impl ObservableContact {
    /// Wraps a loaded (or freshly created) contact record.
    pub fn new(contact: Contact) -> Self {
        let fields = ContactField::ALL.map(|field| Property::new(contact.field(field).to_owned()));
        Self {
            id: Cell::new(contact.id),
            fields,
        }
    }

    /// Store id, if the record has been persisted.
    pub fn id(&self) -> Option<ContactId> {
        self.id.get()
    }

    /// Observable property behind one field.
    pub fn property(&self, field: ContactField) -> &Property<String> {
        &self.fields[field as usize]
    }

    /// Current text of one field.
    pub fn get(&self, field: ContactField) -> String {
        self.property(field).get()
    }

    /// Writes one field, notifying its subscribers if the text changed.
    pub fn set(&self, field: ContactField, value: impl Into<String>) {
        self.property(field).set(value.into());
    }

    /// Copies the live field values into a flat record.
    pub fn snapshot(&self) -> Contact {
        let mut contact = Contact::new_blank();
        contact.id = self.id.get();
        for field in ContactField::ALL {
            contact.set_field(field, self.get(field));
        }
        contact
    }

    /// Replaces every field from a stored record (store-to-model direction).
    ///
    /// Fields whose text is unchanged stay silent thanks to the property
    /// equality guard, so bound controls are not churned.
    pub fn apply(&self, contact: &Contact) {
        self.id.set(contact.id);
        for field in ContactField::ALL {
            self.property(field).set(contact.field(field).to_owned());
        }
    }
}
