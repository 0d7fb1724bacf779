//! Form session: the use-case layer behind the contact window.
//!
//! # Responsibility
//! - Load (or bootstrap) the single contact the form edits.
//! - Hand the composer its binding targets, the greeting holder and the
//!   explicit save boundary.
//!
//! # Invariants
//! - Edits accumulate in memory; the store changes only when `save` runs.
//! - `is_dirty` compares against the record state last loaded or saved.
//! - The greeting holder exists before any preferences dialog can open, so
//!   its radio binding always starts initialized.

use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::binding::bridge::{Binding, BindingError, BoundControl};
use crate::binding::observable::ObservableContact;
use crate::model::contact::{Contact, ContactField};
use crate::model::greeting::GreetingChoice;
use crate::repo::contact_repo::{ContactRepository, RepoError, RepoResult};

/// Session owning the contact being edited and its preference state.
pub struct FormSession<R: ContactRepository> {
    repo: R,
    contact: ObservableContact,
    greeting: GreetingChoice,
    baseline: RefCell<Contact>,
    bootstrapped: bool,
}

impl<R: ContactRepository> FormSession<R> {
    /// Opens the session on the earliest stored contact.
    ///
    /// # Empty-store policy
    /// - When no row exists yet, a blank contact is created and persisted
    ///   immediately, so the session always edits a real store row and the
    ///   first save is a plain update.
    pub fn open(repo: R) -> RepoResult<Self> {
        let (record, bootstrapped) = match repo.first_contact()? {
            Some(contact) => (contact, false),
            None => {
                let mut blank = Contact::new_blank();
                let id = repo.insert_contact(&blank)?;
                blank.id = Some(id);
                info!("event=contact_bootstrap module=service status=ok contact_id={id}");
                (blank, true)
            }
        };

        Ok(Self {
            repo,
            baseline: RefCell::new(record.clone()),
            contact: ObservableContact::new(record),
            greeting: GreetingChoice::new(),
            bootstrapped,
        })
    }

    /// Observable contact the composer binds its entry widgets to.
    pub fn contact(&self) -> &ObservableContact {
        &self.contact
    }

    /// Greeting selection holder for the preferences dialog.
    pub fn greeting(&self) -> &GreetingChoice {
        &self.greeting
    }

    /// Whether `open` had to create the blank first record.
    pub fn bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Binds one entry control to a contact field.
    pub fn bind_field<C>(&self, field: ContactField, control: &Rc<RefCell<C>>) -> Binding<String>
    where
        C: BoundControl<String> + 'static,
    {
        Binding::new(self.contact.property(field), control)
    }

    /// Binds one entry control to a contact field resolved by attribute
    /// name.
    ///
    /// # Errors
    /// - `BindingError::UnknownField` when `name` is not a contact
    ///   attribute. This fires while the form is being built, never later.
    pub fn bind_field_named<C>(
        &self,
        name: &str,
        control: &Rc<RefCell<C>>,
    ) -> Result<Binding<String>, BindingError>
    where
        C: BoundControl<String> + 'static,
    {
        let field = ContactField::from_name(name)
            .ok_or_else(|| BindingError::UnknownField(name.to_owned()))?;
        Ok(self.bind_field(field, control))
    }

    /// Binds a radio-group control to the greeting selection.
    pub fn bind_greeting<C>(&self, control: &Rc<RefCell<C>>) -> Binding<i64>
    where
        C: BoundControl<i64> + 'static,
    {
        Binding::new(self.greeting.selected_index(), control)
    }

    /// Whether the form holds edits the store has not seen.
    ///
    /// Editing a field back to its stored text makes the session clean
    /// again; dirtiness is a state comparison, not an edit counter.
    pub fn is_dirty(&self) -> bool {
        self.contact.snapshot() != *self.baseline.borrow()
    }

    /// Persists the current form state. This is the only write boundary;
    /// keystrokes alone never touch the store.
    pub fn save(&self) -> RepoResult<()> {
        let snapshot = self.contact.snapshot();
        self.repo.update_contact(&snapshot)?;
        *self.baseline.borrow_mut() = snapshot;
        Ok(())
    }

    /// Re-reads the stored row and pushes it through the observable fields.
    ///
    /// Bound controls follow automatically; fields whose stored text is
    /// unchanged stay silent.
    pub fn reload(&self) -> RepoResult<()> {
        let Some(id) = self.contact.id() else {
            return Err(RepoError::InvalidData(String::from(
                "session contact has no store id",
            )));
        };
        let stored = self.repo.get_contact(id)?.ok_or(RepoError::NotFound(id))?;
        self.contact.apply(&stored);
        *self.baseline.borrow_mut() = stored;
        Ok(())
    }
}
