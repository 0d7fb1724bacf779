//! Bidirectional bridge between one toolkit control and one model property.
//!
//! # Responsibility
//! - Keep a control's displayed value and an observable property mutually
//!   consistent, in both directions, for the lifetime of the binding.
//! - Release every registration on drop so a closed window never receives
//!   another update.
//!
//! # Invariants
//! - Construction performs the initial model-to-control sync.
//! - A user edit reaches the property synchronously, inside the edit event.
//! - A property change reaches the control in the same call, only while the
//!   control is still alive, and only when its displayed value differs.

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::binding::property::{Property, SubscriptionId};

/// Callback a control invokes on every user edit, carrying the new value.
pub type EditHook<T> = Box<dyn FnMut(&T)>;

/// Adapter contract for a toolkit control with one bindable value.
///
/// A text entry exposes its text as `BoundControl<String>`; a radio group
/// exposes its selected index as `BoundControl<i64>`. An adapter that puts a
/// textual control over a non-string attribute does its parsing and
/// formatting here, so the bridge itself stays typed.
///
/// # Contract
/// - `set_value` updates what the user sees. Adapters should fire the edit
///   hook only for user edits; if the toolkit echoes programmatic updates,
///   the equality guards on both sides stop the loop anyway.
/// - The edit hook must be invoked with the control's cell borrow released,
///   since the property may write straight back into the same control.
pub trait BoundControl<T> {
    /// Current displayed value.
    fn value(&self) -> T;

    /// Overwrites the displayed value.
    fn set_value(&mut self, value: T);

    /// Installs or clears the user-edit callback.
    fn set_edit_hook(&mut self, hook: Option<EditHook<T>>);
}

/// Binding construction failures.
///
/// These surface while the form is being built, never during later editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The requested attribute name does not exist on the bound model.
    UnknownField(String),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::UnknownField(name) => {
                write!(f, "no bindable contact field named `{name}`")
            }
        }
    }
}

impl Error for BindingError {}

/// Live two-way link between one property and one control.
///
/// Dropping the binding unsubscribes from the property and clears the
/// control's edit hook. A control that was dropped first is simply skipped;
/// the property-side subscription already ignores dead controls.
pub struct Binding<T> {
    property: Property<T>,
    control: Weak<RefCell<dyn BoundControl<T>>>,
    subscription: SubscriptionId,
}

impl<T: Clone + PartialEq + 'static> Binding<T> {
    /// Links `property` and `control`, performing the initial sync from the
    /// model side.
    pub fn new<C>(property: &Property<T>, control: &Rc<RefCell<C>>) -> Self
    where
        C: BoundControl<T> + 'static,
    {
        let control: Rc<RefCell<dyn BoundControl<T>>> = control.clone();

        control.borrow_mut().set_value(property.get());

        let model = property.clone();
        control
            .borrow_mut()
            .set_edit_hook(Some(Box::new(move |value: &T| {
                model.set(value.clone());
            })));

        let watched = Rc::downgrade(&control);
        let subscription = property.subscribe(move |value: &T| {
            let Some(control) = watched.upgrade() else {
                return;
            };
            // Skip the write-back when the control already shows the value,
            // so an edit echoed through the model does not bounce again.
            if control.borrow().value() != *value {
                control.borrow_mut().set_value(value.clone());
            }
        });

        Self {
            property: property.clone(),
            control: Rc::downgrade(&control),
            subscription,
        }
    }

    /// Whether the bound control is still alive.
    pub fn is_control_alive(&self) -> bool {
        self.control.strong_count() > 0
    }
}

impl<T> Drop for Binding<T> {
    fn drop(&mut self) {
        self.property.unsubscribe(self.subscription);
        if let Some(control) = self.control.upgrade() {
            control.borrow_mut().set_edit_hook(None);
        }
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("control_alive", &(self.control.strong_count() > 0))
            .finish()
    }
}
