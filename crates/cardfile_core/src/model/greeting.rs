//! Greeting preference model.
//!
//! # Responsibility
//! - Hold the static greeting list the preferences dialog offers.
//! - Own the dialog's selected-index state behind an observable property.
//!
//! # Invariants
//! - The selected index is initialized before any dialog can bind to it.
//! - Selection state is in-memory only; nothing here touches the store.

use crate::binding::property::Property;

/// Greeting texts offered by the preferences dialog, in display order.
pub const GREETINGS: [&str; 2] = ["Hello, World!", "Howdy, Partner!"];

/// Selection holder the preferences dialog binds its radio group to.
///
/// The session constructs this before any dialog opens, so a radio binding
/// always starts from a defined index rather than an unset one.
#[derive(Debug)]
pub struct GreetingChoice {
    selected_index: Property<i64>,
}

impl GreetingChoice {
    /// Creates a holder pointing at the first greeting.
    pub fn new() -> Self {
        Self {
            selected_index: Property::new(0),
        }
    }

    /// Observable selected index, bindable to a radio-group control.
    pub fn selected_index(&self) -> &Property<i64> {
        &self.selected_index
    }

    /// Resolves the currently selected greeting text.
    ///
    /// An index outside the list falls back to the first greeting, so the
    /// caller always gets something displayable.
    pub fn selected_text(&self) -> &'static str {
        usize::try_from(self.selected_index.get())
            .ok()
            .and_then(|index| GREETINGS.get(index).copied())
            .unwrap_or(GREETINGS[0])
    }
}

impl Default for GreetingChoice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GreetingChoice, GREETINGS};

    #[test]
    fn starts_on_the_first_greeting() {
        let choice = GreetingChoice::new();
        assert_eq!(choice.selected_index().get(), 0);
        assert_eq!(choice.selected_text(), GREETINGS[0]);
    }

    #[test]
    fn follows_the_selected_index() {
        let choice = GreetingChoice::new();
        choice.selected_index().set(1);
        assert_eq!(choice.selected_text(), "Howdy, Partner!");
    }

    #[test]
    fn out_of_range_index_falls_back_to_first() {
        let choice = GreetingChoice::new();
        choice.selected_index().set(17);
        assert_eq!(choice.selected_text(), GREETINGS[0]);
        choice.selected_index().set(-1);
        assert_eq!(choice.selected_text(), GREETINGS[0]);
    }
}
