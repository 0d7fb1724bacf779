use cardfile_core::{Binding, BoundControl, EditHook, Property};
use std::cell::RefCell;
use std::rc::Rc;

/// Minimal stand-in for a toolkit text entry: a displayed string, an edit
/// hook, and a counter for programmatic updates.
#[derive(Default)]
struct StubEntry {
    text: String,
    set_value_calls: usize,
    hook: Option<EditHook<String>>,
}

impl BoundControl<String> for StubEntry {
    fn value(&self) -> String {
        self.text.clone()
    }

    fn set_value(&mut self, value: String) {
        self.text = value;
        self.set_value_calls += 1;
    }

    fn set_edit_hook(&mut self, hook: Option<EditHook<String>>) {
        self.hook = hook;
    }
}

/// Simulates the user typing: the control updates its own display first,
/// then fires the edit hook with the borrow released, like a real toolkit
/// event handler.
fn type_into(entry: &Rc<RefCell<StubEntry>>, text: &str) {
    entry.borrow_mut().text = text.to_string();
    let taken = entry.borrow_mut().hook.take();
    if let Some(mut hook) = taken {
        hook(&text.to_string());
        entry.borrow_mut().hook = Some(hook);
    }
}

#[test]
fn construction_syncs_model_value_into_control() {
    let property = Property::new(String::from("Inlet Beach"));
    let entry = Rc::new(RefCell::new(StubEntry::default()));

    let _binding = Binding::new(&property, &entry);

    assert_eq!(entry.borrow().text, "Inlet Beach");
    assert_eq!(entry.borrow().set_value_calls, 1);
    assert!(entry.borrow().hook.is_some());
}

#[test]
fn construction_overwrites_stale_control_content() {
    let property = Property::new(String::from("FL"));
    let entry = Rc::new(RefCell::new(StubEntry {
        text: String::from("stale"),
        ..StubEntry::default()
    }));

    let _binding = Binding::new(&property, &entry);

    assert_eq!(entry.borrow().text, "FL");
}

#[test]
fn each_keystroke_reaches_the_model_synchronously() {
    let property = Property::new(String::new());
    let entry = Rc::new(RefCell::new(StubEntry::default()));
    let _binding = Binding::new(&property, &entry);

    for text in ["C", "Ch", "Chi", "Chip"] {
        type_into(&entry, text);
        assert_eq!(property.get(), text);
    }
}

#[test]
fn user_edit_does_not_echo_back_into_the_control() {
    let property = Property::new(String::new());
    let entry = Rc::new(RefCell::new(StubEntry::default()));
    let _binding = Binding::new(&property, &entry);
    let baseline_calls = entry.borrow().set_value_calls;

    type_into(&entry, "Chip");

    // The subscription saw the change but the control already displayed it.
    assert_eq!(property.get(), "Chip");
    assert_eq!(entry.borrow().set_value_calls, baseline_calls);
}

#[test]
fn model_change_updates_the_control_exactly_once() {
    let property = Property::new(String::new());
    let entry = Rc::new(RefCell::new(StubEntry::default()));
    let _binding = Binding::new(&property, &entry);
    let baseline_calls = entry.borrow().set_value_calls;

    property.set(String::from("Castle"));

    assert_eq!(entry.borrow().text, "Castle");
    assert_eq!(entry.borrow().set_value_calls, baseline_calls + 1);

    // Setting the same value again is swallowed by the equality guard.
    property.set(String::from("Castle"));
    assert_eq!(entry.borrow().set_value_calls, baseline_calls + 1);
}

#[test]
fn two_controls_on_one_property_stay_in_sync() {
    let property = Property::new(String::new());
    let entry_a = Rc::new(RefCell::new(StubEntry::default()));
    let entry_b = Rc::new(RefCell::new(StubEntry::default()));
    let _binding_a = Binding::new(&property, &entry_a);
    let _binding_b = Binding::new(&property, &entry_b);

    type_into(&entry_a, "55555");

    assert_eq!(property.get(), "55555");
    assert_eq!(entry_b.borrow().text, "55555");
}

#[test]
fn dropping_the_binding_releases_subscription_and_hook() {
    let property = Property::new(String::new());
    let entry = Rc::new(RefCell::new(StubEntry::default()));
    let binding = Binding::new(&property, &entry);
    assert_eq!(property.subscriber_count(), 1);

    drop(binding);

    assert_eq!(property.subscriber_count(), 0);
    assert!(entry.borrow().hook.is_none());

    // Later model changes no longer reach the unbound control.
    property.set(String::from("late"));
    assert_eq!(entry.borrow().text, "");
}

#[test]
fn dropping_the_control_first_is_safe() {
    let property = Property::new(String::new());
    let entry = Rc::new(RefCell::new(StubEntry::default()));
    let binding = Binding::new(&property, &entry);
    assert!(binding.is_control_alive());

    drop(entry);

    assert!(!binding.is_control_alive());
    property.set(String::from("no panic"));
    assert_eq!(property.get(), "no panic");

    drop(binding);
    assert_eq!(property.subscriber_count(), 0);
}

/// Textual control over a numeric attribute: parsing and formatting live in
/// the adapter, the bridge stays typed end to end.
#[derive(Default)]
struct StubNumericEntry {
    text: String,
    hook: Option<EditHook<i64>>,
}

impl BoundControl<i64> for StubNumericEntry {
    fn value(&self) -> i64 {
        self.text.trim().parse().unwrap_or(0)
    }

    fn set_value(&mut self, value: i64) {
        self.text = value.to_string();
    }

    fn set_edit_hook(&mut self, hook: Option<EditHook<i64>>) {
        self.hook = hook;
    }
}

fn type_number(entry: &Rc<RefCell<StubNumericEntry>>, text: &str) {
    entry.borrow_mut().text = text.to_string();
    let parsed = entry.borrow().value();
    let taken = entry.borrow_mut().hook.take();
    if let Some(mut hook) = taken {
        hook(&parsed);
        entry.borrow_mut().hook = Some(hook);
    }
}

#[test]
fn numeric_attribute_binds_through_a_textual_adapter() {
    let property = Property::new(42i64);
    let entry = Rc::new(RefCell::new(StubNumericEntry::default()));
    let _binding = Binding::new(&property, &entry);

    assert_eq!(entry.borrow().text, "42");

    property.set(13);
    assert_eq!(entry.borrow().text, "13");

    type_number(&entry, "7");
    assert_eq!(property.get(), 7);
}
