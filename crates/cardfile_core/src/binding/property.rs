//! Observable value cell for two-way control binding.
//!
//! # Responsibility
//! - Hold one attribute value and notify subscribers when it changes.
//! - Guarantee equality-guarded, synchronous, re-entrancy-safe delivery.
//!
//! # Invariants
//! - Writing the current value again never notifies anyone.
//! - Listeners are never invoked recursively. A write issued from inside a
//!   listener is queued and delivered by the outer notification loop after
//!   the current round finishes.
//! - A listener unsubscribed mid-round is not called again, not even for the
//!   change already in flight.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Property::subscribe`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

struct Slot<T> {
    id: u64,
    // `None` while the listener is out being invoked, or once it has been
    // unsubscribed during its own call.
    listener: Option<Listener<T>>,
}

struct Inner<T> {
    value: T,
    next_id: u64,
    slots: Vec<Slot<T>>,
    notifying: bool,
    pending: Option<T>,
}

/// Single-threaded observable property.
///
/// Clones share one underlying cell, so a clone captured by an edit hook
/// writes through to every other handle. Nothing here is `Send`; the whole
/// binding layer lives on the UI thread.
pub struct Property<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Property<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                next_id: 0,
                slots: Vec::new(),
                notifying: false,
                pending: None,
            })),
        }
    }

    /// Registers a change listener and returns its removal handle.
    ///
    /// The listener is not called for the current value; bridges perform
    /// their own initial sync. A listener added while a notification round is
    /// running first hears about the next change.
    pub fn subscribe(&self, listener: impl FnMut(&T) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.slots.push(Slot {
            id,
            listener: Some(Box::new(listener)),
        });
        SubscriptionId(id)
    }

    /// Removes a listener. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, subscription: SubscriptionId) {
        self.inner
            .borrow_mut()
            .slots
            .retain(|slot| slot.id != subscription.0);
    }

    /// Number of live subscriptions. Teardown checks key off this.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Writes a new value and synchronously notifies every subscriber.
    ///
    /// Equal values are dropped without notification. A write that arrives
    /// while a round is already running replaces any still-queued value and
    /// is delivered once the current round completes; intermediate values a
    /// listener never got to see are skipped, latest wins.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value.clone();
            if inner.notifying {
                inner.pending = Some(value);
                return;
            }
            inner.notifying = true;
        }
        self.deliver(value);
    }

    fn deliver(&self, first: T) {
        let mut current = first;
        loop {
            // Snapshot ids up front so subscriptions added mid-round wait
            // for the next change.
            let ids: Vec<u64> = self
                .inner
                .borrow()
                .slots
                .iter()
                .map(|slot| slot.id)
                .collect();
            for id in ids {
                let taken = self
                    .inner
                    .borrow_mut()
                    .slots
                    .iter_mut()
                    .find(|slot| slot.id == id)
                    .and_then(|slot| slot.listener.take());
                let Some(mut listener) = taken else {
                    continue;
                };
                // Invoked with the cell borrow released, so the listener may
                // call get/set/unsubscribe on this same property.
                listener(&current);
                let mut inner = self.inner.borrow_mut();
                if let Some(slot) = inner.slots.iter_mut().find(|slot| slot.id == id) {
                    slot.listener = Some(listener);
                }
            }
            let queued = self.inner.borrow_mut().pending.take();
            match queued {
                Some(value) => current = value,
                None => {
                    self.inner.borrow_mut().notifying = false;
                    return;
                }
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(inner) => f
                .debug_struct("Property")
                .field("value", &inner.value)
                .field("subscribers", &inner.slots.len())
                .finish(),
            Err(_) => f.write_str("Property { <notifying> }"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Property;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn set_notifies_subscribers_with_the_new_value() {
        let property = Property::new(String::from("a"));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        property.subscribe(move |value: &String| sink.borrow_mut().push(value.clone()));

        property.set(String::from("b"));
        property.set(String::from("c"));

        assert_eq!(*seen.borrow(), vec!["b", "c"]);
        assert_eq!(property.get(), "c");
    }

    #[test]
    fn equal_value_does_not_notify() {
        let property = Property::new(5i64);
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        property.subscribe(move |_: &i64| *sink.borrow_mut() += 1);

        property.set(5);
        assert_eq!(*calls.borrow(), 0);

        property.set(6);
        property.set(6);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let property = Property::new(0i64);
        let calls = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&calls);
        let subscription = property.subscribe(move |_: &i64| *sink.borrow_mut() += 1);

        property.set(1);
        property.unsubscribe(subscription);
        property.set(2);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(property.subscriber_count(), 0);
    }

    #[test]
    fn listener_writing_back_does_not_recurse() {
        // A listener that clamps the value must not blow the stack or
        // deadlock the cell; the clamp is delivered by the outer loop.
        let property = Property::new(0i64);
        let clamp = property.clone();
        property.subscribe(move |value: &i64| {
            if *value > 10 {
                clamp.set(10);
            }
        });

        property.set(99);
        assert_eq!(property.get(), 10);
    }

    #[test]
    fn listener_sees_clamped_round_too() {
        let property = Property::new(0i64);
        let clamp = property.clone();
        property.subscribe(move |value: &i64| {
            if *value > 10 {
                clamp.set(10);
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        property.subscribe(move |value: &i64| sink.borrow_mut().push(*value));

        property.set(99);

        // First round carries 99, the queued clamp runs as a second round.
        assert_eq!(*seen.borrow(), vec![99, 10]);
    }

    #[test]
    fn unsubscribing_self_mid_round_is_safe() {
        let property = Property::new(0i64);
        let calls = Rc::new(RefCell::new(0));
        let handle = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&calls);
        let this = property.clone();
        let own = Rc::clone(&handle);
        let subscription = property.subscribe(move |_: &i64| {
            *sink.borrow_mut() += 1;
            if let Some(id) = own.borrow_mut().take() {
                this.unsubscribe(id);
            }
        });
        *handle.borrow_mut() = Some(subscription);

        property.set(1);
        property.set(2);

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(property.subscriber_count(), 0);
    }
}
