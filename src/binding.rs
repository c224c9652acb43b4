//! Glue between the navigation controller and an event-driven host.
//!
//! The host (the browser binding, or a test double) owns a
//! [`NavigationBinding`] and registers a [`ListenerGuard`] on its event
//! target. Observers are notified after the controller borrow is released, so
//! they may call back into the binding.

use std::cell::RefCell;

use crate::nav::{DerivedUiState, NavItem, NavigationController};

/// Window events that trigger a recomputation
pub const SCROLL_EVENTS: [&str; 2] = ["scroll", "resize"];

/// A controller shared between event callbacks plus the observer to notify
pub struct NavigationBinding<N>
where
    N: Fn(&DerivedUiState),
{
    controller: RefCell<NavigationController>,
    notify: N,
}

impl<N> NavigationBinding<N>
where
    N: Fn(&DerivedUiState),
{
    pub fn new(nav_items: Vec<NavItem>, notify: N) -> Self {
        NavigationBinding {
            controller: RefCell::new(NavigationController::new(nav_items)),
            notify,
        }
    }

    /// Run `f` against the controller, then publish the resulting state
    ///
    /// The borrow ends before the observer runs.
    pub fn update<R>(&self, f: impl FnOnce(&mut NavigationController) -> R) -> R {
        let (result, state) = {
            let mut controller = self.controller.borrow_mut();
            let result = f(&mut controller);
            (result, controller.state())
        };
        (self.notify)(&state);
        result
    }

    /// Read the controller without notifying
    pub fn read<R>(&self, f: impl FnOnce(&NavigationController) -> R) -> R {
        f(&self.controller.borrow())
    }
}

/// Something listeners can be registered on, such as the browser window
pub trait ListenerTarget {
    type Callback;
    type Error;

    fn add_listener(&self, event: &str, callback: &Self::Callback) -> Result<(), Self::Error>;
    fn remove_listener(&self, event: &str, callback: &Self::Callback);
}

/// Keeps a callback registered for a set of events until dropped
pub struct ListenerGuard<T>
where
    T: ListenerTarget,
{
    target: T,
    events: &'static [&'static str],
    callback: T::Callback,
}

impl<T> ListenerGuard<T>
where
    T: ListenerTarget,
{
    /// Register `callback` for every event. On failure, events registered so
    /// far are removed again.
    pub fn attach(
        target: T,
        events: &'static [&'static str],
        callback: T::Callback,
    ) -> Result<Self, T::Error> {
        for (i, event) in events.iter().enumerate() {
            if let Err(err) = target.add_listener(event, &callback) {
                for registered in &events[..i] {
                    target.remove_listener(registered, &callback);
                }
                return Err(err);
            }
        }
        Ok(ListenerGuard {
            target,
            events,
            callback,
        })
    }
}

impl<T> Drop for ListenerGuard<T>
where
    T: ListenerTarget,
{
    fn drop(&mut self) {
        for event in self.events {
            self.target.remove_listener(event, &self.callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{AnchorRect, ScrollState, default_nav_items};
    use std::collections::HashMap;
    use std::rc::{Rc, Weak};

    type Callback = Rc<dyn Fn()>;

    /// Event target that records registrations and can fire events
    #[derive(Clone, Default)]
    struct FakeWindow {
        listeners: Rc<RefCell<Vec<(String, Callback)>>>,
    }

    impl FakeWindow {
        fn fire(&self, event: &str) {
            let matching: Vec<Callback> = self
                .listeners
                .borrow()
                .iter()
                .filter(|(e, _)| e == event)
                .map(|(_, cb)| cb.clone())
                .collect();
            for cb in matching {
                cb();
            }
        }

        fn count(&self) -> usize {
            self.listeners.borrow().len()
        }
    }

    impl ListenerTarget for FakeWindow {
        type Callback = Callback;
        type Error = String;

        fn add_listener(&self, event: &str, callback: &Callback) -> Result<(), String> {
            if event == "broken" {
                return Err("unsupported event".to_string());
            }
            self.listeners
                .borrow_mut()
                .push((event.to_string(), callback.clone()));
            Ok(())
        }

        fn remove_listener(&self, event: &str, callback: &Callback) {
            self.listeners
                .borrow_mut()
                .retain(|(e, cb)| !(e == event && Rc::ptr_eq(cb, callback)));
        }
    }

    fn rects() -> HashMap<String, AnchorRect> {
        [("news".to_string(), AnchorRect::new(50.0, 400.0))]
            .into_iter()
            .collect()
    }

    #[test]
    fn observer_can_reenter_the_binding() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let binding: Rc<NavigationBinding<Box<dyn Fn(&DerivedUiState)>>> =
            Rc::new_cyclic(|weak: &Weak<NavigationBinding<Box<dyn Fn(&DerivedUiState)>>>| {
                let weak = weak.clone();
                let seen = seen.clone();
                let notify: Box<dyn Fn(&DerivedUiState)> = Box::new(move |state: &DerivedUiState| {
                    let binding = weak.upgrade().unwrap();
                    // Reads the controller while handling the notification
                    let active = binding.read(|c| c.active_anchor_id().map(str::to_string));
                    assert_eq!(active, state.active_anchor_id);
                    seen.borrow_mut().push(state.is_mobile_menu_open);
                    // Closing from inside the observer publishes again
                    if state.is_mobile_menu_open {
                        binding.update(|c| c.close_mobile_menu());
                    }
                });
                NavigationBinding::new(default_nav_items(), notify)
            });

        binding.update(|c| c.on_scroll(&ScrollState::new(120.0, 800.0, 2000.0), &rects()));
        assert!(binding.update(|c| c.toggle_mobile_menu()));

        assert_eq!(*seen.borrow(), vec![false, true, false]);
        assert!(!binding.read(|c| c.menu().is_open()));
        assert_eq!(binding.read(|c| c.active_anchor_id().map(str::to_string)), Some("news".to_string()));
    }

    #[test]
    fn guard_releases_listeners_on_drop() {
        let window = FakeWindow::default();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let callback: Callback = Rc::new(move || *counter.borrow_mut() += 1);

        let guard = ListenerGuard::attach(window.clone(), &SCROLL_EVENTS, callback).unwrap();
        assert_eq!(window.count(), 2);
        window.fire("scroll");
        window.fire("resize");
        assert_eq!(*calls.borrow(), 2);

        drop(guard);
        assert_eq!(window.count(), 0);
        window.fire("scroll");
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn failed_attach_rolls_back() {
        let window = FakeWindow::default();
        let callback: Callback = Rc::new(|| {});
        static EVENTS: [&str; 2] = ["scroll", "broken"];

        assert!(ListenerGuard::attach(window.clone(), &EVENTS, callback).is_err());
        assert_eq!(window.count(), 0);
    }

    #[test]
    fn reattach_after_detach_resumes_updates() {
        type Quiet = NavigationBinding<fn(&DerivedUiState)>;

        fn ignore(_: &DerivedUiState) {}

        fn toggling(binding: &Rc<Quiet>) -> Callback {
            let binding = binding.clone();
            Rc::new(move || {
                binding.update(|c| c.toggle_mobile_menu());
            })
        }

        let window = FakeWindow::default();
        let binding: Rc<Quiet> = Rc::new(NavigationBinding::new(default_nav_items(), ignore as fn(&DerivedUiState)));

        let guard = ListenerGuard::attach(window.clone(), &SCROLL_EVENTS, toggling(&binding)).unwrap();
        window.fire("scroll");
        drop(guard);
        window.fire("scroll");
        assert!(binding.read(|c| c.menu().is_open()));

        let _guard = ListenerGuard::attach(window.clone(), &SCROLL_EVENTS, toggling(&binding)).unwrap();
        window.fire("scroll");
        assert!(!binding.read(|c| c.menu().is_open()));
    }
}
