use crate::{Selector, StateEvent, StateTree};
use serde_json::Value;
use std::rc::{Rc, Weak};

/// Implemented by anything which can hand a [Store](crate::Store) a
/// [Listener]: a weak handle to a callback.
pub trait AsListener<State, Event> {
    fn as_listener(&self) -> Listener<State, Event>;
}

/// A weak handle to a callback (usually a [Callback]) which is
/// notified of changes to the `State` of a [Store](crate::Store),
/// along with the `Event` which caused them. The store drops the
/// listener once its callback has been dropped.
pub struct Listener<State, Event>(Weak<dyn Fn(Rc<State>, Event)>);

impl<State, Event> Listener<State, Event> {
    /// The callback behind this listener, if it is still alive.
    pub fn as_callback(&self) -> Option<Callback<State, Event>> {
        self.0.upgrade().map(Callback)
    }

    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl<State, Event> Clone for Listener<State, Event> {
    fn clone(&self) -> Self {
        Listener(self.0.clone())
    }
}

impl<State, Event> AsListener<State, Event> for Listener<State, Event> {
    fn as_listener(&self) -> Listener<State, Event> {
        self.clone()
    }
}

/// Owns a closure notified of store changes. Subscriptions made with
/// it last as long as the [Callback] (or one of its clones) is alive.
pub struct Callback<State, Event>(Rc<dyn Fn(Rc<State>, Event)>);

impl<State, Event> AsListener<State, Event> for &Callback<State, Event> {
    fn as_listener(&self) -> Listener<State, Event> {
        Listener(Rc::downgrade(&self.0))
    }
}

impl<State, Event> Callback<State, Event> {
    pub fn new<C: Fn(Rc<State>, Event) + 'static>(closure: C) -> Self {
        Callback(Rc::new(closure))
    }

    pub fn emit(&self, state: Rc<State>, event: Event) {
        (self.0)(state, event)
    }
}

impl Callback<StateTree, StateEvent> {
    /// A callback which receives the value picked by `selector` from
    /// every state it is notified with.
    pub fn on_value<C: Fn(Option<&Value>) + 'static>(selector: Selector, closure: C) -> Self {
        Callback::new(move |state: Rc<StateTree>, _| closure(selector.select(&state)))
    }
}

impl<State, Event> Clone for Callback<State, Event> {
    fn clone(&self) -> Self {
        Callback(self.0.clone())
    }
}

impl<C, State, Event> From<C> for Callback<State, Event>
where
    C: Fn(Rc<State>, Event) + 'static,
{
    fn from(closure: C) -> Self {
        Callback(Rc::new(closure))
    }
}
