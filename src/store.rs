use crate::{
    middleware::{Middleware, ReduceMiddlewareResult},
    AsListener, Listener, Reducer, StoreEvent,
};
use std::iter::FromIterator;
use std::ops::Deref;
use std::{
    cell::{Cell, RefCell},
    collections::{HashSet, VecDeque},
    fmt::Debug,
    hash::Hash,
    rc::Rc,
};

/// A [Listener] associated with (listening to) a given set of
/// `Events`s produced by a [Store::dispatch()].
struct ListenerEventPair<State, Event> {
    pub listener: Listener<State, Event>,
    pub events: HashSet<Event>,
}

impl<State, Event> Debug for ListenerEventPair<State, Event> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ListenerEventPair")
    }
}

/// A modification to the [Store], to be stored in a queue and
/// executed at the start of a [Store::dispatch()] for a given
/// `Action`.
enum StoreModification<State, Action, Event> {
    AddListener(ListenerEventPair<State, Event>),
    AddMiddleware(Rc<dyn Middleware<State, Action, Event>>),
    ReplaceReducer(Box<dyn Reducer<State, Action, Event>>),
}

/// A wrapper for an [Rc] reference to a [Store].
///
/// This wrapper exists to provide a standard interface for re-useable
/// middleware and other components which may require a long living
/// reference to the store in order to dispatch actions or modify it
/// in some manner that could not be handled by a simple `&Store`.
pub struct StoreRef<State, Action, Event>(Rc<Store<State, Action, Event>>);

impl<State, Action, Event> StoreRef<State, Action, Event>
where
    Event: StoreEvent + Clone + Hash + Eq,
{
    pub fn new<R: Reducer<State, Action, Event> + 'static>(
        reducer: R,
        initial_state: State,
    ) -> Self {
        Self(Rc::new(Store::new(reducer, initial_state)))
    }
}

impl<State, Action, Event> Clone for StoreRef<State, Action, Event> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<State, Action, Event> Deref for StoreRef<State, Action, Event> {
    type Target = Store<State, Action, Event>;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl<State, Action, Event> PartialEq for StoreRef<State, Action, Event> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// This struct is designed to operate as a central source of truth
/// and global "immutable" state within your application.
///
/// The current state of this store ([Store::state()]) can only be
/// modified by dispatching an `Action` via [Store::dispatch()] to the
/// store. These actions are taken by a [Reducer] which you provided
/// to the store (at construction, or later with
/// [Store::replace_reducer()]) and a new current state is produced.
/// The reducer also produces `Events` associated with the change. The
/// previous state is never mutated, and remains as a reference for
/// any element of your application which may rely upon it.
///
/// Listeners can susbscribe to changes to the `State` in this store
/// (and `Event`s produced) with [Store::subscribe()], or they can
/// also subscribe to changes associated with specific `Event`s via
/// [subscribe_event()](Store::subscribe_event())/[subscribe_events()](Store::subscribe_events()).
pub struct Store<State, Action, Event> {
    /// This lock is used to prevent dispatch recursion.
    dispatch_lock: RefCell<()>,
    /// Queue of actions to be dispatched by [Store::dispatch()].
    dispatch_queue: RefCell<VecDeque<Action>>,
    /// Queue of [StoreModification]s to be executed by
    /// [Store::dispatch()] before the next `Action` is dispatched.
    modification_queue: RefCell<VecDeque<StoreModification<State, Action, Event>>>,
    /// The [Reducer] for this store, which takes `Actions`, produces
    /// the next `State` stored in this store, and produces `Events`
    /// to be sent to the store listeners.
    reducer: RefCell<Box<dyn Reducer<State, Action, Event>>>,
    /// The current state of this store.
    state: RefCell<Rc<State>>,
    /// The listeners which are notified of changes to the state of
    /// this store, and events produced by this store during a
    /// [Store::dispatch()].
    listeners: RefCell<Vec<ListenerEventPair<State, Event>>>,
    /// Middleware which modifies the functionality of this store.
    middleware: RefCell<Vec<Rc<dyn Middleware<State, Action, Event>>>>,
    /// Used during recursive execution of [Middleware] to keep track
    /// of the middleware currently executing. It is an index into
    /// [Store::middleware].
    prev_middleware: Cell<i32>,
    /// Set by [Store::with_synchronous_dispatch()].
    synchronous_dispatch: Cell<bool>,
}

impl<State, Action, Event> Store<State, Action, Event>
where
    Event: StoreEvent + Clone + Hash + Eq,
{
    /// Create a new [Store], which uses the specified `reducer` to
    /// handle `Action`s which produce the next state and `Event`s,
    /// starting from `initial_state`.
    pub fn new<R: Reducer<State, Action, Event> + 'static>(
        reducer: R,
        initial_state: State,
    ) -> Self {
        Self {
            dispatch_lock: RefCell::new(()),
            dispatch_queue: RefCell::new(VecDeque::new()),
            modification_queue: RefCell::new(VecDeque::new()),
            reducer: RefCell::new(Box::new(reducer)),
            state: RefCell::new(Rc::new(initial_state)),
            listeners: RefCell::new(Vec::new()),
            middleware: RefCell::new(Vec::new()),
            prev_middleware: Cell::new(-1),
            synchronous_dispatch: Cell::new(false),
        }
    }

    /// Get the current `State` stored in this store.
    ///
    /// Modifications to this state need to be performed by
    /// dispatching an `Action` to the store using
    /// [dispatch()](Store::dispatch()).
    pub fn state(&self) -> Rc<State> {
        self.state.borrow().clone()
    }

    /// Dispatch an `Action` to the reducer on this `Store` without
    /// invoking middleware.
    fn dispatch_reducer(&self, action: &Action) -> ReduceMiddlewareResult<Event> {
        let result = self.reducer.borrow().reduce(&self.state(), action);
        *self.state.borrow_mut() = result.state;

        ReduceMiddlewareResult {
            events: result.events,
        }
    }

    /// Dispatch an `Action` to the reducer on this `Store`, invoking
    /// all middleware's [on_reduce()][Middleware::on_reduce()] first.
    fn middleware_reduce(&self, action: &Action) -> ReduceMiddlewareResult<Event> {
        self.prev_middleware.set(-1);
        self.middleware_reduce_next(Some(action))
    }

    /// A recursive function which executes each middleware for this
    /// store, and invokes the next middleware, until all middleware
    /// has been invoked, at which point the `Action` is sent to the
    /// reducer.
    fn middleware_reduce_next(&self, action: Option<&Action>) -> ReduceMiddlewareResult<Event> {
        let current_middleware = self.prev_middleware.get() + 1;
        self.prev_middleware.set(current_middleware);

        if current_middleware == self.middleware.borrow().len() as i32 {
            return match action {
                Some(action) => self.dispatch_reducer(action),
                None => ReduceMiddlewareResult::default(),
            };
        }

        let middleware = self.middleware.borrow()[current_middleware as usize].clone();
        middleware.on_reduce(self, action, Self::middleware_reduce_next)
    }

    /// Notify store listeners of events produced during a reduce as a
    /// result of an `Action` being dispatched. Invokes all
    /// middleware's [on_notify()][Middleware::on_notify()] first.
    fn middleware_notify(&self, events: Vec<Event>) -> Vec<Event> {
        self.prev_middleware.set(-1);
        self.middleware_notify_next(events)
    }

    /// A recursive function which executes each middleware for this
    /// store, and invokes the next middleware, until all middleware
    /// has been invoked, at which point the events are returned to
    /// be sent to the listeners.
    fn middleware_notify_next(&self, events: Vec<Event>) -> Vec<Event> {
        let current_middleware = self.prev_middleware.get() + 1;
        self.prev_middleware.set(current_middleware);

        if current_middleware == self.middleware.borrow().len() as i32 {
            return events;
        }

        let middleware = self.middleware.borrow()[current_middleware as usize].clone();
        middleware.on_notify(self, events, Self::middleware_notify_next)
    }

    /// Notify store listeners of events produced as a result of an
    /// `Action` being dispatched.
    fn notify_listeners(&self, events: Vec<Event>) {
        let mut listeners_to_remove: Vec<usize> = Vec::new();
        for (i, pair) in self.listeners.borrow().iter().enumerate() {
            let retain = match pair.listener.as_callback() {
                Some(callback) => {
                    if pair.events.is_empty() {
                        callback.emit(self.state(), Event::none());
                    } else {
                        //  call the listener for every matching listener event
                        for event in &events {
                            if pair.events.contains(event) {
                                callback.emit(self.state(), event.clone());
                            }
                        }
                    }

                    true
                }
                None => false,
            };

            if !retain {
                listeners_to_remove.insert(0, i);
            }
        }

        for index in listeners_to_remove {
            self.listeners.borrow_mut().swap_remove(index);
        }
    }

    fn process_pending_modifications(&self) {
        while let Some(modification) = self.modification_queue.borrow_mut().pop_front() {
            match modification {
                StoreModification::AddListener(listener_pair) => {
                    self.listeners.borrow_mut().push(listener_pair);
                }
                StoreModification::AddMiddleware(middleware) => {
                    log::debug!(
                        "adding middleware, {} installed",
                        self.middleware.borrow().len() + 1
                    );
                    self.middleware.borrow_mut().push(middleware);
                }
                StoreModification::ReplaceReducer(reducer) => {
                    log::debug!("replacing reducer");
                    let state = reducer.reconcile(&self.state());
                    *self.state.borrow_mut() = state;
                    *self.reducer.borrow_mut() = reducer;
                }
            }
        }
    }

    /// Dispatch an `Action` to be passed to the [Reducer] in order to
    /// produce the next `State` in this store, and `Events` to be
    /// sent to the store listeners.
    ///
    /// Actions dispatched while a dispatch is already in progress
    /// (from middleware or a listener) are queued, and reduced
    /// before the outermost call returns.
    pub fn dispatch<A: Into<Action>>(&self, action: A) {
        self.dispatch_impl(action.into());
    }

    /// Concrete version of [Store::dispatch()], to avoid generating
    /// multiple versions of this function per action that implements
    /// `Into<Action>`.
    fn dispatch_impl(&self, action: Action) {
        self.dispatch_queue.borrow_mut().push_back(action);

        // If the lock fails to acquire, then the dispatch is already in progress.
        // This prevents recursion, when a listener callback also triggers another
        // dispatch.
        match self.dispatch_lock.try_borrow_mut() {
            Ok(_lock) => self.process_dispatch_queue(),
            Err(_) if self.synchronous_dispatch.get() => self.dispatch_nested(),
            Err(_) => {
                log::trace!(
                    "dispatch in progress, {} action(s) queued",
                    self.dispatch_queue.borrow().len()
                );
            }
        }
    }

    /// Reduce queued actions until the queue is empty. Must only be
    /// called while the dispatch lock is held, or from
    /// [Store::dispatch_nested()].
    fn process_dispatch_queue(&self) {
        loop {
            let dispatch_action = self.dispatch_queue.borrow_mut().pop_front();

            match dispatch_action {
                Some(action) => {
                    self.process_pending_modifications();

                    let ReduceMiddlewareResult { events } = if self.middleware.borrow().is_empty()
                    {
                        self.dispatch_reducer(&action)
                    } else {
                        self.middleware_reduce(&action)
                    };

                    let middleware_events = self.middleware_notify(events);
                    if !middleware_events.is_empty() {
                        self.notify_listeners(middleware_events);
                    }
                }
                None => {
                    break;
                }
            }
        }

        // Modifications made by the last action (a listener replacing
        // the reducer, say) would otherwise wait for an unrelated dispatch.
        self.process_pending_modifications();
    }

    /// Drain the queue from inside
    /// [with_synchronous_dispatch()](Store::with_synchronous_dispatch()).
    /// The middleware chain which is currently executing resumes
    /// where it was afterwards. Dispatches made while draining are
    /// queued and reduced by this same drain.
    fn dispatch_nested(&self) {
        let prev_middleware = self.prev_middleware.get();
        let synchronous = self.synchronous_dispatch.replace(false);

        log::trace!("reducing nested dispatch");
        self.process_dispatch_queue();

        self.synchronous_dispatch.set(synchronous);
        self.prev_middleware.set(prev_middleware);
    }

    /// Run `f`, during which [dispatch()](Store::dispatch()) and
    /// [replace_reducer()](Store::replace_reducer()) take effect
    /// before returning, even though a dispatch is already in
    /// progress. Intended for [Middleware::on_reduce()] handing the
    /// store to user code (see
    /// [ThunkMiddleware](crate::middleware::thunk::ThunkMiddleware)),
    /// while the action being handled has not reached the reducer.
    pub fn with_synchronous_dispatch<F: FnOnce()>(&self, f: F) {
        let synchronous = self.synchronous_dispatch.replace(true);
        f();
        self.synchronous_dispatch.set(synchronous);
    }

    /// Subscribe a [Listener] to changes in the store state and
    /// events produced by the [Reducer] as a result of `Action`s
    /// dispatched via [dispatch()][Store::dispatch()].
    ///
    /// The listener is a weak reference; when the strong reference
    /// associated with it (usually [Callback](crate::Callback)) is
    /// dropped, the listener will be removed from this store upon
    /// [dispatch()](Store::dispatch()).
    ///
    /// If you want to subscribe to state changes associated with
    /// specific `Event`s, see
    /// [subscribe_event()][Store::subscribe_event()] or
    /// [subscribe_events()][Store::subscribe_events()]
    pub fn subscribe<L: AsListener<State, Event>>(&self, listener: L) {
        self.modification_queue
            .borrow_mut()
            .push_back(StoreModification::AddListener(ListenerEventPair {
                listener: listener.as_listener(),
                events: HashSet::new(),
            }));
    }

    /// Subscribe a [Listener] to changes in the store state which
    /// produce the specific matching `event` from the [Reducer].
    ///
    /// The listener is a weak reference; when the strong reference
    /// associated with it (usually [Callback](crate::Callback)) is
    /// dropped, the listener will be removed from this store upon
    /// [dispatch()](Store::dispatch()).
    pub fn subscribe_event<L: AsListener<State, Event>>(&self, listener: L, event: Event) {
        let mut events = HashSet::with_capacity(1);
        events.insert(event);

        self.modification_queue
            .borrow_mut()
            .push_back(StoreModification::AddListener(ListenerEventPair {
                listener: listener.as_listener(),
                events,
            }));
    }

    /// Subscribe a [Listener] to changes in the store state which
    /// produce any of the specific matching `events` from the
    /// [Reducer].
    pub fn subscribe_events<L: AsListener<State, Event>, E: IntoIterator<Item = Event>>(
        &self,
        listener: L,
        events: E,
    ) {
        self.modification_queue
            .borrow_mut()
            .push_back(StoreModification::AddListener(ListenerEventPair {
                listener: listener.as_listener(),
                events: HashSet::from_iter(events.into_iter()),
            }));
    }

    /// Add [Middleware] to modify the behaviour of this [Store]
    /// during a [dispatch()][Store::dispatch()]. Middleware runs in
    /// the order it was added, starting with the next dispatch.
    pub fn add_middleware<M: Middleware<State, Action, Event> + 'static>(&self, middleware: M) {
        self.add_shared_middleware(Rc::new(middleware));
    }

    /// Like [add_middleware()](Store::add_middleware()), for
    /// middleware which is already behind an [Rc].
    pub fn add_shared_middleware(&self, middleware: Rc<dyn Middleware<State, Action, Event>>) {
        self.modification_queue
            .borrow_mut()
            .push_back(StoreModification::AddMiddleware(middleware));
    }

    /// Replace the [Reducer] of this store.
    ///
    /// The current state is passed through
    /// [Reducer::reconcile()] of the new reducer. Outside of a
    /// dispatch (or inside
    /// [with_synchronous_dispatch()](Store::with_synchronous_dispatch()))
    /// this takes effect immediately. Otherwise it takes effect before
    /// the next queued `Action`, or at the latest when the dispatch in
    /// progress returns.
    pub fn replace_reducer<R: Reducer<State, Action, Event> + 'static>(&self, reducer: R) {
        self.modification_queue
            .borrow_mut()
            .push_back(StoreModification::ReplaceReducer(Box::new(reducer)));

        match self.dispatch_lock.try_borrow_mut() {
            Ok(_lock) => self.process_pending_modifications(),
            Err(_) if self.synchronous_dispatch.get() => self.process_pending_modifications(),
            Err(_) => {}
        }
    }
}
