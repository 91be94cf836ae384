//! Assemble slices into a root reducer and a store.

use crate::{
    middleware::Middleware, CombinedReducer, InitialState, Message, SliceMap, StateEvent,
    StateTree, StoreRef,
};
use std::rc::Rc;

/// The reducer of a whole slice store: one slice reducer per slice
/// name.
pub type RootReducer = CombinedReducer<crate::SliceState, Message, StateEvent>;

/// A [Store](crate::Store) holding a [StateTree] built from slices.
pub type SliceStore = crate::Store<StateTree, Message, StateEvent>;

pub type SliceStoreRef = StoreRef<StateTree, Message, StateEvent>;

pub type SliceMiddleware = Rc<dyn Middleware<StateTree, Message, StateEvent>>;

/// Receives the configured middleware (possibly none) and returns the
/// middleware to install, in order. Used to hook development tooling
/// around the store.
pub type ComposeFn = Box<dyn FnOnce(Vec<SliceMiddleware>) -> Vec<SliceMiddleware>>;

/// Merge slice maps into a [RootReducer].
///
/// Slices are merged in order. When two slices share a name the later
/// one's reducer wins, at the position of the first.
pub fn combine_slices<I>(slices: I) -> RootReducer
where
    I: IntoIterator<Item = SliceMap>,
{
    let mut root = RootReducer::new();
    for slice_map in slices {
        for (name, reducer) in slice_map {
            if root.insert(name.clone(), reducer).is_some() {
                log::debug!("slice {:?} was combined more than once, keeping the last", name);
            }
        }
    }
    root
}

/// Configuration for [configure_store()].
#[derive(Default)]
pub struct StoreConfig {
    slices: Vec<SliceMap>,
    middlewares: Vec<SliceMiddleware>,
    compose: Option<ComposeFn>,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slice, usually [Slice::slice()](crate::Slice::slice()).
    pub fn slice(mut self, slice: SliceMap) -> Self {
        self.slices.push(slice);
        self
    }

    pub fn slices<I: IntoIterator<Item = SliceMap>>(mut self, slices: I) -> Self {
        self.slices.extend(slices);
        self
    }

    /// Add middleware, run in the order added.
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<StateTree, Message, StateEvent> + 'static,
    {
        self.middlewares.push(Rc::new(middleware));
        self
    }

    /// Let `compose` decide the final middleware list. It is called
    /// even when no middleware was added.
    pub fn compose_with<F>(mut self, compose: F) -> Self
    where
        F: FnOnce(Vec<SliceMiddleware>) -> Vec<SliceMiddleware> + 'static,
    {
        self.compose = Some(Box::new(compose));
        self
    }
}

/// Combine the configured slices into a root reducer and create a
/// store starting from the slices' initial state.
pub fn configure_store(config: StoreConfig) -> SliceStoreRef {
    let StoreConfig {
        slices,
        middlewares,
        compose,
    } = config;

    let reducer = combine_slices(slices);
    let initial_state = reducer.initial_state().as_ref().clone();
    log::debug!(
        "configuring store with slices {:?}",
        reducer.names().collect::<Vec<_>>()
    );

    let middlewares = match compose {
        Some(compose) => compose(middlewares),
        None => middlewares,
    };

    let store = StoreRef::new(reducer, initial_state);
    for middleware in middlewares {
        store.add_shared_middleware(middleware);
    }
    store
}
