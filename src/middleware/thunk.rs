//! Runs [Thunk]s dispatched to a slice store instead of reducing
//! them.

use super::{Middleware, ReduceFn, ReduceMiddlewareResult};
use crate::{Message, StateEvent, StateTree, Store, Thunk};

/// Intercepts [Message::Thunk] and runs it with the store. Actions the
/// thunk dispatches are reduced before its `dispatch` call returns, so
/// the thunk reads its own updates from [Store::state()]. Plain
/// actions pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThunkMiddleware;

impl ThunkMiddleware {
    pub fn new() -> Self {
        ThunkMiddleware
    }
}

impl Middleware<StateTree, Message, StateEvent> for ThunkMiddleware {
    fn on_reduce(
        &self,
        store: &Store<StateTree, Message, StateEvent>,
        action: Option<&Message>,
        reduce: ReduceFn<StateTree, Message, StateEvent>,
    ) -> ReduceMiddlewareResult<StateEvent> {
        match action {
            Some(Message::Thunk(thunk)) => {
                log::trace!("running {:?}", thunk);
                store.with_synchronous_dispatch(|| thunk.run(store));
                reduce(store, None)
            }
            _ => reduce(store, action),
        }
    }
}

/// Shorthand for [Thunk::new()].
pub fn thunk<F: Fn(&Store<StateTree, Message, StateEvent>) + 'static>(closure: F) -> Thunk {
    Thunk::new(closure)
}
