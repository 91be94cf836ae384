//! Derive the boilerplate of a redux-like store from initial state.
//!
//! A [Slice] is created from a name and an ordered initial state. For
//! every key it derives an [ActionType] (`<slice>/set<Key>`), a setter
//! [ActionCreator] (`set<Key>`), a [Selector] (`get<Key>`) and a
//! reducer which replaces the key's value with the payload of a
//! matching action. Slices are merged into one root reducer with
//! [combine_slices()], and [configure_store()] builds a [Store] around
//! it with optional [middleware].

mod action;
mod configure;
pub mod error;
mod event;
mod listener;
pub mod middleware;
mod reducer;
mod selector;
mod slice;
mod state;
mod store;

pub use action::*;
pub use configure::*;
pub use error::SliceError;
pub use event::*;
pub use listener::*;
pub use reducer::*;
pub use selector::*;
pub use slice::*;
pub use state::*;
pub use store::{Store, StoreRef};
