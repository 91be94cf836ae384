//! Derive the actions, selectors and reducer of a slice from its
//! initial state.

use crate::{
    error::SliceError, ActionCreator, ActionType, CombinedReducer, InitialState, Message, Reducer,
    ReducerResult, Selector, SliceState, StateEvent,
};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;

/// The reducer of one slice: one [SetterReducer] per key.
pub type SliceReducer = CombinedReducer<Value, Message, StateEvent>;

/// A slice name mapped to its reducer, ready to be merged with other
/// slices by [combine_slices()](crate::combine_slices()).
pub type SliceMap = IndexMap<String, Rc<SliceReducer>>;

/// Owns the value of a single key: the value is replaced by the
/// payload of every action with a matching type, and left alone
/// otherwise.
pub struct SetterReducer {
    action_type: ActionType,
    initial_value: Rc<Value>,
}

impl SetterReducer {
    pub fn new(action_type: ActionType, initial_value: impl Into<Value>) -> Self {
        SetterReducer {
            action_type,
            initial_value: Rc::new(initial_value.into()),
        }
    }
}

impl Reducer<Value, Message, StateEvent> for SetterReducer {
    fn reduce(&self, prev_state: &Rc<Value>, action: &Message) -> ReducerResult<Value, StateEvent> {
        match action.as_action() {
            Some(action) if action.action_type() == &self.action_type => ReducerResult {
                state: action.shared_payload().clone(),
                events: vec![StateEvent::Changed(self.action_type.clone())],
            },
            _ => ReducerResult::unchanged(prev_state),
        }
    }
}

impl InitialState<Value> for SetterReducer {
    fn initial_state(&self) -> Rc<Value> {
        self.initial_value.clone()
    }
}

/// Upper-case the first character of `key`, leaving the rest as is.
fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The setter action creator name for `key`: `set<Key>`.
pub fn setter_name(key: &str) -> String {
    format!("set{}", capitalize(key))
}

/// The selector name for `key`: `get<Key>`.
pub fn selector_name(key: &str) -> String {
    format!("get{}", capitalize(key))
}

/// Everything derived from one key of a slice.
#[derive(Debug, Clone)]
struct KeyBinding {
    setter_name: String,
    selector_name: String,
}

/// A named partition of the state tree along with the action
/// creators, selectors and reducer derived from its initial state.
///
/// ```
/// use reactive_slice::{configure_store, create_slice, StoreConfig};
/// use serde_json::json;
///
/// let router = create_slice("router", vec![("route", json!("/"))]).unwrap();
/// let store = configure_store(StoreConfig::new().slice(router.slice()));
///
/// let get_route = router.selector("getRoute").unwrap();
/// assert_eq!(get_route.select(&store.state()), Some(&json!("/")));
///
/// store.dispatch(router.action("setRoute").unwrap().create("/profile"));
/// assert_eq!(get_route.select(&store.state()), Some(&json!("/profile")));
/// ```
pub struct Slice {
    name: String,
    bindings: IndexMap<String, KeyBinding>,
    types: Vec<ActionType>,
    actions: IndexMap<String, ActionCreator>,
    selectors: IndexMap<String, Selector>,
    reducer: Rc<SliceReducer>,
}

/// Create a [Slice] named `name` from its ordered initial state.
///
/// Fails if the name or a key is empty, or if two keys derive the
/// same action creator or selector name (`foo` and `Foo`).
pub fn create_slice<I, K, V>(name: impl Into<String>, initial_state: I) -> Result<Slice, SliceError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let name = name.into();
    if name.is_empty() {
        return Err(SliceError::EmptySliceName);
    }

    let mut bindings = IndexMap::new();
    let mut types = Vec::new();
    let mut actions = IndexMap::new();
    let mut selectors = IndexMap::new();
    let mut reducer = SliceReducer::new();
    let mut identifiers = IndexSet::new();

    for (key, initial_value) in initial_state {
        let key = key.into();
        if key.is_empty() {
            return Err(SliceError::EmptyKey { slice: name });
        }

        let binding = KeyBinding {
            setter_name: setter_name(&key),
            selector_name: selector_name(&key),
        };

        for identifier in [&binding.setter_name, &binding.selector_name].iter() {
            if !identifiers.insert((*identifier).clone()) {
                return Err(SliceError::DuplicateIdentifier {
                    slice: name,
                    identifier: (*identifier).clone(),
                });
            }
        }

        let action_type = ActionType::new(&name, &binding.setter_name);
        types.push(action_type.clone());
        actions.insert(
            binding.setter_name.clone(),
            ActionCreator::new(action_type.clone()),
        );
        selectors.insert(binding.selector_name.clone(), Selector::new(&name, &key));
        reducer.insert(key.clone(), SetterReducer::new(action_type, initial_value));
        bindings.insert(key, binding);
    }

    log::debug!("created slice {:?} with keys {:?}", name, bindings.keys());

    Ok(Slice {
        name,
        bindings,
        types,
        actions,
        selectors,
        reducer: Rc::new(reducer),
    })
}

impl Slice {
    /// Create a [Slice] from any value which serializes to a JSON
    /// object, such as a struct. Field order is kept.
    pub fn from_state<T: Serialize + ?Sized>(
        name: impl Into<String>,
        initial_state: &T,
    ) -> Result<Slice, SliceError> {
        let name = name.into();
        match serde_json::to_value(initial_state)? {
            Value::Object(entries) => create_slice(name, entries),
            _ => Err(SliceError::InitialStateNotAnObject { slice: name }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys of the initial state, in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Action types, one per key in declaration order.
    pub fn types(&self) -> &[ActionType] {
        &self.types
    }

    /// Action creators keyed by name (`setRoute`).
    pub fn actions(&self) -> &IndexMap<String, ActionCreator> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&ActionCreator> {
        self.actions.get(name)
    }

    /// The action creator for `key` (rather than by creator name).
    pub fn setter(&self, key: &str) -> Option<&ActionCreator> {
        self.bindings
            .get(key)
            .and_then(|binding| self.actions.get(&binding.setter_name))
    }

    /// Selectors keyed by name (`getRoute`).
    pub fn selectors(&self) -> &IndexMap<String, Selector> {
        &self.selectors
    }

    pub fn selector(&self, name: &str) -> Option<&Selector> {
        self.selectors.get(name)
    }

    /// The selector for `key` (rather than by selector name).
    pub fn getter(&self, key: &str) -> Option<&Selector> {
        self.bindings
            .get(key)
            .and_then(|binding| self.selectors.get(&binding.selector_name))
    }

    pub fn reducer(&self) -> Rc<SliceReducer> {
        self.reducer.clone()
    }

    /// This slice's reducer under its name, for merging with other
    /// slices.
    pub fn slice(&self) -> SliceMap {
        let mut map = SliceMap::with_capacity(1);
        map.insert(self.name.clone(), self.reducer.clone());
        map
    }

    /// The initial state of this slice.
    pub fn initial_state(&self) -> Rc<SliceState> {
        self.reducer.initial_state()
    }
}
