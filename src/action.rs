use crate::{error::SliceError, SliceStore};
use serde::Serialize;
use serde_json::Value;
use std::{
    fmt::{Debug, Display},
    rc::Rc,
};

/// The type of an [Action], in the form `<slice>/set<Key>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ActionType(String);

impl ActionType {
    pub fn new(slice: &str, creator_name: &str) -> Self {
        ActionType(format!("{}/{}", slice, creator_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ActionType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ActionType {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionType {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A plain action: replace the value behind
/// [action_type()](Action::action_type()) with
/// [payload()](Action::payload()).
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    action_type: ActionType,
    payload: Rc<Value>,
}

impl Action {
    pub fn new(action_type: ActionType, payload: impl Into<Value>) -> Self {
        Action {
            action_type,
            payload: Rc::new(payload.into()),
        }
    }

    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// The payload as it will be stored in the state tree.
    pub fn shared_payload(&self) -> &Rc<Value> {
        &self.payload
    }
}

/// A deferred unit of work which is given the store instead of being
/// reduced. Requires [ThunkMiddleware](crate::middleware::thunk::ThunkMiddleware)
/// to be installed, otherwise reducers ignore it. Under that
/// middleware, `dispatch` and `replace_reducer` calls made by the thunk
/// take effect before they return.
#[derive(Clone)]
pub struct Thunk(Rc<dyn Fn(&SliceStore)>);

impl Thunk {
    pub fn new<F: Fn(&SliceStore) + 'static>(closure: F) -> Self {
        Thunk(Rc::new(closure))
    }

    pub fn run(&self, store: &SliceStore) {
        (self.0)(store)
    }
}

impl Debug for Thunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Thunk(function @ {:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// Everything which can be dispatched to a slice store.
#[derive(Debug, Clone)]
pub enum Message {
    Action(Action),
    Thunk(Thunk),
}

impl Message {
    /// The plain [Action] carried by this message, if any.
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Message::Action(action) => Some(action),
            Message::Thunk(_) => None,
        }
    }
}

impl From<Action> for Message {
    fn from(action: Action) -> Self {
        Message::Action(action)
    }
}

impl From<Thunk> for Message {
    fn from(thunk: Thunk) -> Self {
        Message::Thunk(thunk)
    }
}

/// Creates the setter [Action] for one key of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCreator {
    action_type: ActionType,
}

impl ActionCreator {
    pub(crate) fn new(action_type: ActionType) -> Self {
        ActionCreator { action_type }
    }

    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    pub fn create(&self, payload: impl Into<Value>) -> Action {
        Action::new(self.action_type.clone(), payload)
    }

    /// Like [create()](ActionCreator::create()), serializing any
    /// [Serialize] value into the payload.
    pub fn create_from<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Action, SliceError> {
        Ok(self.create(serde_json::to_value(payload)?))
    }
}
