use crate::ActionType;

/// An `Event` to be produced by a [Store](crate::Store).
pub trait StoreEvent {
    /// Produces an empty/`None` variant of this event which returns
    /// `true` when calling [StoreEvent::is_none()].
    fn none() -> Self;
    /// Returns `true` if this event is considered empty/`None`.
    fn is_none(&self) -> bool;
}

impl StoreEvent for () {
    fn none() -> Self {}

    fn is_none(&self) -> bool {
        true
    }
}

/// The events produced by slice reducers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateEvent {
    /// Sent to listeners which subscribed without specifying events.
    None,
    /// The value behind a setter was replaced by an action of this
    /// type.
    Changed(ActionType),
}

impl StoreEvent for StateEvent {
    fn none() -> Self {
        StateEvent::None
    }

    fn is_none(&self) -> bool {
        matches!(self, StateEvent::None)
    }
}
