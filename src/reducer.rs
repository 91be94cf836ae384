use crate::state::Tree;
use indexmap::IndexMap;
use std::rc::Rc;

/// Using the [reduce()](Reducer::reduce()) method, implementors of
/// this trait take an `Action` submitted to a store via
/// [Store::dispatch()](crate::Store::dispatch()) and produce a new
/// `State`, along with the events associated with the `Action` and
/// the state modifications that occurred.
pub trait Reducer<State, Action, Event> {
    /// Take an `Action` submitted to a store via
    /// [Store::dispatch()](crate::Store::dispatch()) and produce the
    /// next `State` from `prev_state`, also producing events
    /// associated with the `Action` and state modifications that
    /// occurred.
    ///
    /// If no `Event`s are returned then it is assumed that the state
    /// has not changed, and store listeners do not need to be
    /// notified. Returning a clone of `prev_state` (the same [Rc])
    /// signals to enclosing reducers that nothing changed.
    fn reduce(&self, prev_state: &Rc<State>, action: &Action) -> ReducerResult<State, Event>;

    /// Adapt a `State` produced under a different reducer to the
    /// shape expected by this one. Invoked by
    /// [Store::replace_reducer()](crate::Store::replace_reducer()).
    fn reconcile(&self, prev_state: &Rc<State>) -> Rc<State> {
        prev_state.clone()
    }
}

/// The result of a [Reducer::reduce()] function.
pub struct ReducerResult<State, Event> {
    pub state: Rc<State>,
    pub events: Vec<Event>,
}

impl<State, Event> ReducerResult<State, Event> {
    /// A result which keeps `prev_state` and produces no events.
    pub fn unchanged(prev_state: &Rc<State>) -> Self {
        ReducerResult {
            state: prev_state.clone(),
            events: Vec::new(),
        }
    }
}

/// Reducers which know the state they start from, used to fill in
/// the parts of a [Tree] that have never been reduced.
pub trait InitialState<State> {
    fn initial_state(&self) -> Rc<State>;
}

/// A [Reducer] which can own one entry of a [CombinedReducer].
pub trait ChildReducer<State, Action, Event>:
    Reducer<State, Action, Event> + InitialState<State>
{
}

impl<T, State, Action, Event> ChildReducer<State, Action, Event> for T where
    T: Reducer<State, Action, Event> + InitialState<State>
{
}

impl<R, State, Action, Event> Reducer<State, Action, Event> for Rc<R>
where
    R: Reducer<State, Action, Event> + ?Sized,
{
    fn reduce(&self, prev_state: &Rc<State>, action: &Action) -> ReducerResult<State, Event> {
        (**self).reduce(prev_state, action)
    }

    fn reconcile(&self, prev_state: &Rc<State>) -> Rc<State> {
        (**self).reconcile(prev_state)
    }
}

impl<R, State> InitialState<State> for Rc<R>
where
    R: InitialState<State> + ?Sized,
{
    fn initial_state(&self) -> Rc<State> {
        (**self).initial_state()
    }
}

/// A [Reducer] composed of named child reducers, each of which owns
/// exactly one entry of the resulting [Tree].
///
/// Every child sees every action. The entries of the produced tree
/// follow the order in which the children were inserted, and a child
/// missing from the previous tree starts from its
/// [initial_state()](InitialState::initial_state()).
pub struct CombinedReducer<State, Action, Event> {
    reducers: IndexMap<String, Box<dyn ChildReducer<State, Action, Event>>>,
}

impl<State, Action, Event> CombinedReducer<State, Action, Event> {
    /// Create a new, empty [CombinedReducer].
    pub fn new() -> Self {
        CombinedReducer {
            reducers: IndexMap::new(),
        }
    }

    /// Insert a child reducer which owns the entry `name`. If a child
    /// with the same name already exists it is replaced (keeping its
    /// position) and returned.
    pub fn insert<R>(
        &mut self,
        name: impl Into<String>,
        reducer: R,
    ) -> Option<Box<dyn ChildReducer<State, Action, Event>>>
    where
        R: ChildReducer<State, Action, Event> + 'static,
    {
        self.reducers.insert(name.into(), Box::new(reducer))
    }

    /// Builder version of [CombinedReducer::insert()].
    pub fn with<R>(mut self, name: impl Into<String>, reducer: R) -> Self
    where
        R: ChildReducer<State, Action, Event> + 'static,
    {
        self.insert(name, reducer);
        self
    }

    /// Names of the entries owned by this reducer, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.reducers.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<State, Action, Event> Default for CombinedReducer<State, Action, Event> {
    fn default() -> Self {
        Self::new()
    }
}

impl<State, Action, Event> Reducer<Tree<State>, Action, Event>
    for CombinedReducer<State, Action, Event>
{
    fn reduce(
        &self,
        prev_state: &Rc<Tree<State>>,
        action: &Action,
    ) -> ReducerResult<Tree<State>, Event> {
        let mut changed = prev_state.len() != self.reducers.len();
        let mut entries = IndexMap::with_capacity(self.reducers.len());
        let mut events = Vec::new();

        for (name, reducer) in &self.reducers {
            let prev_entry = match prev_state.get_rc(name) {
                Some(entry) => entry.clone(),
                None => {
                    changed = true;
                    reducer.initial_state()
                }
            };

            let result = reducer.reduce(&prev_entry, action);
            changed = changed || !Rc::ptr_eq(&prev_entry, &result.state);
            events.extend(result.events);
            entries.insert(name.clone(), result.state);
        }

        let state = if changed {
            Rc::new(Tree::from_entries(entries))
        } else {
            prev_state.clone()
        };

        ReducerResult { state, events }
    }

    fn reconcile(&self, prev_state: &Rc<Tree<State>>) -> Rc<Tree<State>> {
        let entries = self
            .reducers
            .iter()
            .map(|(name, reducer)| {
                let entry = match prev_state.get_rc(name) {
                    Some(entry) => reducer.reconcile(entry),
                    None => reducer.initial_state(),
                };
                (name.clone(), entry)
            })
            .collect();

        Rc::new(Tree::from_entries(entries))
    }
}

impl<State, Action, Event> InitialState<Tree<State>> for CombinedReducer<State, Action, Event> {
    fn initial_state(&self) -> Rc<Tree<State>> {
        let entries = self
            .reducers
            .iter()
            .map(|(name, reducer)| (name.clone(), reducer.initial_state()))
            .collect();

        Rc::new(Tree::from_entries(entries))
    }
}
