//! The shape of the state held by a slice [Store](crate::Store).

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::{fmt::Debug, rc::Rc};

/// An ordered, immutable mapping from names to shared child states.
///
/// A [Tree] is produced by a
/// [CombinedReducer](crate::CombinedReducer), one entry per child
/// reducer. Entries are held behind [Rc], so reducing an action only
/// allocates the entries which actually changed; the rest are shared
/// with the previous tree.
pub struct Tree<S> {
    entries: IndexMap<String, Rc<S>>,
}

/// The state of one slice: key to current value.
pub type SliceState = Tree<Value>;

/// The whole state of a slice store: slice name to [SliceState].
pub type StateTree = Tree<SliceState>;

impl<S> Tree<S> {
    pub fn from_entries(entries: IndexMap<String, Rc<S>>) -> Self {
        Tree { entries }
    }

    pub fn get(&self, name: &str) -> Option<&S> {
        self.entries.get(name).map(|entry| entry.as_ref())
    }

    pub fn get_rc(&self, name: &str) -> Option<&Rc<S>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &S)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateTree {
    /// Read the value of `key` within the slice `slice`, if both
    /// exist.
    pub fn value(&self, slice: &str, key: &str) -> Option<&Value> {
        self.get(slice).and_then(|slice_state| slice_state.get(key))
    }

    /// Render the whole tree as a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(name, slice_state)| {
                    let object = slice_state
                        .iter()
                        .map(|(key, value)| (key.to_string(), value.clone()))
                        .collect();
                    (name.to_string(), Value::Object(object))
                })
                .collect(),
        )
    }
}

impl<S> Clone for Tree<S> {
    fn clone(&self) -> Self {
        Tree {
            entries: self.entries.clone(),
        }
    }
}

impl<S> Default for Tree<S> {
    fn default() -> Self {
        Tree {
            entries: IndexMap::new(),
        }
    }
}

impl<S: PartialEq> PartialEq for Tree<S> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<S: Debug> Debug for Tree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S: Serialize> Serialize for Tree<S> {
    fn serialize<Se: Serializer>(&self, serializer: Se) -> Result<Se::Ok, Se::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::{SliceState, StateTree, Tree};
    use indexmap::IndexMap;
    use serde_json::{json, Value};
    use std::rc::Rc;

    fn tree() -> StateTree {
        let mut router = IndexMap::new();
        router.insert("route".to_string(), Rc::new(json!("/")));
        router.insert("history".to_string(), Rc::new(json!([])));

        let mut profile = IndexMap::new();
        profile.insert("name".to_string(), Rc::new(Value::Null));

        let mut slices = IndexMap::new();
        slices.insert("router".to_string(), Rc::new(SliceState::from_entries(router)));
        slices.insert("profile".to_string(), Rc::new(SliceState::from_entries(profile)));
        Tree::from_entries(slices)
    }

    #[test]
    fn value_is_guarded() {
        let state = tree();
        assert_eq!(state.value("router", "route"), Some(&json!("/")));
        assert_eq!(state.value("profile", "name"), Some(&Value::Null));
        assert_eq!(state.value("router", "missing"), None);
        assert_eq!(state.value("missing", "route"), None);
    }

    #[test]
    fn json_keeps_entry_order() {
        let state = tree();
        let rendered = serde_json::to_string(&state).unwrap();
        assert_eq!(
            rendered,
            r#"{"router":{"route":"/","history":[]},"profile":{"name":null}}"#
        );
        assert_eq!(
            state.to_json(),
            json!({"router": {"route": "/", "history": []}, "profile": {"name": null}})
        );
    }

    #[test]
    fn clone_shares_entries() {
        let state = tree();
        let copy = state.clone();
        assert_eq!(state, copy);
        assert!(Rc::ptr_eq(
            state.get_rc("router").unwrap(),
            copy.get_rc("router").unwrap()
        ));
    }
}
