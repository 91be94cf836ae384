use crate::{error::SliceError, StateTree};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads the value of one key of one slice out of a [StateTree].
///
/// Selection is guarded: if the slice has not been added to the store
/// (or the key is unknown to it), the selector yields `None` rather
/// than failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    slice: String,
    key: String,
}

impl Selector {
    pub(crate) fn new(slice: &str, key: &str) -> Self {
        Selector {
            slice: slice.to_string(),
            key: key.to_string(),
        }
    }

    pub fn slice(&self) -> &str {
        &self.slice
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn select<'s>(&self, state: &'s StateTree) -> Option<&'s Value> {
        state.value(&self.slice, &self.key)
    }

    /// Select the value and deserialize it into `T`.
    pub fn select_as<T: DeserializeOwned>(&self, state: &StateTree) -> Result<Option<T>, SliceError> {
        match self.select(state) {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }
}
