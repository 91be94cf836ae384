use thiserror::Error;

/// Errors arising while deriving a slice, or converting values to and
/// from the JSON held in the state tree.
#[derive(Error, Debug)]
pub enum SliceError {
    #[error("Slice name must not be empty")]
    EmptySliceName,

    #[error("Slice '{slice}' has a key with an empty name")]
    EmptyKey { slice: String },

    #[error("Slice '{slice}' derives the identifier '{identifier}' from more than one key")]
    DuplicateIdentifier { slice: String, identifier: String },

    #[error("Initial state of slice '{slice}' is not an object")]
    InitialStateNotAnObject { slice: String },

    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}
