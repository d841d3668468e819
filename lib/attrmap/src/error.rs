use crate::{AttributeId, TypeTag};

/// Failure outcomes of [AttributeStore](crate::AttributeStore) operations.
///
/// None of these leave the store in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("attribute {0} is already registered")]
    AlreadyExists(AttributeId),
    #[error("attribute {0} is not registered")]
    NotFound(AttributeId),
    #[error("attribute {id} holds elements of type {expected}, not {found}")]
    TypeMismatch {
        id: AttributeId,
        expected: TypeTag,
        found: TypeTag,
    },
    #[error("index {index} out of range for attribute {id} with {len} elements")]
    IndexOutOfRange {
        id: AttributeId,
        index: usize,
        len: usize,
    },
    #[error("attribute {0} is required by its owner and cannot be removed")]
    ReservedAttribute(AttributeId),
}
