pub use attrmap::AttributeError;

/// Errors from registering attribute names in an [AttributeRegistry](crate::AttributeRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("attribute name is empty or whitespace")]
    EmptyName,
    #[error("attribute name is {len} characters long; the limit is {max}")]
    NameTooLong { len: usize, max: usize },
    #[error("attribute name contains a NUL character")]
    NulInName,
    #[error("no attribute ids left to assign")]
    Exhausted,
}

/// Errors from building geometry with the [generate](crate::generate) functions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("the store's index type can't address every element of the generated shape")]
    IndexExhausted,
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// Errors from flattening a store with [TriangleMesh](crate::export::TriangleMesh).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("couldn't read point positions: {0}")]
    Positions(#[source] AttributeError),
    #[error("exported mesh would have more than u32::MAX corners")]
    TooManyCorners,
}
