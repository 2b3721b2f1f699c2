//! Translation-specific error types.

use thiserror::Error;

/// Errors that can occur while translating a canonical query.
///
/// A query that passed validation never triggers these; they are the
/// defensive backstop for directly constructed or otherwise unvalidated
/// input, surfaced as errors instead of malformed documents or panics.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// A model-level rule was violated (propagated from the query crate,
    /// e.g. an unresolvable time range).
    #[error("query model error: {0}")]
    Model(#[from] seql_query::QueryError),

    /// A compound filter node is missing its required sub-conditions.
    #[error("malformed compound filter: {0}")]
    MalformedCompound(String),

    /// A condition value has a shape the operator cannot translate.
    #[error("incompatible value for operator '{operator}' on field '{field}'")]
    IncompatibleValue {
        operator: &'static str,
        field: String,
    },
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TranslateError>;
