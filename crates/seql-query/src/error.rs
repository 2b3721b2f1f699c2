use thiserror::Error;

/// Errors produced while decoding or validating a canonical query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field path cannot be empty")]
    EmptyFieldPath,

    #[error("field path '{0}' must start with '.'")]
    FieldPathSeparator(String),

    #[error("field path '{0}' contains an empty segment")]
    FieldPathSegment(String),

    #[error("filter on '{field}': value cannot be null")]
    NullFilterValue { field: String },

    #[error("filter on '{field}': value for '{operator}' {requirement}")]
    FilterValueType {
        field: String,
        operator: &'static str,
        requirement: &'static str,
    },

    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("invalid compound filter: {0}")]
    InvalidCompound(String),

    #[error("filter nesting exceeds maximum depth of {0}")]
    FilterTooDeep(usize),

    #[error("invalid relative time '{0}'")]
    InvalidRelativeTime(String),

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("invalid aggregation '{name}': {reason}")]
    InvalidAggregation { name: String, reason: String },

    #[error("too many aggregations: {0} (maximum 10 per level)")]
    TooManyAggregations(usize),

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
