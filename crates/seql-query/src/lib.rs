//! # seql-query
//!
//! Canonical query model and validator for the security-event platform.
//!
//! A canonical query is a vendor-neutral, JSON-shaped description of one
//! search request: projection, a recursive filter tree, a time window, sort,
//! pagination, and named aggregations. This crate owns that data model and
//! the strict grammar it must satisfy; backend crates (e.g.
//! `seql-opensearch`) consume the same model to emit engine-specific query
//! documents.
//!
//! ## Architecture
//!
//! - **AST** ([`ast`]): serde-decoded value types. Tagged unions (filter
//!   nodes, operators, aggregation kinds) are sealed enums, so invalid tags
//!   die at decode time.
//! - **Validator** ([`validate`]): a pure recursive walk that rejects the
//!   first structural or semantic violation — malformed field paths, bad
//!   operator/value pairings, impossible time windows, oversized pagination.
//! - No I/O, no logging, no shared state: every invocation operates on its
//!   own input and is freely callable from concurrent request handlers.
//!
//! ## Quick Start
//!
//! ```rust
//! use seql_query::{validate, Query};
//!
//! let query = Query::decode(r#"{
//!     "filter": {"field": ".severity", "operator": "eq", "value": "High"},
//!     "timeRange": {"last": "1h"},
//!     "limit": 100
//! }"#).unwrap();
//!
//! validate(&query).unwrap();
//! ```

pub mod ast;
pub mod error;
pub mod path;
pub mod time;
pub mod validate;

// Re-export the most commonly used types and functions at crate root
pub use ast::{
    Aggregation, AggregationKind, CompoundFilter, CompoundKind, Condition, FilterExpr, Operator,
    Query, SortOrder, SortSpec,
};
pub use error::{QueryError, Result};
pub use time::{DurationUnit, RelativeDuration, TimeForm, TimeRange};
pub use validate::{validate, MAX_AGGREGATIONS_PER_LEVEL, MAX_FILTER_DEPTH, MAX_LIMIT};
