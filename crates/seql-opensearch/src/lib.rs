//! # seql-opensearch
//!
//! OpenSearch Query DSL translator for canonical security-event queries.
//!
//! This crate consumes the data model of [`seql_query`] and compiles it into
//! the search body an OpenSearch/Elasticsearch cluster executes: a boolean
//! `query` tree, `_source` projection, `sort`, `size`/`from` pagination, and
//! recursive `aggs`. It assumes its input already passed
//! [`seql_query::validate`] and keeps only defensive error paths for input
//! that bypassed it.
//!
//! Translation is a stateless pure function: no I/O, no caching, safe to
//! call from any number of concurrent request handlers. Sending the emitted
//! document to a cluster is the caller's concern.
//!
//! ## Quick Start
//!
//! ```rust
//! use seql_query::{validate, Query};
//! use seql_opensearch::translate;
//!
//! let query = Query::decode(r#"{
//!     "filter": {"field": ".severity", "operator": "eq", "value": "High"},
//!     "timeRange": {"last": "1h"},
//!     "limit": 100
//! }"#).unwrap();
//! validate(&query).unwrap();
//!
//! let body = translate(&query).unwrap();
//! assert_eq!(body["size"], 100);
//! ```

pub mod error;
pub mod fields;
pub mod translate;

pub use error::{Result, TranslateError};
pub use translate::{
    translate, translate_filter, DEFAULT_PAGE_SIZE, EVENT_TIME_FIELD, MAX_PAGE_SIZE,
};
