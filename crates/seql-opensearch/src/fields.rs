//! Field-name emission and the exact-match-vs-analyzed-match heuristic.
//!
//! OpenSearch indexes most string attributes with tokenizing analyzers,
//! which breaks exact-equality semantics: a `match` on `"10.0.0.1"` or
//! `"CVE-2026-1234"` tokenizes the operand and matches far more than
//! intended. Identifier-like fields therefore get `term` clauses, free-text
//! fields get `match` clauses. The choice is a pure function of the field
//! path and the value type, so repeated translations of the same condition
//! always pick the same clause kind.

use serde_json::Value;

use seql_query::path;

/// Suffixes that conventionally denote identifiers, addresses, ports, or
/// codes — fields the index maps as keywords.
const EXACT_SUFFIXES: [&str; 5] = ["ip", "uid", "id", "port", "code"];

/// Field names known to be keyword-mapped even without an identifier suffix.
const EXACT_FIELDS: [&str; 7] = [
    "severity",
    "status",
    "type_name",
    "class_name",
    "category_name",
    "activity_name",
    "metadata.version",
];

/// Emit a canonical field path as an OpenSearch field name: the single
/// leading separator is stripped, the dot-joined segments pass through.
pub fn emit(field: &str) -> &str {
    path::emit(field)
}

/// Decide whether an `eq`/`ne` condition on `field` with `value` should use
/// an exact (`term`) clause rather than an analyzed (`match`) clause.
pub fn wants_exact_match(field: &str, value: &Value) -> bool {
    // Numbers and booleans are never analyzed.
    if value.is_number() || value.is_boolean() {
        return true;
    }
    let name = emit(field);
    EXACT_SUFFIXES.iter().any(|s| name.ends_with(s)) || EXACT_FIELDS.contains(&name)
}
