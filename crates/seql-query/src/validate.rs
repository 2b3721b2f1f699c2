//! Canonical query validator.
//!
//! [`validate`] walks a decoded [`Query`] and rejects structurally or
//! semantically invalid input before any translation happens. It is a pure
//! function of its argument: no I/O, no mutation, deterministic. Validation
//! stops at the first violation — this is a gate, not an error-accumulating
//! linter.
//!
//! Checks run in a fixed order: every referenced field path first
//! (projection, filter, sort, aggregations), then the filter tree's
//! operator/value rules, the time range, aggregations, pagination.

use std::collections::HashSet;

use regex::Regex;
use serde_json::Value;

use crate::ast::{
    Aggregation, AggregationKind, CompoundKind, Condition, FilterExpr, Operator, Query,
};
use crate::error::{QueryError, Result};
use crate::path;

/// Hard ceiling on `limit` for cursorless queries. Deep pagination past this
/// point must opt in with a cursor.
pub const MAX_LIMIT: i64 = 10_000;

/// Maximum number of aggregations at any single nesting level. Nesting depth
/// itself is unbounded.
pub const MAX_AGGREGATIONS_PER_LEVEL: usize = 10;

/// Maximum filter-tree nesting depth accepted from untrusted input.
pub const MAX_FILTER_DEPTH: usize = 100;

/// Validate a canonical query. Returns the first violation found.
pub fn validate(query: &Query) -> Result<()> {
    // Every field path referenced anywhere is checked before any
    // operator/value rule fires.
    for field in &query.select {
        path::validate(field)?;
    }
    if let Some(filter) = &query.filter {
        validate_filter_paths(filter, 0)?;
    }
    for spec in &query.sort {
        path::validate(&spec.field)?;
    }
    validate_aggregation_paths(&query.aggregations)?;

    if let Some(filter) = &query.filter {
        validate_filter(filter, 0)?;
    }

    if let Some(time_range) = &query.time_range {
        // form() resolves relative-vs-absolute and checks the grammar.
        time_range.form()?;
    }

    validate_aggregations(&query.aggregations)?;
    validate_pagination(query)?;

    Ok(())
}

// =============================================================================
// Field-path pass
// =============================================================================

fn validate_filter_paths(expr: &FilterExpr, depth: usize) -> Result<()> {
    if depth > MAX_FILTER_DEPTH {
        return Err(QueryError::FilterTooDeep(MAX_FILTER_DEPTH));
    }
    match expr {
        FilterExpr::Compound(compound) => {
            for sub in &compound.conditions {
                validate_filter_paths(sub, depth + 1)?;
            }
            if let Some(sub) = &compound.condition {
                validate_filter_paths(sub, depth + 1)?;
            }
            Ok(())
        }
        FilterExpr::Simple(cond) => path::validate(&cond.field),
    }
}

fn validate_aggregation_paths(aggs: &[Aggregation]) -> Result<()> {
    for agg in aggs {
        // an absent field is reported by the per-kind checks, not here
        if !agg.field.is_empty() {
            path::validate(&agg.field)?;
        }
        validate_aggregation_paths(&agg.aggregations)?;
    }
    Ok(())
}

// =============================================================================
// Filter tree
// =============================================================================

fn validate_filter(expr: &FilterExpr, depth: usize) -> Result<()> {
    if depth > MAX_FILTER_DEPTH {
        return Err(QueryError::FilterTooDeep(MAX_FILTER_DEPTH));
    }
    match expr {
        FilterExpr::Compound(compound) => match compound.kind {
            CompoundKind::And | CompoundKind::Or => {
                if compound.conditions.is_empty() {
                    return Err(QueryError::InvalidCompound(format!(
                        "{} requires at least one condition",
                        compound.kind
                    )));
                }
                for sub in &compound.conditions {
                    validate_filter(sub, depth + 1)?;
                }
                Ok(())
            }
            CompoundKind::Not => match &compound.condition {
                Some(sub) => validate_filter(sub, depth + 1),
                None => Err(QueryError::InvalidCompound(
                    "NOT requires a condition".to_string(),
                )),
            },
        },
        FilterExpr::Simple(cond) => validate_condition(cond),
    }
}

fn validate_condition(cond: &Condition) -> Result<()> {
    match cond.operator {
        Operator::In => {
            if !cond.value.is_array() {
                return Err(QueryError::FilterValueType {
                    field: cond.field.clone(),
                    operator: "in",
                    requirement: "must be an array",
                });
            }
        }
        Operator::Exists => {
            if !cond.value.is_boolean() {
                return Err(QueryError::FilterValueType {
                    field: cond.field.clone(),
                    operator: "exists",
                    requirement: "must be a boolean",
                });
            }
        }
        Operator::Regex => {
            let Value::String(pattern) = &cond.value else {
                return Err(QueryError::FilterValueType {
                    field: cond.field.clone(),
                    operator: "regex",
                    requirement: "must be a string",
                });
            };
            Regex::new(pattern)?;
        }
        Operator::Cidr => {
            let Value::String(block) = &cond.value else {
                return Err(QueryError::FilterValueType {
                    field: cond.field.clone(),
                    operator: "cidr",
                    requirement: "must be a string",
                });
            };
            if !block.contains('/') {
                return Err(QueryError::FilterValueType {
                    field: cond.field.clone(),
                    operator: "cidr",
                    requirement: "must contain /",
                });
            }
        }
        // Remaining operators only require a present value.
        Operator::Eq
        | Operator::Ne
        | Operator::Gt
        | Operator::Gte
        | Operator::Lt
        | Operator::Lte
        | Operator::Contains
        | Operator::StartsWith
        | Operator::EndsWith => {
            if cond.value.is_null() {
                return Err(QueryError::NullFilterValue {
                    field: cond.field.clone(),
                });
            }
        }
    }
    Ok(())
}

// =============================================================================
// Aggregations
// =============================================================================

fn validate_aggregations(aggs: &[Aggregation]) -> Result<()> {
    if aggs.len() > MAX_AGGREGATIONS_PER_LEVEL {
        return Err(QueryError::TooManyAggregations(aggs.len()));
    }

    let mut names: HashSet<&str> = HashSet::with_capacity(aggs.len());
    for agg in aggs {
        if agg.name.is_empty() {
            return Err(QueryError::InvalidAggregation {
                name: agg.kind.to_string(),
                reason: "name cannot be empty".to_string(),
            });
        }
        if !names.insert(agg.name.as_str()) {
            return Err(QueryError::InvalidAggregation {
                name: agg.name.clone(),
                reason: "duplicate name within sibling aggregations".to_string(),
            });
        }
        validate_aggregation(agg)?;
    }
    Ok(())
}

fn validate_aggregation(agg: &Aggregation) -> Result<()> {
    // path grammar was already checked by the field-path pass
    let require_field = |reason: &str| -> Result<()> {
        if agg.field.is_empty() {
            return Err(QueryError::InvalidAggregation {
                name: agg.name.clone(),
                reason: reason.to_string(),
            });
        }
        Ok(())
    };

    match agg.kind {
        AggregationKind::Terms => {
            require_field("terms aggregation requires a field")?;
            if agg.size <= 0 {
                return Err(QueryError::InvalidAggregation {
                    name: agg.name.clone(),
                    reason: "terms aggregation requires a positive size".to_string(),
                });
            }
        }
        AggregationKind::DateHistogram => {
            require_field("date_histogram aggregation requires a field")?;
            if agg.interval.as_deref().map_or(true, str::is_empty) {
                return Err(QueryError::InvalidAggregation {
                    name: agg.name.clone(),
                    reason: "date_histogram aggregation requires an interval".to_string(),
                });
            }
        }
        AggregationKind::Avg
        | AggregationKind::Sum
        | AggregationKind::Min
        | AggregationKind::Max
        | AggregationKind::Stats
        | AggregationKind::Cardinality => {
            require_field("metric aggregation requires a field")?;
        }
    }

    validate_aggregations(&agg.aggregations)
}

// =============================================================================
// Pagination
// =============================================================================

fn validate_pagination(query: &Query) -> Result<()> {
    if query.limit < 0 {
        return Err(QueryError::InvalidPagination(
            "limit cannot be negative".to_string(),
        ));
    }
    if query.offset < 0 {
        return Err(QueryError::InvalidPagination(
            "offset cannot be negative".to_string(),
        ));
    }
    if query.offset > 0 && query.has_cursor() {
        return Err(QueryError::InvalidPagination(
            "offset and cursor cannot be combined".to_string(),
        ));
    }
    if !query.has_cursor() && query.limit > MAX_LIMIT {
        return Err(QueryError::InvalidPagination(format!(
            "limit {} exceeds maximum {MAX_LIMIT} without a cursor",
            query.limit
        )));
    }
    Ok(())
}
