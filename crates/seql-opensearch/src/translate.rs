//! Translate a validated canonical query into an OpenSearch Query DSL
//! document.
//!
//! The translator is the back-end half of the engine: a pure recursive walk
//! over the same tree the validator checked, emitting a freshly allocated
//! `serde_json::Value` with the `query` / `_source` / `sort` / `size` /
//! `from` / `aggs` top-level keys. It performs no redundant validation and
//! no I/O; unvalidated input that cannot be translated surfaces as a
//! [`TranslateError`] rather than a panic or a malformed document.

use chrono::Utc;
use serde_json::{json, Map, Value};

use seql_query::{
    Aggregation, AggregationKind, CompoundKind, Condition, FilterExpr, Operator, Query, SortSpec,
    TimeForm, TimeRange,
};

use crate::error::{Result, TranslateError};
use crate::fields;

/// The event-time attribute every record carries; target of relative time
/// windows and the default sort.
pub const EVENT_TIME_FIELD: &str = "time";

/// Result-size cap applied when the caller leaves `limit` unset.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Hard result-size ceiling for cursorless queries, mirroring the
/// validator's limit rule.
pub const MAX_PAGE_SIZE: i64 = 10_000;

/// Translate a canonical query into an OpenSearch search body.
pub fn translate(query: &Query) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert("query".to_string(), query_body(query)?);

    if !query.select.is_empty() {
        let projected: Vec<Value> = query
            .select
            .iter()
            .map(|f| Value::String(fields::emit(f).to_string()))
            .collect();
        doc.insert("_source".to_string(), Value::Array(projected));
    }

    doc.insert("sort".to_string(), build_sort(&query.sort));
    doc.insert("size".to_string(), json!(page_size(query)));
    if query.offset > 0 {
        doc.insert("from".to_string(), json!(query.offset));
    }
    if !query.aggregations.is_empty() {
        doc.insert("aggs".to_string(), build_aggregations(&query.aggregations));
    }

    Ok(Value::Object(doc))
}

// =============================================================================
// Query body
// =============================================================================

fn query_body(query: &Query) -> Result<Value> {
    let mut must: Vec<Value> = Vec::with_capacity(2);
    if let Some(filter) = &query.filter {
        must.push(translate_filter(filter)?);
    }
    if let Some(time_range) = &query.time_range {
        must.push(time_clause(time_range)?);
    }
    if must.is_empty() {
        return Ok(json!({"match_all": {}}));
    }
    Ok(json!({"bool": {"must": must}}))
}

/// Translate one filter-expression node. Recursive over compound nodes.
pub fn translate_filter(expr: &FilterExpr) -> Result<Value> {
    match expr {
        FilterExpr::Compound(compound) => match compound.kind {
            CompoundKind::And => {
                if compound.conditions.is_empty() {
                    return Err(TranslateError::MalformedCompound(
                        "AND has no conditions".to_string(),
                    ));
                }
                let clauses = translate_all(&compound.conditions)?;
                Ok(json!({"bool": {"must": clauses}}))
            }
            CompoundKind::Or => {
                if compound.conditions.is_empty() {
                    return Err(TranslateError::MalformedCompound(
                        "OR has no conditions".to_string(),
                    ));
                }
                let clauses = translate_all(&compound.conditions)?;
                Ok(json!({"bool": {"should": clauses, "minimum_should_match": 1}}))
            }
            CompoundKind::Not => match &compound.condition {
                Some(inner) => Ok(negated(translate_filter(inner)?)),
                None => Err(TranslateError::MalformedCompound(
                    "NOT has no condition".to_string(),
                )),
            },
        },
        FilterExpr::Simple(cond) => translate_condition(cond),
    }
}

fn translate_all(exprs: &[FilterExpr]) -> Result<Vec<Value>> {
    exprs.iter().map(translate_filter).collect()
}

fn translate_condition(cond: &Condition) -> Result<Value> {
    let name = fields::emit(&cond.field);
    match cond.operator {
        Operator::Eq => Ok(equality_clause(cond)),
        Operator::Ne => Ok(negated(equality_clause(cond))),
        Operator::Gt => Ok(range_clause(name, "gt", cond.value.clone())),
        Operator::Gte => Ok(range_clause(name, "gte", cond.value.clone())),
        Operator::Lt => Ok(range_clause(name, "lt", cond.value.clone())),
        Operator::Lte => Ok(range_clause(name, "lte", cond.value.clone())),
        Operator::In => {
            if !cond.value.is_array() {
                return Err(TranslateError::IncompatibleValue {
                    operator: "in",
                    field: cond.field.clone(),
                });
            }
            Ok(json!({"terms": {(name): cond.value.clone()}}))
        }
        Operator::Contains => {
            let text = wildcard_text(&cond.value);
            Ok(json!({"wildcard": {(name): format!("*{text}*")}}))
        }
        Operator::StartsWith => {
            let text = wildcard_text(&cond.value);
            Ok(json!({"wildcard": {(name): format!("{text}*")}}))
        }
        Operator::EndsWith => {
            let text = wildcard_text(&cond.value);
            Ok(json!({"wildcard": {(name): format!("*{text}")}}))
        }
        Operator::Regex => match &cond.value {
            Value::String(pattern) => Ok(json!({"regexp": {(name): pattern}})),
            _ => Err(TranslateError::IncompatibleValue {
                operator: "regex",
                field: cond.field.clone(),
            }),
        },
        Operator::Exists => match cond.value.as_bool() {
            Some(true) => Ok(json!({"exists": {"field": name}})),
            Some(false) => Ok(negated(json!({"exists": {"field": name}}))),
            None => Err(TranslateError::IncompatibleValue {
                operator: "exists",
                field: cond.field.clone(),
            }),
        },
        // OpenSearch interprets CIDR notation natively on ip-typed fields.
        Operator::Cidr => Ok(json!({"term": {(name): cond.value.clone()}})),
    }
}

/// `eq` clause: `term` for identifier-like fields and non-string values,
/// `match` for analyzed text. See [`fields::wants_exact_match`].
fn equality_clause(cond: &Condition) -> Value {
    let name = fields::emit(&cond.field);
    if fields::wants_exact_match(&cond.field, &cond.value) {
        json!({"term": {(name): cond.value.clone()}})
    } else {
        json!({"match": {(name): cond.value.clone()}})
    }
}

fn negated(clause: Value) -> Value {
    json!({"bool": {"must_not": [clause]}})
}

fn range_clause(name: &str, bound: &str, value: Value) -> Value {
    json!({"range": {(name): {(bound): value}}})
}

/// Render a condition value as wildcard text. Strings pass through without
/// quoting; anything else uses its compact JSON rendering.
fn wildcard_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Time range
// =============================================================================

fn time_clause(time_range: &TimeRange) -> Result<Value> {
    match time_range.form()? {
        TimeForm::Relative(duration) => Ok(json!({
            "range": {(EVENT_TIME_FIELD): {
                "gte": format!("now-{duration}"),
                "lte": "now",
            }}
        })),
        TimeForm::Absolute { start, end } => {
            let mut bounds = Map::new();
            if let Some(start) = start {
                bounds.insert("gte".to_string(), json!(start.timestamp()));
            }
            let upper = end.map_or_else(|| Utc::now().timestamp(), |e| e.timestamp());
            bounds.insert("lte".to_string(), json!(upper));
            Ok(json!({"range": {(EVENT_TIME_FIELD): bounds}}))
        }
    }
}

// =============================================================================
// Sort and pagination
// =============================================================================

fn build_sort(specs: &[SortSpec]) -> Value {
    if specs.is_empty() {
        return json!([{(EVENT_TIME_FIELD): {"order": "desc"}}]);
    }
    let entries: Vec<Value> = specs
        .iter()
        .map(|spec| json!({(fields::emit(&spec.field)): {"order": spec.order.as_str()}}))
        .collect();
    Value::Array(entries)
}

fn page_size(query: &Query) -> i64 {
    let limit = if query.limit <= 0 {
        DEFAULT_PAGE_SIZE
    } else {
        query.limit
    };
    if query.has_cursor() {
        limit
    } else {
        limit.min(MAX_PAGE_SIZE)
    }
}

// =============================================================================
// Aggregations
// =============================================================================

fn build_aggregations(aggs: &[Aggregation]) -> Value {
    let mut out = Map::new();
    for agg in aggs {
        out.insert(agg.name.clone(), build_aggregation(agg));
    }
    Value::Object(out)
}

fn build_aggregation(agg: &Aggregation) -> Value {
    let name = fields::emit(&agg.field);
    let body = match agg.kind {
        AggregationKind::Terms => json!({"field": name, "size": agg.size}),
        AggregationKind::DateHistogram => json!({
            "field": name,
            "interval": agg.interval.clone().unwrap_or_default(),
        }),
        AggregationKind::Avg
        | AggregationKind::Sum
        | AggregationKind::Min
        | AggregationKind::Max
        | AggregationKind::Stats
        | AggregationKind::Cardinality => json!({"field": name}),
    };

    let mut entry = Map::new();
    entry.insert(agg.kind.as_str().to_string(), body);
    if !agg.aggregations.is_empty() {
        entry.insert("aggs".to_string(), build_aggregations(&agg.aggregations));
    }
    Value::Object(entry)
}
