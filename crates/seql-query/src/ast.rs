//! Canonical query AST: the vendor-neutral description of one search request.
//!
//! These types mirror the JSON wire shape used by the query API and the
//! saved-query store. A `Query` is decoded once per request, passed through
//! [`crate::validate::validate`] and then to a translator backend, and
//! discarded. Nothing here is mutated after construction.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::time::TimeRange;

// =============================================================================
// Query root
// =============================================================================

/// Root of one canonical query request.
///
/// The empty query (all defaults) is valid: it selects every field, matches
/// every event, and pages with the default limit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Ordered field paths to project into the result (`_source` filtering).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub select: Vec<String>,

    /// Optional filter expression tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterExpr>,

    /// Optional time window, relative or absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,

    /// Ordered sort specifications.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortSpec>,

    /// Maximum number of results (0 means the caller-layer default).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub limit: i64,

    /// Number of results to skip. Mutually exclusive with `cursor`.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub offset: i64,

    /// Opaque continuation token for deep pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Ordered named aggregations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Aggregation>,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

impl Query {
    /// Decode a canonical query from its JSON wire form.
    pub fn decode(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Re-encode to the JSON wire form.
    ///
    /// Defaulted fields are omitted so that decode → encode → decode is
    /// stable across persistence of saved queries.
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// True when set (`Some` and non-empty) — the cursor sentinel used by
    /// pagination checks on both the validation and translation side.
    pub fn has_cursor(&self) -> bool {
        self.cursor.as_deref().is_some_and(|c| !c.is_empty())
    }
}

// =============================================================================
// Filter expressions
// =============================================================================

/// A filter expression node: either a single field condition or a boolean
/// combination of sub-expressions.
///
/// The wire form is structural: a node with a `type` key is compound, a node
/// with `field`/`operator` keys is simple. The two shapes are sealed variants
/// rather than one struct of optionals, so downstream passes match on the
/// shape instead of inferring it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterExpr {
    Compound(CompoundFilter),
    Simple(Condition),
}

// Hand-written so decode failures inside a node keep their message (an
// untagged derive collapses them into "did not match any variant").
impl<'de> Deserialize<'de> for FilterExpr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        if value.get("type").is_some() {
            CompoundFilter::deserialize(value)
                .map(FilterExpr::Compound)
                .map_err(D::Error::custom)
        } else {
            Condition::deserialize(value)
                .map(FilterExpr::Simple)
                .map_err(D::Error::custom)
        }
    }
}

impl FilterExpr {
    /// Build an AND node over the given sub-expressions.
    pub fn and(conditions: Vec<FilterExpr>) -> Self {
        FilterExpr::Compound(CompoundFilter {
            kind: CompoundKind::And,
            conditions,
            condition: None,
        })
    }

    /// Build an OR node over the given sub-expressions.
    pub fn or(conditions: Vec<FilterExpr>) -> Self {
        FilterExpr::Compound(CompoundFilter {
            kind: CompoundKind::Or,
            conditions,
            condition: None,
        })
    }

    /// Build a NOT node around a single sub-expression.
    pub fn negate(expr: FilterExpr) -> Self {
        FilterExpr::Compound(CompoundFilter {
            kind: CompoundKind::Not,
            conditions: Vec::new(),
            condition: Some(Box::new(expr)),
        })
    }
}

/// A compound boolean filter node.
///
/// AND/OR populate `conditions`; NOT populates `condition`. The validator
/// enforces the arity rules; both lists exist here because the wire payload
/// may carry either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundFilter {
    #[serde(rename = "type")]
    pub kind: CompoundKind,

    /// Sub-expressions for AND/OR (at least one required).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<FilterExpr>,

    /// The single sub-expression for NOT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Box<FilterExpr>>,
}

/// Boolean combinator of a [`CompoundFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompoundKind {
    And,
    Or,
    Not,
}

impl CompoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundKind::And => "AND",
            CompoundKind::Or => "OR",
            CompoundKind::Not => "NOT",
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A simple field condition: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field path with leading separator, e.g. `.actor.user.name`.
    pub field: String,
    pub operator: Operator,
    /// Operand; the required shape depends on the operator.
    #[serde(default)]
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Condition {
            field: field.into(),
            operator,
            value,
        }
    }
}

/// Comparison operators supported in simple conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    Exists,
    Cidr,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Contains => "contains",
            Operator::StartsWith => "startsWith",
            Operator::EndsWith => "endsWith",
            Operator::Regex => "regex",
            Operator::Exists => "exists",
            Operator::Cidr => "cidr",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(Operator::Eq),
            "ne" => Some(Operator::Ne),
            "gt" => Some(Operator::Gt),
            "gte" => Some(Operator::Gte),
            "lt" => Some(Operator::Lt),
            "lte" => Some(Operator::Lte),
            "in" => Some(Operator::In),
            "contains" => Some(Operator::Contains),
            "startsWith" => Some(Operator::StartsWith),
            "endsWith" => Some(Operator::EndsWith),
            "regex" => Some(Operator::Regex),
            "exists" => Some(Operator::Exists),
            "cidr" => Some(Operator::Cidr),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Operator {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let s = String::deserialize(deserializer)?;
        Operator::from_str(&s).ok_or_else(|| D::Error::custom(format!("unsupported operator: {s}")))
    }
}

// =============================================================================
// Sort
// =============================================================================

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Aggregations
// =============================================================================

/// A named aggregation over matching events. Recursive: bucket aggregations
/// may carry nested sub-aggregations to arbitrary depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Output key for this aggregation's result. Unique among siblings.
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: AggregationKind,

    /// Field path the aggregation runs over.
    #[serde(default)]
    pub field: String,

    /// Bucket count for `terms` aggregations.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: i64,

    /// Bucket interval for `date_histogram` aggregations, e.g. `1h`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Nested sub-aggregations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aggregations: Vec<Aggregation>,
}

/// Aggregation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    Terms,
    DateHistogram,
    Avg,
    Sum,
    Min,
    Max,
    Stats,
    Cardinality,
}

impl AggregationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationKind::Terms => "terms",
            AggregationKind::DateHistogram => "date_histogram",
            AggregationKind::Avg => "avg",
            AggregationKind::Sum => "sum",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::Stats => "stats",
            AggregationKind::Cardinality => "cardinality",
        }
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
