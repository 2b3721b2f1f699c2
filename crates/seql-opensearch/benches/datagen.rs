//! Query generators shared by the benchmarks.

use serde_json::json;

use seql_query::{Condition, FilterExpr, Operator, Query};

/// A flat AND over `n` simple conditions across a few operator kinds.
pub fn gen_wide_filter(n: usize) -> FilterExpr {
    let conditions = (0..n)
        .map(|i| match i % 4 {
            0 => FilterExpr::Simple(Condition::new(
                format!(".field_{i}"),
                Operator::Eq,
                json!(format!("value_{i}")),
            )),
            1 => FilterExpr::Simple(Condition::new(
                format!(".field_{i}.count"),
                Operator::Gte,
                json!(i as i64),
            )),
            2 => FilterExpr::Simple(Condition::new(
                format!(".field_{i}.uid"),
                Operator::In,
                json!([i, i + 1, i + 2]),
            )),
            _ => FilterExpr::negate(FilterExpr::Simple(Condition::new(
                format!(".field_{i}.ip"),
                Operator::Cidr,
                json!("10.0.0.0/8"),
            ))),
        })
        .collect();
    FilterExpr::and(conditions)
}

/// An alternating AND/OR tree `depth` levels deep, `width` branches per level.
pub fn gen_deep_filter(depth: usize, width: usize) -> FilterExpr {
    if depth == 0 {
        return FilterExpr::Simple(Condition::new(".severity", Operator::Eq, json!("High")));
    }
    let children = (0..width)
        .map(|_| gen_deep_filter(depth - 1, width))
        .collect();
    if depth % 2 == 0 {
        FilterExpr::and(children)
    } else {
        FilterExpr::or(children)
    }
}

/// A representative full query: projection, filter, window, sort, aggs.
pub fn gen_query(filter_width: usize) -> Query {
    let mut query = Query::decode(
        r#"{
            "select": [".severity", ".actor.user.name", ".src_endpoint.ip"],
            "timeRange": {"last": "24h"},
            "sort": [{"field": ".time", "order": "desc"}],
            "limit": 500,
            "aggregations": [{
                "name": "top_users", "type": "terms", "field": ".actor.user.name", "size": 10,
                "aggregations": [{"name": "avg_sev", "type": "avg", "field": ".severity_id"}]
            }]
        }"#,
    )
    .unwrap();
    query.filter = Some(gen_wide_filter(filter_width));
    query
}
