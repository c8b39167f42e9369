//! clause evaluator
//!
//! evaluates a clause against a thing state document, the same check the
//! platform performs before firing a state trigger

use serde_json::Value as JsonValue;

use super::types::{Bound, Clause, ClauseValue, EqualsClause, RangeClause};
use crate::json::lookup_field;

/// evaluate a clause against a state object
///
/// fields are looked up with dotted names (`"light.color"`); a missing field
/// never satisfies an equality or range comparison
pub fn evaluate(clause: &Clause, state: &JsonValue) -> bool {
    match clause {
        Clause::Equals(eq) => evaluate_equals(eq, state),
        Clause::NotEquals(eq) => !evaluate_equals(eq, state),
        Clause::Range(range) => evaluate_range(range, state),
        Clause::And(children) => children.iter().all(|c| evaluate(c, state)),
        Clause::Or(children) => children.iter().any(|c| evaluate(c, state)),
    }
}

fn evaluate_equals(eq: &EqualsClause, state: &JsonValue) -> bool {
    let actual = match lookup_field(state, &eq.field) {
        Some(v) => v,
        None => return false,
    };

    match (&eq.value, actual) {
        (ClauseValue::String(expected), JsonValue::String(s)) => expected == s,
        (ClauseValue::Bool(expected), JsonValue::Bool(b)) => expected == b,
        (ClauseValue::Int(expected), JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => *expected == i,
            // 3 == 3.0
            None => n.as_f64() == Some(*expected as f64),
        },
        _ => false,
    }
}

fn evaluate_range(range: &RangeClause, state: &JsonValue) -> bool {
    let actual = match lookup_field(state, range.field()).and_then(JsonValue::as_f64) {
        Some(n) => n,
        None => return false,
    };

    range.lower().map_or(true, |b| above(actual, &b))
        && range.upper().map_or(true, |b| below(actual, &b))
}

fn above(actual: f64, bound: &Bound) -> bool {
    let limit = bound.limit().as_f64();
    if bound.included() {
        actual >= limit
    } else {
        actual > limit
    }
}

fn below(actual: f64, bound: &Bound) -> bool {
    let limit = bound.limit().as_f64();
    if bound.included() {
        actual <= limit
    } else {
        actual < limit
    }
}
