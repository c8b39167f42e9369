//! clause serializer - converts the clause AST to its wire JSON

use serde_json::{json, Map, Value};

use super::types::{Bound, Clause, ClauseValue, EqualsClause, Limit, RangeClause};

pub(crate) const TYPE: &str = "type";
pub(crate) const FIELD: &str = "field";
pub(crate) const VALUE: &str = "value";
pub(crate) const CLAUSE: &str = "clause";
pub(crate) const CLAUSES: &str = "clauses";
pub(crate) const AND: &str = "and";
pub(crate) const OR: &str = "or";
pub(crate) const LOWER_LIMIT: &str = "lowerLimit";
pub(crate) const UPPER_LIMIT: &str = "upperLimit";
pub(crate) const LOWER_INCLUDED: &str = "lowerLimitIncluded";
pub(crate) const UPPER_INCLUDED: &str = "upperLimitIncluded";

pub(crate) const TYPE_EQ: &str = "eq";
pub(crate) const TYPE_NOT: &str = "not";
pub(crate) const TYPE_RANGE: &str = "range";

/// serialize a clause to its canonical JSON form
pub fn to_json(clause: &Clause) -> Value {
    match clause {
        Clause::Equals(eq) => equals_to_json(eq),
        Clause::NotEquals(eq) => json!({
            TYPE: TYPE_NOT,
            CLAUSE: equals_to_json(eq),
        }),
        Clause::Range(range) => range_to_json(range),
        Clause::And(children) => json!({ AND: children_to_json(children.as_slice()) }),
        Clause::Or(children) => json!({ OR: children_to_json(children.as_slice()) }),
    }
}

fn equals_to_json(eq: &EqualsClause) -> Value {
    json!({
        TYPE: TYPE_EQ,
        FIELD: eq.field,
        VALUE: value_to_json(&eq.value),
    })
}

fn range_to_json(range: &RangeClause) -> Value {
    let mut obj = Map::new();
    obj.insert(TYPE.to_string(), Value::from(TYPE_RANGE));
    obj.insert(FIELD.to_string(), Value::from(range.field()));
    if let Some(lower) = range.lower() {
        insert_bound(&mut obj, LOWER_LIMIT, LOWER_INCLUDED, &lower);
    }
    if let Some(upper) = range.upper() {
        insert_bound(&mut obj, UPPER_LIMIT, UPPER_INCLUDED, &upper);
    }
    Value::Object(obj)
}

fn insert_bound(obj: &mut Map<String, Value>, limit_key: &str, included_key: &str, bound: &Bound) {
    obj.insert(limit_key.to_string(), limit_to_json(bound.limit()));
    obj.insert(included_key.to_string(), Value::Bool(bound.included()));
}

fn children_to_json(children: &[Clause]) -> Value {
    Value::Array(children.iter().map(to_json).collect())
}

pub(crate) fn value_to_json(value: &ClauseValue) -> Value {
    match value {
        ClauseValue::String(s) => Value::from(s.as_str()),
        ClauseValue::Int(n) => Value::from(*n),
        ClauseValue::Bool(b) => Value::Bool(*b),
    }
}

pub(crate) fn limit_to_json(limit: Limit) -> Value {
    match limit {
        Limit::Int(n) => Value::from(n),
        Limit::Double(d) => Value::from(d),
    }
}
