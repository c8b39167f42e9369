//! clause parser - converts wire JSON to the clause AST
//!
//! accepts the canonical shapes written by the serializer plus the shapes
//! used by the newer platform revision:
//! - `{"type": "and" | "or", "clauses": [...]}` composites
//! - `lowerIncluded` / `upperIncluded` flag names
//! - `value` as the lower limit of a `range` clause

use serde_json::Value as JsonValue;

use super::serialize::{
    AND, CLAUSE, CLAUSES, FIELD, LOWER_INCLUDED, LOWER_LIMIT, OR, TYPE, TYPE_EQ, TYPE_NOT,
    TYPE_RANGE, UPPER_INCLUDED, UPPER_LIMIT, VALUE,
};
use super::types::{Bound, Clause, ClauseList, ClauseValue, EqualsClause, Limit, RangeClause};
use crate::error::{Error, Result};
use crate::json::{
    as_object, child_path, index_path, optional_bool, require, require_str,
    type_name, JsonObject,
};

const LOWER_INCLUDED_SHORT: &str = "lowerIncluded";
const UPPER_INCLUDED_SHORT: &str = "upperIncluded";

/// parse a JSON value into a clause AST
pub fn from_json(json: &JsonValue) -> Result<Clause> {
    parse_clause(json, "")
}

/// parse a clause nested at `path` inside a larger document
pub(crate) fn parse_clause(json: &JsonValue, path: &str) -> Result<Clause> {
    let obj = as_object(json, path)?;

    // bare composites carry no type tag
    if !obj.contains_key(TYPE) {
        if let Some(children) = obj.get(AND) {
            return parse_children(children, &child_path(path, AND)).map(Clause::And);
        }
        if let Some(children) = obj.get(OR) {
            return parse_children(children, &child_path(path, OR)).map(Clause::Or);
        }
    }

    let kind = require_str(obj, TYPE, path)?;
    match kind {
        TYPE_EQ => parse_equals(obj, path).map(Clause::Equals),
        TYPE_NOT => parse_not(obj, path),
        TYPE_RANGE => parse_range(obj, path).map(Clause::Range),
        AND => {
            let children = require(obj, CLAUSES, path)?;
            parse_children(children, &child_path(path, CLAUSES)).map(Clause::And)
        }
        OR => {
            let children = require(obj, CLAUSES, path)?;
            parse_children(children, &child_path(path, CLAUSES)).map(Clause::Or)
        }
        other => Err(Error::malformed(
            format!("unknown clause type: '{}'", other),
            child_path(path, TYPE),
        )),
    }
}

fn parse_equals(obj: &JsonObject, path: &str) -> Result<EqualsClause> {
    let field = require_str(obj, FIELD, path)?;
    let value = require(obj, VALUE, path)?;
    Ok(EqualsClause {
        field: field.to_string(),
        value: parse_value(value, &child_path(path, VALUE))?,
    })
}

fn parse_not(obj: &JsonObject, path: &str) -> Result<Clause> {
    let inner_path = child_path(path, CLAUSE);
    let inner = as_object(require(obj, CLAUSE, path)?, &inner_path)?;

    let inner_kind = require_str(inner, TYPE, &inner_path)?;
    if inner_kind != TYPE_EQ {
        return Err(Error::malformed(
            format!("'not' must wrap an 'eq' clause, got '{}'", inner_kind),
            child_path(&inner_path, TYPE),
        ));
    }

    parse_equals(inner, &inner_path).map(Clause::NotEquals)
}

fn parse_range(obj: &JsonObject, path: &str) -> Result<RangeClause> {
    let field = require_str(obj, FIELD, path)?;

    let lower_key = if obj.contains_key(LOWER_LIMIT) {
        Some(LOWER_LIMIT)
    } else if obj.contains_key(VALUE) {
        Some(VALUE)
    } else {
        None
    };

    let lower = match lower_key {
        Some(key) => Some(parse_bound(
            obj,
            key,
            &[LOWER_INCLUDED, LOWER_INCLUDED_SHORT],
            path,
        )?),
        None => None,
    };
    let upper = if obj.contains_key(UPPER_LIMIT) {
        Some(parse_bound(
            obj,
            UPPER_LIMIT,
            &[UPPER_INCLUDED, UPPER_INCLUDED_SHORT],
            path,
        )?)
    } else {
        None
    };

    if lower.is_none() && upper.is_none() {
        return Err(Error::malformed(
            "range needs 'lowerLimit' or 'upperLimit'",
            path,
        ));
    }

    RangeClause::new(field, lower, upper).map_err(|e| Error::malformed(e.to_string(), path))
}

fn parse_bound(
    obj: &JsonObject,
    limit_key: &str,
    included_keys: &[&str],
    path: &str,
) -> Result<Bound> {
    let limit_path = child_path(path, limit_key);
    let limit = parse_limit(require(obj, limit_key, path)?, &limit_path)?;

    let mut included = None;
    for key in included_keys {
        if let Some(flag) = optional_bool(obj, key, path)? {
            included = Some(flag);
            break;
        }
    }
    let included = included.ok_or_else(|| {
        Error::malformed(format!("missing '{}'", included_keys[0]), path)
    })?;

    Bound::new(limit, included).map_err(|e| Error::malformed(e.to_string(), limit_path))
}

fn parse_children(json: &JsonValue, path: &str) -> Result<ClauseList> {
    let items = json.as_array().ok_or_else(|| {
        Error::malformed(format!("expected array, got {}", type_name(json)), path)
    })?;

    if items.len() < 2 {
        return Err(Error::malformed(
            format!("needs at least 2 clauses, got {}", items.len()),
            path,
        ));
    }

    let children = items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_clause(item, &index_path(path, i)))
        .collect::<Result<Vec<_>>>()?;

    ClauseList::new(children).map_err(|e| Error::malformed(e.to_string(), path))
}

fn parse_value(json: &JsonValue, path: &str) -> Result<ClauseValue> {
    match json {
        JsonValue::String(s) => Ok(ClauseValue::String(s.clone())),
        JsonValue::Bool(b) => Ok(ClauseValue::Bool(*b)),
        JsonValue::Number(n) => n.as_i64().map(ClauseValue::Int).ok_or_else(|| {
            Error::malformed(
                format!("expected string, integer or boolean, got {}", n),
                path,
            )
        }),
        other => Err(Error::malformed(
            format!(
                "expected string, integer or boolean, got {}",
                type_name(other)
            ),
            path,
        )),
    }
}

fn parse_limit(json: &JsonValue, path: &str) -> Result<Limit> {
    match json {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Limit::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Limit::Double(f))
            } else {
                Err(Error::malformed("invalid number", path))
            }
        }
        other => Err(Error::malformed(
            format!("expected number, got {}", type_name(other)),
            path,
        )),
    }
}
