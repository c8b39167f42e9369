// wire-format tests against the public library API

use serde_json::json;
use thingif::predicate::StatePredicate;
use thingif::{Clause, ClauseList, Predicate, RangeClause, TriggersWhen};

#[test]
fn test_not_equals_wire_form() {
    assert_eq!(
        Clause::not_equals("power", true).to_json(),
        json!({ "type": "not", "clause": { "type": "eq", "field": "power", "value": true } })
    );
}

#[test]
fn test_range_wire_form() {
    assert_eq!(
        Clause::range("color", 1, true, 345, true).unwrap().to_json(),
        json!({
            "type": "range",
            "field": "color",
            "lowerLimit": 1,
            "lowerLimitIncluded": true,
            "upperLimit": 345,
            "upperLimitIncluded": true
        })
    );
}

#[test]
fn test_unknown_type_is_malformed() {
    let err = Clause::from_json(&json!({ "type": "bogus", "field": "x" })).unwrap_err();
    assert!(err.is_malformed());
}

#[test]
fn test_state_predicate_wire_form_and_round_trip() {
    let clause = Clause::and(
        Clause::equals("power", true),
        Clause::greater_than("brightness", 50).unwrap(),
    );
    let predicate: Predicate =
        StatePredicate::new(clause.clone(), TriggersWhen::ConditionFalseToTrue).into();

    let json = predicate.to_json();
    assert_eq!(
        json,
        json!({
            "eventSource": "STATES",
            "triggersWhen": "CONDITION_FALSE_TO_TRUE",
            "condition": clause.to_json()
        })
    );
    assert_eq!(Predicate::from_json(&json).unwrap(), predicate);
}

#[test]
fn test_short_composites_fail_everywhere() {
    assert!(Clause::all(vec![Clause::equals("a", 1)]).is_err());
    assert!(Clause::any(vec![]).is_err());
    assert!(Clause::from_json(&json!({ "and": [{ "type": "eq", "field": "a", "value": 1 }] })).is_err());
    assert!(Clause::from_json(&json!({ "or": [] })).is_err());
}

#[test]
fn test_unserializable_shapes_cannot_be_built() {
    assert!(ClauseList::new(vec![]).is_err());
    assert!(RangeClause::new("x", None, None).is_err());
    assert!(Clause::less_than("t", f64::NAN).is_err());
    assert!(Clause::not_less_than("t", f64::INFINITY).is_err());

    // whatever can be built parses back
    let list = ClauseList::new(vec![Clause::equals("a", 1), Clause::equals("b", true)]).unwrap();
    let clause = Clause::Or(list);
    assert_eq!(Clause::from_json(&clause.to_json()).unwrap(), clause);
}

#[test]
fn test_int_and_double_survive_text_round_trip() {
    let clause = Clause::or(Clause::equals("level", 3), Clause::less_than("temp", 21.5).unwrap());
    let text = serde_json::to_string(&clause).unwrap();
    let back: Clause = serde_json::from_str(&text).unwrap();
    assert_eq!(back, clause);
    assert!(text.contains("\"value\":3"));
    assert!(text.contains("\"upperLimit\":21.5"));
}

#[test]
fn test_legacy_greater_than_value_key_is_accepted() {
    let legacy = json!({
        "type": "range",
        "field": "brightness",
        "value": 50,
        "lowerIncluded": false
    });
    assert_eq!(
        Clause::from_json(&legacy).unwrap(),
        Clause::greater_than("brightness", 50).unwrap()
    );
}
