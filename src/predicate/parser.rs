//! predicate parser - dispatches on `eventSource`

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use super::types::{
    EventSource, Predicate, ScheduleOncePredicate, SchedulePredicate, StatePredicate,
    TriggersWhen, CONDITION, EVENT_SOURCE, SCHEDULE, SCHEDULE_AT, TRIGGERS_WHEN,
};
use crate::clause::parse_clause;
use crate::error::{Error, Result};
use crate::json::{as_object, child_path, require, require_str, type_name, JsonObject};

/// parse a predicate from wire JSON
pub fn from_json(json: &JsonValue) -> Result<Predicate> {
    parse_predicate(json, "")
}

/// parse a predicate nested at `path` inside a larger document
pub(crate) fn parse_predicate(json: &JsonValue, path: &str) -> Result<Predicate> {
    let obj = as_object(json, path)?;

    let source = require_str(obj, EVENT_SOURCE, path)?;
    let source: EventSource = source
        .parse()
        .map_err(|_| {
            Error::malformed(
                format!("unknown event source: '{}'", source),
                child_path(path, EVENT_SOURCE),
            )
        })?;

    match source {
        EventSource::States => parse_state(obj, path).map(Predicate::State),
        EventSource::Schedule => {
            let schedule = require_str(obj, SCHEDULE, path)?;
            Ok(Predicate::Schedule(SchedulePredicate::new(schedule)))
        }
        EventSource::ScheduleOnce => parse_schedule_once(obj, path).map(Predicate::ScheduleOnce),
    }
}

fn parse_state(obj: &JsonObject, path: &str) -> Result<StatePredicate> {
    let condition = parse_clause(require(obj, CONDITION, path)?, &child_path(path, CONDITION))?;

    let triggers_when = require_str(obj, TRIGGERS_WHEN, path)?;
    let triggers_when: TriggersWhen = triggers_when.parse().map_err(|_| {
        Error::malformed(
            format!("unknown triggersWhen: '{}'", triggers_when),
            child_path(path, TRIGGERS_WHEN),
        )
    })?;

    Ok(StatePredicate {
        condition,
        triggers_when,
    })
}

fn parse_schedule_once(obj: &JsonObject, path: &str) -> Result<ScheduleOncePredicate> {
    let at_path = child_path(path, SCHEDULE_AT);
    let value = require(obj, SCHEDULE_AT, path)?;

    let millis = value.as_i64().ok_or_else(|| {
        Error::malformed(
            format!("expected epoch milliseconds, got {}", type_name(value)),
            &at_path,
        )
    })?;

    let schedule_at: DateTime<Utc> = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| Error::malformed(format!("timestamp out of range: {}", millis), &at_path))?;

    Ok(ScheduleOncePredicate::new(schedule_at))
}
