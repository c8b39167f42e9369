//! predicate types and their wire serialization

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde_json::{json, Value as JsonValue};

use super::schedule::CronSchedule;
use crate::clause::Clause;
use crate::error::{Error, Result};

pub(crate) const EVENT_SOURCE: &str = "eventSource";
pub(crate) const CONDITION: &str = "condition";
pub(crate) const TRIGGERS_WHEN: &str = "triggersWhen";
pub(crate) const SCHEDULE: &str = "schedule";
pub(crate) const SCHEDULE_AT: &str = "scheduleAt";

/// what kind of event fires the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    States,
    Schedule,
    ScheduleOnce,
}

impl EventSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventSource::States => "STATES",
            EventSource::Schedule => "SCHEDULE",
            EventSource::ScheduleOnce => "SCHEDULE_ONCE",
        }
    }
}

impl FromStr for EventSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "STATES" => Ok(EventSource::States),
            "SCHEDULE" => Ok(EventSource::Schedule),
            "SCHEDULE_ONCE" => Ok(EventSource::ScheduleOnce),
            other => Err(Error::malformed(
                format!("unknown event source: '{}'", other),
                EVENT_SOURCE,
            )),
        }
    }
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// when a state trigger fires relative to its condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggersWhen {
    /// the condition changes from false to true
    ConditionFalseToTrue,
    /// every state update while the condition is true
    ConditionTrue,
    /// the condition result changes either way
    ConditionChanged,
}

impl TriggersWhen {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggersWhen::ConditionFalseToTrue => "CONDITION_FALSE_TO_TRUE",
            TriggersWhen::ConditionTrue => "CONDITION_TRUE",
            TriggersWhen::ConditionChanged => "CONDITION_CHANGED",
        }
    }
}

impl FromStr for TriggersWhen {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CONDITION_FALSE_TO_TRUE" => Ok(TriggersWhen::ConditionFalseToTrue),
            "CONDITION_TRUE" => Ok(TriggersWhen::ConditionTrue),
            "CONDITION_CHANGED" => Ok(TriggersWhen::ConditionChanged),
            other => Err(Error::malformed(
                format!("unknown triggersWhen: '{}'", other),
                TRIGGERS_WHEN,
            )),
        }
    }
}

impl fmt::Display for TriggersWhen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// fires when the thing's state satisfies a clause
#[derive(Debug, Clone, PartialEq)]
pub struct StatePredicate {
    pub condition: Clause,
    pub triggers_when: TriggersWhen,
}

impl StatePredicate {
    pub fn new(condition: Clause, triggers_when: TriggersWhen) -> Self {
        Self {
            condition,
            triggers_when,
        }
    }
}

/// fires repeatedly on a cron schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePredicate {
    pub schedule: String,
}

impl SchedulePredicate {
    /// the schedule string is stored as given; see [`Self::validate_schedule`]
    pub fn new(schedule: impl Into<String>) -> Self {
        Self {
            schedule: schedule.into(),
        }
    }

    /// check the schedule against the five-field cron grammar
    pub fn validate_schedule(&self) -> std::result::Result<CronSchedule, String> {
        CronSchedule::parse(&self.schedule)
    }
}

/// fires once at a fixed instant
///
/// the wire carries epoch milliseconds, so the instant is truncated to
/// millisecond precision on construction. It should lie in the future when
/// the trigger is registered; that is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleOncePredicate {
    schedule_at: DateTime<Utc>,
}

impl ScheduleOncePredicate {
    pub fn new(schedule_at: DateTime<Utc>) -> Self {
        // leap-second instants fall back to plain truncation
        let schedule_at = DateTime::from_timestamp_millis(schedule_at.timestamp_millis())
            .unwrap_or_else(|| schedule_at.trunc_subsecs(3));
        Self { schedule_at }
    }

    pub fn schedule_at(&self) -> DateTime<Utc> {
        self.schedule_at
    }
}

/// condition plus metadata governing when a trigger fires
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    State(StatePredicate),
    Schedule(SchedulePredicate),
    ScheduleOnce(ScheduleOncePredicate),
}

impl Predicate {
    pub fn state(condition: Clause, triggers_when: TriggersWhen) -> Self {
        Predicate::State(StatePredicate::new(condition, triggers_when))
    }

    pub fn schedule(schedule: impl Into<String>) -> Self {
        Predicate::Schedule(SchedulePredicate::new(schedule))
    }

    pub fn schedule_once(schedule_at: DateTime<Utc>) -> Self {
        Predicate::ScheduleOnce(ScheduleOncePredicate::new(schedule_at))
    }

    pub fn event_source(&self) -> EventSource {
        match self {
            Predicate::State(_) => EventSource::States,
            Predicate::Schedule(_) => EventSource::Schedule,
            Predicate::ScheduleOnce(_) => EventSource::ScheduleOnce,
        }
    }

    /// the state predicate, or `UnsupportedVariant` for schedule predicates
    pub fn require_state(&self) -> Result<&StatePredicate> {
        match self {
            Predicate::State(state) => Ok(state),
            other => Err(Error::unsupported(format!(
                "{} predicates are not accepted here, only STATES",
                other.event_source()
            ))),
        }
    }

    /// serialize to the wire JSON
    pub fn to_json(&self) -> JsonValue {
        match self {
            Predicate::State(state) => json!({
                EVENT_SOURCE: EventSource::States.as_str(),
                TRIGGERS_WHEN: state.triggers_when.as_str(),
                CONDITION: state.condition.to_json(),
            }),
            Predicate::Schedule(schedule) => json!({
                EVENT_SOURCE: EventSource::Schedule.as_str(),
                SCHEDULE: schedule.schedule,
            }),
            Predicate::ScheduleOnce(once) => json!({
                EVENT_SOURCE: EventSource::ScheduleOnce.as_str(),
                SCHEDULE_AT: once.schedule_at.timestamp_millis(),
            }),
        }
    }
}

impl From<StatePredicate> for Predicate {
    fn from(p: StatePredicate) -> Self {
        Predicate::State(p)
    }
}

impl From<SchedulePredicate> for Predicate {
    fn from(p: SchedulePredicate) -> Self {
        Predicate::Schedule(p)
    }
}

impl From<ScheduleOncePredicate> for Predicate {
    fn from(p: ScheduleOncePredicate) -> Self {
        Predicate::ScheduleOnce(p)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::State(state) => {
                write!(f, "STATES {} when {}", state.triggers_when, state.condition)
            }
            Predicate::Schedule(schedule) => write!(f, "SCHEDULE '{}'", schedule.schedule),
            Predicate::ScheduleOnce(once) => {
                write!(f, "SCHEDULE_ONCE at {}", once.schedule_at.to_rfc3339())
            }
        }
    }
}
