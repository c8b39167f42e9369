//! trigger predicates
//!
//! a predicate says when a trigger fires:
//! - STATES: a clause over the thing's state plus `triggersWhen`
//! - SCHEDULE: a cron schedule
//! - SCHEDULE_ONCE: a single instant, sent as epoch milliseconds

mod parser;
mod schedule;
mod types;

pub use parser::from_json;
pub use schedule::{CronField, CronSchedule};
pub use types::{
    EventSource, Predicate, ScheduleOncePredicate, SchedulePredicate, StatePredicate,
    TriggersWhen,
};

pub(crate) use parser::parse_predicate;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::Result;

impl Predicate {
    /// parse from wire JSON
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        parser::from_json(json)
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Predicate::from_json(&json).map_err(serde::de::Error::custom)
    }
}
