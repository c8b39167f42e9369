//! thingif: trigger predicates for IoT things
//!
//! - [`clause`]: conditions over a thing's state and their JSON wire form
//! - [`predicate`]: when a trigger fires (state, schedule, schedule once)
//! - [`trigger`]: request building and response parsing for command triggers
//! - [`config`] and [`cli`]: the `thingif` developer tool

pub mod clause;
pub mod cli;
pub mod config;
pub mod error;
pub mod json;
pub mod predicate;
pub mod trigger;

pub use clause::{Bound, Clause, ClauseList, ClauseValue, Limit, RangeClause};
pub use error::{Error, Result};
pub use predicate::{EventSource, Predicate, TriggersWhen};
pub use trigger::{ApiSurface, Trigger, TriggerContext, TypedId};
