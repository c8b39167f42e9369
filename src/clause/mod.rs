//! clause expression model for state trigger conditions
//!
//! a clause is a small recursive expression tree:
//! - leaf comparisons: eq, not (wrapping eq), range (lower and/or upper bound)
//! - composition: and / or over two or more children, order preserved
//!
//! clauses convert to and from the platform's JSON wire format; for every
//! constructible clause `from_json(&to_json(&c)) == c`, with integer and
//! double operands kept apart.

mod eval;
mod parser;
mod serialize;
mod types;


pub use eval::evaluate;
pub use parser::from_json;
pub use serialize::to_json;
pub use types::{Bound, Clause, ClauseList, ClauseValue, EqualsClause, Limit, RangeClause};

pub(crate) use parser::parse_clause;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::Result;

impl Clause {
    /// serialize to the canonical wire JSON
    pub fn to_json(&self) -> JsonValue {
        serialize::to_json(self)
    }

    /// parse from wire JSON
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        parser::from_json(json)
    }

    /// evaluate against a thing state document
    pub fn evaluate(&self, state: &JsonValue) -> bool {
        eval::evaluate(self, state)
    }
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Clause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Clause::from_json(&json).map_err(serde::de::Error::custom)
    }
}
