//! `type:id` identifiers for users, things and groups

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// the kind of entity a [`TypedId`] names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdType {
    User,
    Group,
    Thing,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::User => "user",
            IdType::Group => "group",
            IdType::Thing => "thing",
        }
    }
}

/// an identifier such as `thing:th.1234` or `user:u-abc`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypedId {
    pub id_type: IdType,
    pub id: String,
}

impl TypedId {
    pub fn new(id_type: IdType, id: impl Into<String>) -> Self {
        Self {
            id_type,
            id: id.into(),
        }
    }

    pub fn thing(id: impl Into<String>) -> Self {
        Self::new(IdType::Thing, id)
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(IdType::User, id)
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self::new(IdType::Group, id)
    }
}

impl FromStr for TypedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| Error::malformed(format!("expected 'type:id', got '{}'", s), ""))?;

        if id.is_empty() {
            return Err(Error::malformed(format!("empty id in '{}'", s), ""));
        }

        let id_type = match kind.to_lowercase().as_str() {
            "user" => IdType::User,
            "group" => IdType::Group,
            "thing" => IdType::Thing,
            other => {
                return Err(Error::malformed(
                    format!("unknown id type '{}'", other),
                    "",
                ))
            }
        };

        Ok(Self::new(id_type, id))
    }
}

impl fmt::Display for TypedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id_type.as_str(), self.id)
    }
}

impl Serialize for TypedId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypedId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
