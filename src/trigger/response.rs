//! trigger server responses

use serde_json::Value as JsonValue;
use tracing::warn;

use super::command::TriggeredCommand;
use super::typed_id::TypedId;
use crate::error::{Error, Result};
use crate::json::{
    as_object, child_path, index_path, optional_bool, optional_object, optional_str, require,
    require_str, JsonObject,
};
use crate::predicate::{parse_predicate, Predicate};

/// a registered trigger
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub trigger_id: String,
    /// the server leaves this out, it comes from the request context
    pub target: TypedId,
    pub enabled: bool,
    pub predicate: Predicate,
    pub command: Option<TriggeredCommand>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<JsonObject>,
}

impl Trigger {
    /// parse a trigger object from a get or list response
    pub fn from_response(json: &JsonValue, target: &TypedId) -> Result<Self> {
        parse_trigger(json, target, "")
    }
}

fn parse_trigger(json: &JsonValue, target: &TypedId, path: &str) -> Result<Trigger> {
    let obj = as_object(json, path)?;

    let trigger_id = require_str(obj, "triggerID", path)?.to_string();
    let enabled = !optional_bool(obj, "disabled", path)?.unwrap_or(false);
    let predicate = parse_predicate(
        require(obj, "predicate", path)?,
        &child_path(path, "predicate"),
    )?;

    let command = match obj.get("command") {
        None | Some(JsonValue::Null) => {
            if let Some(what) = optional_str(obj, "triggersWhat", path)? {
                if what == "COMMAND" {
                    warn!(trigger_id = %trigger_id, "command trigger without a command");
                }
            }
            None
        }
        Some(value) => Some(serde_json::from_value(value.clone()).map_err(|e| {
            Error::malformed(e.to_string(), child_path(path, "command"))
        })?),
    };

    Ok(Trigger {
        trigger_id,
        target: target.clone(),
        enabled,
        predicate,
        command,
        title: optional_str(obj, "title", path)?.map(str::to_string),
        description: optional_str(obj, "description", path)?.map(str::to_string),
        metadata: optional_object(obj, "metadata", path)?.cloned(),
    })
}

/// one page of a trigger listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListTriggersResult {
    pub triggers: Vec<Trigger>,
    pub next_pagination_key: Option<String>,
}

impl ListTriggersResult {
    /// parse a list response; one bad trigger fails the whole page
    pub fn from_response(json: &JsonValue, target: &TypedId) -> Result<Self> {
        let obj = as_object(json, "")?;

        let triggers = match obj.get("triggers") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| parse_trigger(item, target, &index_path("triggers", i)))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(Error::malformed(
                    format!("expected array, got {}", crate::json::type_name(other)),
                    "triggers",
                ))
            }
        };

        let next_pagination_key = optional_str(obj, "nextPaginationKey", "")?.map(str::to_string);

        Ok(Self {
            triggers,
            next_pagination_key,
        })
    }

    pub fn has_next(&self) -> bool {
        self.next_pagination_key.is_some()
    }
}
