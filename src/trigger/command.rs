//! the command a trigger executes, and trigger-level options

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::typed_id::TypedId;
use crate::json::JsonObject;

/// what to send when creating or patching a trigger's command
///
/// `issuer` is filled from the context owner; `target` falls back to the
/// context target when not given
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggeredCommandForm {
    pub actions: Vec<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TypedId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

impl TriggeredCommandForm {
    pub fn new(actions: Vec<JsonValue>) -> Self {
        Self {
            actions,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: TypedId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// a trigger's command as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredCommand {
    pub target: TypedId,
    pub issuer: TypedId,

    #[serde(default)]
    pub actions: Vec<JsonValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

/// optional trigger attributes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriggerOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonObject>,
}

impl TriggerOptions {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.metadata.is_none()
    }

    /// copy the present options into a request body
    pub(crate) fn write_into(&self, body: &mut JsonObject) {
        if let Some(title) = &self.title {
            body.insert("title".into(), JsonValue::String(title.clone()));
        }
        if let Some(description) = &self.description {
            body.insert("description".into(), JsonValue::String(description.clone()));
        }
        if let Some(metadata) = &self.metadata {
            body.insert("metadata".into(), JsonValue::Object(metadata.clone()));
        }
    }
}
