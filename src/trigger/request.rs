//! trigger REST requests
//!
//! the functions here only build requests; sending them is up to whatever
//! HTTP client the caller uses

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::command::{TriggerOptions, TriggeredCommandForm};
use super::typed_id::TypedId;
use crate::error::{Error, Result};
use crate::json::JsonObject;
use crate::predicate::Predicate;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const HEADER_APP_ID: &str = "X-Kii-AppID";
pub const HEADER_APP_KEY: &str = "X-Kii-AppKey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// a fully built request, ready to hand to an HTTP client
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl TriggerRequest {
    fn new(method: HttpMethod, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_body(mut self, body: JsonObject) -> Self {
        self.headers
            .push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()));
        self.body = Some(JsonValue::Object(body));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// JSON view of the request, used by the CLI
    pub fn to_json(&self) -> JsonValue {
        let headers: JsonObject = self
            .headers
            .iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect();
        serde_json::json!({
            "method": self.method.as_str(),
            "url": self.url,
            "headers": headers,
            "body": self.body,
        })
    }
}

/// which server API the trigger calls go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSurface {
    /// trait-aware API, accepts every predicate
    #[default]
    Trait,
    /// legacy API, state predicates only
    #[serde(rename = "nontrait")]
    NonTrait,
}

impl ApiSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiSurface::Trait => "trait",
            ApiSurface::NonTrait => "nontrait",
        }
    }

    /// reject predicates this surface can't take
    pub fn check_predicate(&self, predicate: &Predicate) -> Result<()> {
        match self {
            ApiSurface::Trait => Ok(()),
            ApiSurface::NonTrait => predicate.require_state().map(|_| ()),
        }
    }
}

impl FromStr for ApiSurface {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "trait" => Ok(ApiSurface::Trait),
            "nontrait" | "non-trait" | "non_trait" => Ok(ApiSurface::NonTrait),
            other => Err(Error::malformed(
                format!("unknown api surface '{}'", other),
                "",
            )),
        }
    }
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// app, owner and target the trigger requests are made for
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerContext {
    pub base_url: String,
    pub app_id: String,
    pub app_key: Option<String>,
    pub owner: TypedId,
    pub target: TypedId,
    pub surface: ApiSurface,
}

impl TriggerContext {
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        owner: TypedId,
        target: TypedId,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            app_id: app_id.into(),
            app_key: None,
            owner,
            target,
            surface: ApiSurface::default(),
        }
    }

    pub fn with_surface(mut self, surface: ApiSurface) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// request carrying the app credential headers
    fn request(&self, method: HttpMethod, url: String) -> TriggerRequest {
        let mut request = TriggerRequest::new(method, url);
        request
            .headers
            .push((HEADER_APP_ID.to_string(), self.app_id.clone()));
        if let Some(key) = &self.app_key {
            request.headers.push((HEADER_APP_KEY.to_string(), key.clone()));
        }
        request
    }

    /// path segments are percent-encoded; the `type:` prefix of the target
    /// is kept as is
    fn triggers_url(&self) -> String {
        format!(
            "{}/thing-if/apps/{}/targets/{}:{}/triggers",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.app_id),
            self.target.id_type.as_str(),
            urlencoding::encode(&self.target.id)
        )
    }

    fn trigger_url(&self, trigger_id: &str) -> String {
        format!("{}/{}", self.triggers_url(), urlencoding::encode(trigger_id))
    }

    fn command_json(&self, form: &TriggeredCommandForm) -> JsonObject {
        let mut command = JsonObject::new();
        command.insert(
            "actions".into(),
            JsonValue::Array(form.actions.clone()),
        );
        let target = form.target.as_ref().unwrap_or(&self.target);
        command.insert("target".into(), JsonValue::String(target.to_string()));
        command.insert("issuer".into(), JsonValue::String(self.owner.to_string()));
        if let Some(title) = &form.title {
            command.insert("title".into(), JsonValue::String(title.clone()));
        }
        if let Some(description) = &form.description {
            command.insert("description".into(), JsonValue::String(description.clone()));
        }
        if let Some(metadata) = &form.metadata {
            command.insert("metadata".into(), JsonValue::Object(metadata.clone()));
        }
        command
    }

    /// build the request that registers a new command trigger
    pub fn post_new_trigger(
        &self,
        form: &TriggeredCommandForm,
        predicate: &Predicate,
        options: Option<&TriggerOptions>,
    ) -> Result<TriggerRequest> {
        self.surface.check_predicate(predicate)?;

        let mut body = JsonObject::new();
        body.insert("predicate".into(), predicate.to_json());
        body.insert("command".into(), JsonValue::Object(self.command_json(form)));
        body.insert("triggersWhat".into(), JsonValue::String("COMMAND".into()));
        if let Some(options) = options {
            options.write_into(&mut body);
        }

        let request = self.request(HttpMethod::Post, self.triggers_url()).with_body(body);
        debug!(
            url = %request.url,
            event_source = %predicate.event_source(),
            "built post trigger request"
        );
        Ok(request)
    }

    /// build a partial update
    ///
    /// fails when command, predicate and options are all absent; options
    /// given with no fields set still count as a part
    pub fn patch_trigger(
        &self,
        trigger_id: &str,
        form: Option<&TriggeredCommandForm>,
        predicate: Option<&Predicate>,
        options: Option<&TriggerOptions>,
    ) -> Result<TriggerRequest> {
        if form.is_none() && predicate.is_none() && options.is_none() {
            return Err(Error::unsupported("patch has no command, predicate or options"));
        }

        let mut body = JsonObject::new();
        if let Some(options) = options {
            options.write_into(&mut body);
        }
        if let Some(form) = form {
            body.insert("command".into(), JsonValue::Object(self.command_json(form)));
        }
        if let Some(predicate) = predicate {
            self.surface.check_predicate(predicate)?;
            body.insert("predicate".into(), predicate.to_json());
        }

        let request =
            self.request(HttpMethod::Patch, self.trigger_url(trigger_id)).with_body(body);
        debug!(url = %request.url, "built patch trigger request");
        Ok(request)
    }

    pub fn enable_trigger(&self, trigger_id: &str, enable: bool) -> TriggerRequest {
        let action = if enable { "enable" } else { "disable" };
        self.request(
            HttpMethod::Put,
            format!("{}/{}", self.trigger_url(trigger_id), action),
        )
    }

    pub fn delete_trigger(&self, trigger_id: &str) -> TriggerRequest {
        self.request(HttpMethod::Delete, self.trigger_url(trigger_id))
    }

    pub fn get_trigger(&self, trigger_id: &str) -> TriggerRequest {
        self.request(HttpMethod::Get, self.trigger_url(trigger_id))
    }

    /// list triggers; a limit of 0 means no limit
    pub fn list_triggers(
        &self,
        best_effort_limit: Option<u32>,
        pagination_key: Option<&str>,
    ) -> TriggerRequest {
        let mut query = Vec::new();
        if let Some(limit) = best_effort_limit.filter(|l| *l > 0) {
            query.push(format!("bestEffortLimit={}", limit));
        }
        if let Some(key) = pagination_key.filter(|k| !k.is_empty()) {
            query.push(format!("paginationKey={}", urlencoding::encode(key)));
        }

        let mut url = self.triggers_url();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        self.request(HttpMethod::Get, url)
    }
}
