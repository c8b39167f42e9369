//! command triggers: request building and response parsing
//!
//! ```text
//! TriggerContext ──post/patch/enable/delete/get/list──> TriggerRequest
//! server JSON ──Trigger::from_response──> Trigger
//! ```

mod command;
mod request;
mod response;
mod typed_id;

pub use command::{TriggerOptions, TriggeredCommand, TriggeredCommandForm};
pub use request::{
    ApiSurface, HttpMethod, TriggerContext, TriggerRequest, CONTENT_TYPE_JSON, HEADER_APP_ID,
    HEADER_APP_KEY,
};
pub use response::{ListTriggersResult, Trigger};
pub use typed_id::{IdType, TypedId};
