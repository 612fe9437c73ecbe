//! Message type definitions for client-server communication.
//!
//! Every message on the wire is a JSON object with a `type` discriminator
//! plus whatever other fields the handler for that type cares about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A decoded message unit.
///
/// # Examples
///
/// ```json
/// { "type": "chat_message", "message": "hello", "session": "abc" }
/// ```
///
/// decodes to an envelope whose `kind` is `"chat_message"` and whose
/// `fields` hold `message` and `session`. The field set is open: handlers
/// read what they need and ignore the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// The discriminator used to select a handler
    #[serde(rename = "type")]
    pub kind: String,

    /// Handler-specific payload fields, never containing `type`
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Envelope {
    /// Creates an envelope with no payload fields.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Map::new(),
        }
    }

    /// Adds a payload field, builder style. A `type` key is ignored since the
    /// discriminator always comes from `kind`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != "type" {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// Looks up a payload field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}
