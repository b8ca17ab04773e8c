//! Inbound messages.
//!
//! A message pairs an optional payload with a routing context. Upstream
//! stages are free to put anything in the context, so it is kept as a tagged
//! value: look-ups on anything but a mapping simply miss.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::FileWriterError;

/// Per-message routing and override data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MessageContext {
    /// No context was supplied.
    #[default]
    Absent,
    /// A key/value mapping.
    Map(Map<String, Value>),
    /// Something other than a mapping.
    Other(Value),
}

impl MessageContext {
    /// Creates an empty mapping context.
    #[must_use]
    pub fn empty() -> Self {
        Self::Map(Map::new())
    }

    /// Returns the string stored under `key`.
    ///
    /// Missing keys, non-string values, empty strings and non-mapping
    /// contexts all yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self {
            Self::Map(map) => map.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()),
            Self::Absent | Self::Other(_) => None,
        }
    }

    /// Returns true if no context was supplied.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Checks that the context is usable as a mapping.
    ///
    /// `Absent` is fine; `Other` yields `InvalidContext`, which callers treat
    /// as a recoverable condition.
    pub fn validate(&self) -> Result<(), FileWriterError> {
        match self {
            Self::Absent | Self::Map(_) => Ok(()),
            Self::Other(value) => {
                Err(FileWriterError::InvalidContext(value_kind(value).to_string()))
            }
        }
    }
}

impl From<Value> for MessageContext {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Object(map) => Self::Map(map),
            other => Self::Other(other),
        }
    }
}

impl From<Option<Value>> for MessageContext {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

impl From<MessageContext> for Value {
    fn from(context: MessageContext) -> Self {
        match context {
            MessageContext::Absent => Self::Null,
            MessageContext::Map(map) => Self::Object(map),
            MessageContext::Other(value) => value,
        }
    }
}

impl Serialize for MessageContext {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Map(map) => map.serialize(serializer),
            Self::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for MessageContext {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Value::deserialize(deserializer)?.into())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A unit of work handed to the write stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Routing and override data.
    #[serde(default)]
    pub context: MessageContext,
    /// The payload to write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

impl Message {
    /// Creates a message carrying a payload and no context.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            context: MessageContext::Absent,
            data: Some(data.into()),
        }
    }

    /// Creates a message without a payload.
    #[must_use]
    pub fn without_data(context: impl Into<MessageContext>) -> Self {
        Self {
            context: context.into(),
            data: None,
        }
    }

    /// Sets the context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<MessageContext>) -> Self {
        self.context = context.into();
        self
    }

    /// Returns the payload if it is present and non-empty.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.data.as_deref().filter(|d| !d.is_empty())
    }
}
