// ABOUTME: Response envelope wrapping every Container Directory reply.
// ABOUTME: Content is re-shaped into the caller's expected type on demand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub is_success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub content: Option<Value>,
}

impl Envelope {
    pub fn success(content: Value) -> Self {
        Self {
            is_success: true,
            message: String::new(),
            content: Some(content),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: message.into(),
            content: None,
        }
    }

    /// Convert the content into `T`.
    ///
    /// A non-success envelope or missing content yields `Ok(None)`; content of
    /// the wrong shape is an error.
    pub fn into_content<T: DeserializeOwned>(self) -> Result<Option<T>, serde_json::Error> {
        if !self.is_success {
            return Ok(None);
        }
        match self.content {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some),
        }
    }
}

/// Outcome of an existence check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistsResult {
    pub is_success: bool,
    pub message: String,
}

impl From<Envelope> for ExistsResult {
    fn from(envelope: Envelope) -> Self {
        Self {
            is_success: envelope.is_success,
            message: envelope.message,
        }
    }
}
