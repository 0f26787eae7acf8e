//! Decoded result of one cold-call run
//!
//! The bot server hands back whatever its tool call recorded, so nothing
//! here enforces a schema. Any JSON value is kept verbatim and the three
//! known fields are read leniently on demand.

use serde_json::Value;

use crate::core::error::Result;

/// Outcome of one simulated cold call
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    value: Value,
}

impl CallOutcome {
    /// Wrap a decoded JSON value
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// Decode a response body. Only bodies that are not JSON fail.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(value))
    }

    /// `null`, `false`, `0` and `""` decode fine but leave nothing to show
    pub fn is_empty(&self) -> bool {
        !is_truthy(&self.value)
    }

    /// Whether the lead was qualified. Missing reads as `false`.
    pub fn qualified(&self) -> bool {
        self.value.get("qualified").map(is_truthy).unwrap_or(false)
    }

    pub fn reasoning(&self) -> String {
        self.text_field("reasoning")
    }

    pub fn next_step(&self) -> String {
        self.text_field("next_step")
    }

    /// Error message the server puts in place of an outcome when the bot
    /// timed out or never recorded one
    pub fn backend_error(&self) -> Option<String> {
        match self.value.get("error") {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Full value, pretty-printed with two-space indent in received key order
    pub fn pretty_json(&self) -> String {
        // Serializing a Value cannot fail
        serde_json::to_string_pretty(&self.value).unwrap_or_default()
    }

    // Value::get yields None for anything but an object
    fn text_field(&self, key: &str) -> String {
        match self.value.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are false, everything else true
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
