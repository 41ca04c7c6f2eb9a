//! Caller-side description of one primitive in a mode.

use serde::{Deserialize, Serialize};

use super::error::RenderModeError;
use super::options::{parse_option, OptionBag, OptionFormat, OptionTypeError};

/// Names a primitive kind and carries the options it should start with.
///
/// In JSON a descriptor is either an object
/// `{"name": "depth", "options": {"min": 0}}` or just the kind name `"depth"`.
///
/// Unknown keys are rejected, so a misspelt `"option"` fails instead of
/// silently starting the primitive with its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrimitiveDescriptor {
    /// Registry key of the primitive kind.
    pub name: String,
    /// Options handed to the primitive's `start` hook.
    #[serde(default)]
    pub options: OptionBag,
}

impl PrimitiveDescriptor {
    /// Creates a descriptor with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: OptionBag::new(),
        }
    }

    /// Builder-style option setter.
    pub fn with_option(
        mut self,
        name: impl Into<String>,
        value: impl Into<super::options::OptionValue>,
    ) -> Self {
        self.options.insert(name, value);
        self
    }

    /// Typed option lookup; `Ok(None)` when the option is not set.
    pub fn option<T: OptionFormat>(&self, name: &str) -> Result<Option<T>, OptionTypeError> {
        parse_option(Some(&self.options), name)
    }

    /// Reads entry `index` of a JSON mode description.
    pub(crate) fn from_json(
        index: usize,
        value: &serde_json::Value,
    ) -> Result<Self, RenderModeError> {
        match value {
            serde_json::Value::String(name) => Ok(Self::new(name.clone())),
            serde_json::Value::Object(_) => {
                Self::deserialize(value).map_err(|err| RenderModeError::InvalidDescriptor {
                    index,
                    reason: err.to_string(),
                })
            }
            other => Err(RenderModeError::InvalidDescriptor {
                index,
                reason: format!("expected a primitive name or object, found {}", json_kind(other)),
            }),
        }
    }
}

/// Short name of a JSON value's type.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
