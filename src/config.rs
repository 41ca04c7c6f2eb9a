//! # Render Mode Configuration
//!
//! Named render modes read from a JSON document:
//!
//! ```json
//! {
//!     "modes": {
//!         "normal": ["buried"],
//!         "slice": ["buried", {"name": "depth", "options": {"min": 0, "max": 64}}]
//!     }
//! }
//! ```
//!
//! Each mode is kept as raw JSON and only interpreted when it is built, so a
//! broken mode does not stop the others from loading.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::core::StResource;
use crate::render_state::RenderState;
use crate::rendermodes::{PrimitiveRegistry, RenderMode, RenderModeError};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No mode with that name
    #[error("Unknown render mode: {0}")]
    UnknownMode(String),

    /// The mode exists but could not be built
    #[error("Render mode \"{mode}\": {source}")]
    Build {
        /// Name of the mode
        mode: String,
        #[source]
        source: RenderModeError,
    },
}

/// A set of named render mode descriptions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderModeConfig {
    #[serde(default)]
    modes: BTreeMap<String, serde_json::Value>,
}

impl RenderModeConfig {
    /// Parses a configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Configured mode names, sorted.
    pub fn mode_names(&self) -> impl Iterator<Item = &str> {
        self.modes.keys().map(String::as_str)
    }

    /// Builds the mode called `name` against `registry`, sharing `state`.
    pub fn build_mode(
        &self,
        name: &str,
        registry: &PrimitiveRegistry,
        state: StResource<RenderState>,
    ) -> Result<RenderMode, ConfigError> {
        let description = self
            .modes
            .get(name)
            .ok_or_else(|| ConfigError::UnknownMode(name.to_owned()))?;

        RenderMode::from_json(description, registry, state).map_err(|source| ConfigError::Build {
            mode: name.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    const CONFIG: &str = r#"{
        "modes": {
            "slice": ["buried", {"name": "depth", "options": {"min": 0, "max": 64}}],
            "broken": {"name": "depth"},
            "typo": ["overlay", {"name": "depth", "options": {"max": "high"}}]
        }
    }"#;

    #[test]
    fn modes_are_listed_and_built_by_name() {
        let config = RenderModeConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.mode_names().collect::<Vec<_>>(), vec!["broken", "slice", "typo"]);

        let mode = config
            .build_mode("slice", &PrimitiveRegistry::builtin(), StResource::default())
            .unwrap();
        assert_eq!(mode.primitive_names(), vec!["buried", "depth"]);
        assert!(mode.hidden(Point3::new(0, 65, 0)));
    }

    #[test]
    fn build_failures_name_the_mode() {
        let config = RenderModeConfig::from_json_str(CONFIG).unwrap();
        let registry = PrimitiveRegistry::builtin();

        let err = config
            .build_mode("broken", &registry, StResource::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Build { source: RenderModeError::SequenceTypeError(_), .. }
        ));

        let err = config.build_mode("typo", &registry, StResource::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("typo"), "{message}");
        assert!(message.contains("\"max\""), "{message}");

        let err = config.build_mode("nope", &registry, StResource::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMode(_)));
    }

    #[test]
    fn malformed_documents_are_parse_errors() {
        assert!(matches!(
            RenderModeConfig::from_json_str("{\"modes\": ["),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            RenderModeConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
