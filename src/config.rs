//! Module settings.
//!
//! Settings are read from a JSON document such as
//! `{"workflow": "detailed", "require_quantities_per_egg_type": false}`.
//! Persisting them is the host's job; this crate only reads them.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::harvest::workflow::{WorkflowMode, REQUIRE_PER_TYPE_KEY, WORKFLOW_KEY};
use crate::traits::ConfigStore;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings document: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggsSettings {
    /// Stored workflow id; unrecognized values resolve to the simple workflow
    #[serde(default)]
    pub workflow: Option<String>,

    /// Legacy flag, superseded by `workflow`
    #[serde(default)]
    pub require_quantities_per_egg_type: bool,
}

impl EggsSettings {
    pub fn with_workflow(mode: WorkflowMode) -> Self {
        Self {
            workflow: Some(mode.id().to_string()),
            require_quantities_per_egg_type: false,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl ConfigStore for EggsSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        match key {
            WORKFLOW_KEY => self.workflow.clone(),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> bool {
        match key {
            REQUIRE_PER_TYPE_KEY => self.require_quantities_per_egg_type,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harvest::workflow::WorkflowPolicy;

    #[test]
    fn test_settings_from_json() {
        let settings = EggsSettings::from_json_str(r#"{"workflow": "detailed"}"#).unwrap();
        assert_eq!(settings.workflow.as_deref(), Some("detailed"));
        assert!(!settings.require_quantities_per_egg_type);

        let policy = WorkflowPolicy::from_config(&settings);
        assert_eq!(policy.mode, WorkflowMode::Detailed);
    }

    #[test]
    fn test_empty_settings_resolve_to_simple() {
        let settings = EggsSettings::from_json_str("{}").unwrap();
        assert_eq!(WorkflowPolicy::from_config(&settings).mode, WorkflowMode::Simple);
    }

    #[test]
    fn test_invalid_settings_document() {
        let err = EggsSettings::from_json_str(r#"{"workflow": 3}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_settings_file() {
        let err = EggsSettings::load(Path::new("/nonexistent/farm_eggs.settings.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
