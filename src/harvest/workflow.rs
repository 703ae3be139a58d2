//! Egg harvest workflow modes.
//!
//! The active [`WorkflowMode`] is resolved once per submission from settings
//! and folded into a [`WorkflowPolicy`], which is the only thing the quantity
//! builder, validator and form consult.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::traits::ConfigStore;

/// Settings key holding the workflow id.
pub const WORKFLOW_KEY: &str = "workflow";

/// Legacy settings key, superseded by [`WORKFLOW_KEY`].
pub const REQUIRE_PER_TYPE_KEY: &str = "require_quantities_per_egg_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowMode {
    /// Required total quantity, optional subtotals per egg type
    #[default]
    Simple,
    /// Required subtotals per egg type, total computed from them
    Detailed,
}

impl WorkflowMode {
    /// Options in the order a settings screen lists them.
    pub const ALL: [WorkflowMode; 2] = [WorkflowMode::Simple, WorkflowMode::Detailed];

    /// Maps a stored settings value to a mode; anything unrecognized is the default.
    pub fn resolve(config_value: Option<&str>) -> Self {
        match config_value {
            Some("simple") => Self::Simple,
            Some("detailed") => Self::Detailed,
            _ => Self::default(),
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Detailed => "detailed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Detailed => "Detailed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Simple => {
                "Required total quantity field. Optional additional subtotal quantities per egg type."
            }
            Self::Detailed => {
                "Required subtotal quantities per egg type. Total quantity is automatically calculated as a sum of all provided quantities."
            }
        }
    }
}

impl fmt::Display for WorkflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Resolved workflow for one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowPolicy {
    pub mode: WorkflowMode,
    /// Legacy flag; forces per-type entry even under the simple mode
    pub require_quantities_per_egg_type: bool,
}

impl WorkflowPolicy {
    pub fn new(mode: WorkflowMode) -> Self {
        Self {
            mode,
            require_quantities_per_egg_type: false,
        }
    }

    pub fn from_config(config: &dyn ConfigStore) -> Self {
        Self {
            mode: WorkflowMode::resolve(config.get_string(WORKFLOW_KEY).as_deref()),
            require_quantities_per_egg_type: config.get_bool(REQUIRE_PER_TYPE_KEY),
        }
    }

    /// True when subtotals are mandatory and the total is their sum.
    pub fn derives_total(&self) -> bool {
        self.mode == WorkflowMode::Detailed || self.require_quantities_per_egg_type
    }

    /// True when the single total quantity field is shown and required.
    pub fn accepts_total(&self) -> bool {
        !self.derives_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapConfig(HashMap<&'static str, &'static str>);

    impl ConfigStore for MapConfig {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }

        fn get_bool(&self, key: &str) -> bool {
            self.0.get(key).is_some_and(|v| *v == "1")
        }
    }

    #[test]
    fn test_resolve_known_ids() {
        assert_eq!(WorkflowMode::resolve(Some("simple")), WorkflowMode::Simple);
        assert_eq!(WorkflowMode::resolve(Some("detailed")), WorkflowMode::Detailed);
    }

    #[test]
    fn test_resolve_falls_back_to_simple() {
        assert_eq!(WorkflowMode::resolve(Some("bogus")), WorkflowMode::Simple);
        assert_eq!(WorkflowMode::resolve(Some("")), WorkflowMode::Simple);
        assert_eq!(WorkflowMode::resolve(Some("Detailed")), WorkflowMode::Simple);
        assert_eq!(WorkflowMode::resolve(None), WorkflowMode::Simple);
    }

    #[test]
    fn test_resolve_round_trips_ids() {
        for mode in WorkflowMode::ALL {
            assert_eq!(WorkflowMode::resolve(Some(mode.id())), mode);
        }
    }

    #[test]
    fn test_policy_from_config() {
        let config = MapConfig(HashMap::from([(WORKFLOW_KEY, "detailed")]));
        let policy = WorkflowPolicy::from_config(&config);
        assert_eq!(policy.mode, WorkflowMode::Detailed);
        assert!(policy.derives_total());

        let legacy = MapConfig(HashMap::from([(REQUIRE_PER_TYPE_KEY, "1")]));
        let policy = WorkflowPolicy::from_config(&legacy);
        assert_eq!(policy.mode, WorkflowMode::Simple);
        assert!(policy.derives_total());

        let empty = MapConfig(HashMap::new());
        assert!(WorkflowPolicy::from_config(&empty).accepts_total());
    }

    #[test]
    fn test_mode_serializes_as_id() {
        let json = serde_json::to_string(&WorkflowMode::Detailed).unwrap();
        assert_eq!(json, "\"detailed\"");
    }
}
