use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::model::{Asset, AssetId};
use crate::traits::Translator;

const NONE_SELECTED: &str = "No egg-producing assets were selected.";
const SKIPPED_ONE: &str = "One asset was skipped because it does not produce eggs.";
const SKIPPED_MANY: &str = "@count assets were skipped because they do not produce eggs.";

/// Outcome of the "record egg harvest" bulk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecordHarvestOutcome {
    /// Open the harvest form with these assets preselected
    Redirect {
        assets: Vec<AssetId>,
        /// Value of the `assets` query parameter
        assets_param: String,
        warning: Option<String>,
    },
    /// Nothing to record
    Rejected { error: String },
}

/// Keeps the egg producers among the selected assets.
pub fn record_egg_harvest(selected: &[Asset], translator: &dyn Translator) -> RecordHarvestOutcome {
    let assets: Vec<AssetId> = selected
        .iter()
        .filter(|asset| asset.produces_eggs())
        .map(|asset| asset.id.clone())
        .collect();

    if assets.is_empty() {
        warn!(selected = selected.len(), "No egg-producing assets selected");
        return RecordHarvestOutcome::Rejected {
            error: translator.translate(NONE_SELECTED),
        };
    }

    let skipped = (selected.len() - assets.len()) as u64;
    let warning = (skipped > 0).then(|| translator.plural(skipped, SKIPPED_ONE, SKIPPED_MANY));

    let assets_param = assets
        .iter()
        .map(AssetId::as_str)
        .collect::<Vec<_>>()
        .join(",");
    info!(assets = %assets_param, skipped, "Redirecting to egg harvest form");

    RecordHarvestOutcome::Redirect {
        assets,
        assets_param,
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SourceLanguage;

    fn asset(id: &str, produces_eggs: bool) -> Asset {
        Asset {
            id: AssetId::from(id),
            name: format!("Asset {}", id),
            active: true,
            produces_eggs,
        }
    }

    #[test]
    fn test_all_producers() {
        let outcome = record_egg_harvest(&[asset("1", true), asset("2", true)], &SourceLanguage);
        assert_eq!(
            outcome,
            RecordHarvestOutcome::Redirect {
                assets: vec![AssetId::from("1"), AssetId::from("2")],
                assets_param: "1,2".to_string(),
                warning: None,
            }
        );
    }

    #[test]
    fn test_skipped_assets_warn() {
        let outcome = record_egg_harvest(&[asset("1", false), asset("2", true)], &SourceLanguage);
        match outcome {
            RecordHarvestOutcome::Redirect { assets_param, warning, .. } => {
                assert_eq!(assets_param, "2");
                assert_eq!(warning.as_deref(), Some(SKIPPED_ONE));
            }
            other => panic!("expected redirect, got {other:?}"),
        }

        let outcome = record_egg_harvest(
            &[asset("1", false), asset("2", true), asset("3", false)],
            &SourceLanguage,
        );
        match outcome {
            RecordHarvestOutcome::Redirect { warning, .. } => assert_eq!(
                warning.as_deref(),
                Some("2 assets were skipped because they do not produce eggs.")
            ),
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[test]
    fn test_no_producers_rejected() {
        let outcome = record_egg_harvest(&[asset("1", false)], &SourceLanguage);
        assert_eq!(
            outcome,
            RecordHarvestOutcome::Rejected {
                error: NONE_SELECTED.to_string()
            }
        );
        assert!(matches!(
            record_egg_harvest(&[], &SourceLanguage),
            RecordHarvestOutcome::Rejected { .. }
        ));
    }
}
