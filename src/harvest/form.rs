//! Egg harvest form descriptor.
//!
//! Describes which fields the form layer should render for the active
//! workflow. Rendering itself belongs to the host.

use serde::{Deserialize, Serialize};

use crate::harvest::catalog::EggTypeCatalog;
use crate::harvest::error::{EGG_TYPES_FIELD, QUANTITY_FIELD};
use crate::harvest::validate::{ASSETS_FIELD, TIMESTAMP_FIELD};
use crate::harvest::workflow::{WorkflowMode, WorkflowPolicy};
use crate::model::{Asset, AssetId};
use crate::traits::Translator;

const NO_PRODUCERS_HELP: &str = "If you would like to associate this egg harvest log with a group/animal asset, edit their record and check the \"Produces eggs\" checkbox. Then you will be able to select them here.";
const NO_EGG_TYPES_HELP: &str = "If you would like to set quantity for this egg harvest log add some 'Egg types' taxonomy terms or switch to the 'Simple' egg harvest workflow.";
const NO_EGG_TYPES_LEGACY_HELP: &str = "If you would like to set quantity for this egg harvest log add some 'Egg types' taxonomy terms or disable 'Require quantities per egg type' settings option.";
const ASSETS_DESCRIPTION: &str = "Select the group/animal that these eggs came from. To add groups/animals to this list, edit their record and check the \"Produces eggs\" checkbox.";
const OPTIONAL_EGG_TYPES: &str = "Optionally provide quantities per egg type.";
const REQUIRED_EGG_TYPES: &str = "Provide quantities per egg type. The total is calculated automatically.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberField {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub min: u64,
    pub step: u64,
}

impl NumberField {
    fn count(name: impl Into<String>, title: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: None,
            required,
            min: 0,
            step: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampField {
    pub name: String,
    pub title: String,
    pub default: i64,
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetOption {
    pub id: AssetId,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetSection {
    Options {
        name: String,
        title: String,
        description: String,
        options: Vec<AssetOption>,
        selected: Vec<AssetId>,
    },
    Help { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EggTypeSection {
    Fields {
        name: String,
        title: String,
        description: String,
        fields: Vec<NumberField>,
    },
    Help { message: String },
    Hidden,
}

/// Fields of the egg harvest form for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestForm {
    pub timestamp: TimestampField,
    pub quantity: Option<NumberField>,
    pub assets: AssetSection,
    pub egg_types: EggTypeSection,
}

impl HarvestForm {
    /// Builds the form for the given policy and catalog.
    ///
    /// `producers` are the active egg-producing assets; `preselected` are the
    /// ids passed in the `assets` query parameter. Preselected ids that are
    /// not producers are dropped. A single producer is selected by default.
    pub fn build(
        policy: &WorkflowPolicy,
        catalog: &EggTypeCatalog,
        producers: &[Asset],
        preselected: &[AssetId],
        request_time: i64,
        translator: &dyn Translator,
    ) -> Self {
        let t = |text: &str| translator.translate(text);

        let quantity = policy
            .accepts_total()
            .then(|| NumberField::count(QUANTITY_FIELD, t("Quantity"), true));

        let assets = if producers.is_empty() {
            AssetSection::Help {
                message: t(NO_PRODUCERS_HELP),
            }
        } else {
            let options: Vec<AssetOption> = producers
                .iter()
                .map(|asset| AssetOption {
                    id: asset.id.clone(),
                    label: asset.name.clone(),
                })
                .collect();
            let selected = if options.len() == 1 {
                vec![options[0].id.clone()]
            } else {
                options
                    .iter()
                    .filter(|option| preselected.contains(&option.id))
                    .map(|option| option.id.clone())
                    .collect()
            };
            AssetSection::Options {
                name: ASSETS_FIELD.to_string(),
                title: t("Group/animal"),
                description: t(ASSETS_DESCRIPTION),
                options,
                selected,
            }
        };

        let egg_types = if catalog.is_empty() {
            if policy.derives_total() {
                // Point at whichever setting made per-type quantities mandatory.
                let message = if policy.mode == WorkflowMode::Detailed {
                    NO_EGG_TYPES_HELP
                } else {
                    NO_EGG_TYPES_LEGACY_HELP
                };
                EggTypeSection::Help { message: t(message) }
            } else {
                EggTypeSection::Hidden
            }
        } else {
            let description = if policy.derives_total() {
                REQUIRED_EGG_TYPES
            } else {
                OPTIONAL_EGG_TYPES
            };
            EggTypeSection::Fields {
                name: EGG_TYPES_FIELD.to_string(),
                title: t("Egg types"),
                description: t(description),
                fields: catalog
                    .list_active()
                    .iter()
                    .map(|egg_type| NumberField {
                        description: egg_type.description.clone(),
                        ..NumberField::count(egg_type.quantity_field(), egg_type.label.clone(), false)
                    })
                    .collect(),
            }
        };

        Self {
            timestamp: TimestampField {
                name: TIMESTAMP_FIELD.to_string(),
                title: t("Timestamp"),
                default: request_time,
                required: true,
            },
            quantity,
            assets,
            egg_types,
        }
    }
}
