//! Submission validation.
//!
//! [`HarvestFormValidator`] checks the raw submitted strings against the
//! active [`WorkflowPolicy`] and turns them into a typed
//! [`HarvestSubmission`]. Nothing here touches storage: the egg type
//! catalog has already been loaded by the caller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::harvest::catalog::EggTypeCatalog;
use crate::harvest::error::{
    ValidationError, ValidationErrors, AT_LEAST_ONE_QUANTITY, EGG_TYPES_FIELD,
    LABEL_CONFLICTS_WITH_TOTAL, NOT_A_NON_NEGATIVE_INTEGER, QUANTITY_FIELD, QUANTITY_REQUIRED,
    TOTAL_TOO_LARGE,
};
use crate::harvest::quantity::TOTAL_LABEL;
use crate::harvest::workflow::WorkflowPolicy;
use crate::model::{AssetId, EggTypeId, HarvestSubmission};

pub const TIMESTAMP_FIELD: &str = "timestamp";
pub const ASSETS_FIELD: &str = "assets";
pub const NOTES_FIELD: &str = "notes";

const QUANTITY_SUFFIX: &str = "_quantity";
const NOT_A_TIMESTAMP: &str = "must be a Unix timestamp";

/// Raw values of a submitted harvest form, as the form layer received them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestFormValues {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetId>,
    #[serde(default)]
    pub quantity: Option<String>,
    /// Subtotal inputs keyed by egg type id
    #[serde(default)]
    pub egg_types: BTreeMap<EggTypeId, String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl HarvestFormValues {
    /// Collects values from flat `name → value` form fields.
    ///
    /// `<id>_quantity` fields become egg type subtotals and `assets` is a
    /// comma-separated id list. Unrecognized fields are dropped.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = Self::default();
        for (key, value) in fields {
            let key = key.as_ref();
            let value: String = value.into();
            match key {
                TIMESTAMP_FIELD => values.timestamp = Some(value),
                QUANTITY_FIELD => values.quantity = Some(value),
                NOTES_FIELD => values.notes = Some(value),
                ASSETS_FIELD => values.assets = parse_asset_list(&value),
                _ => match key.strip_suffix(QUANTITY_SUFFIX) {
                    Some(id) if !id.is_empty() => {
                        values.egg_types.insert(EggTypeId::from(id), value);
                    }
                    _ => debug!(field = key, "Ignoring unrecognized form field"),
                },
            }
        }
        values
    }
}

/// Parses a comma-separated asset id list such as `"3,7"`.
pub fn parse_asset_list(raw: &str) -> Vec<AssetId> {
    unique_assets(
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(AssetId::from),
    )
}

/// Drops repeated ids, keeping first-seen order.
fn unique_assets(ids: impl IntoIterator<Item = AssetId>) -> Vec<AssetId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Blank input means "not entered".
fn parse_count(raw: Option<&str>) -> Result<Option<u64>, ()> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse::<u64>().map(Some).map_err(|_| ()),
    }
}

pub struct HarvestFormValidator<'a> {
    policy: WorkflowPolicy,
    catalog: &'a EggTypeCatalog,
    total_label: String,
}

impl<'a> HarvestFormValidator<'a> {
    pub fn new(policy: WorkflowPolicy, catalog: &'a EggTypeCatalog) -> Self {
        Self {
            policy,
            catalog,
            total_label: TOTAL_LABEL.to_string(),
        }
    }

    /// Label of the summary line item, as the quantity builder renders it.
    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    pub fn validate(&self, values: &HarvestFormValues) -> Result<HarvestSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let timestamp = match values.timestamp.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => match text.parse::<i64>() {
                Ok(ts) => Some(ts),
                Err(_) => {
                    errors.push(ValidationError::new(TIMESTAMP_FIELD, NOT_A_TIMESTAMP));
                    None
                }
            },
        };

        let total_quantity = if self.policy.accepts_total() {
            match parse_count(values.quantity.as_deref()) {
                Ok(Some(total)) => Some(total),
                Ok(None) => {
                    errors.push(ValidationError::new(QUANTITY_FIELD, QUANTITY_REQUIRED));
                    None
                }
                Err(()) => {
                    errors.push(ValidationError::new(QUANTITY_FIELD, NOT_A_NON_NEGATIVE_INTEGER));
                    None
                }
            }
        } else {
            if values.quantity.is_some() {
                debug!(workflow = %self.policy.mode, "Ignoring submitted total quantity");
            }
            None
        };

        for id in values.egg_types.keys().filter(|id| !self.catalog.contains(id)) {
            warn!(egg_type = %id, "Ignoring quantity for unknown egg type");
        }

        let mut per_type_quantities = Vec::new();
        let mut has_subtotal = false;
        let mut subtotal: Option<u64> = Some(0);
        for egg_type in self.catalog.list_active() {
            let raw = values.egg_types.get(&egg_type.id).map(String::as_str);
            match parse_count(raw) {
                Ok(Some(value)) => {
                    if value > 0 {
                        has_subtotal = true;
                        if egg_type.label == self.total_label {
                            errors.push(ValidationError::new(
                                egg_type.quantity_field(),
                                LABEL_CONFLICTS_WITH_TOTAL,
                            ));
                        }
                        subtotal = subtotal.and_then(|sum| sum.checked_add(value));
                        if subtotal.is_none()
                            && errors.for_field(EGG_TYPES_FIELD).is_none()
                        {
                            errors.push(ValidationError::new(EGG_TYPES_FIELD, TOTAL_TOO_LARGE));
                        }
                    }
                    per_type_quantities.push((egg_type.id.clone(), value));
                }
                Ok(None) => {}
                Err(()) => {
                    has_subtotal = true;
                    errors.push(ValidationError::new(
                        egg_type.quantity_field(),
                        NOT_A_NON_NEGATIVE_INTEGER,
                    ));
                }
            }
        }

        if self.policy.derives_total() && !has_subtotal {
            errors.push(ValidationError::new(EGG_TYPES_FIELD, AT_LEAST_ONE_QUANTITY));
        }

        if !errors.is_empty() {
            debug!(errors = errors.len(), "Harvest submission rejected");
            return Err(errors);
        }

        Ok(HarvestSubmission {
            timestamp,
            asset_ids: unique_assets(values.assets.iter().cloned()),
            per_type_quantities,
            total_quantity,
            notes: values
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
        })
    }
}
