use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit-of-measure kind used for every egg quantity.
pub const COUNT_MEASURE: &str = "count";

/// Log type tag of egg harvest logs.
pub const HARVEST_LOG_TYPE: &str = "harvest";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a term in the egg type vocabulary.
    EggTypeId
);
string_id!(
    /// Identifier of a group/animal asset.
    AssetId
);
string_id!(
    /// Identifier of a location asset.
    LocationId
);
string_id!(
    /// Identifier of a log category term.
    CategoryId
);
string_id!(
    /// Identifier assigned by the log store to a created log.
    LogId
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggType {
    pub id: EggTypeId,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl EggType {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: EggTypeId::new(id),
            label: label.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Form field name carrying this type's subtotal, e.g. `"3_quantity"`.
    pub fn quantity_field(&self) -> String {
        quantity_field_name(&self.id)
    }
}

pub fn quantity_field_name(id: &EggTypeId) -> String {
    format!("{}_quantity", id)
}

/// Group or animal asset that may be recorded as an egg source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub produces_eggs: bool,
}

fn default_true() -> bool {
    true
}

impl Asset {
    pub fn produces_eggs(&self) -> bool {
        self.produces_eggs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: LocationId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub vocabulary: String,
}

/// One measured quantity attached to a harvest log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityLineItem {
    pub measure: String,
    pub value: u64,
    pub units: String,
    pub label: Option<String>,
}

impl QuantityLineItem {
    pub fn count(value: u64, units: impl Into<String>, label: Option<String>) -> Self {
        Self {
            measure: COUNT_MEASURE.to_string(),
            value,
            units: units.into(),
            label,
        }
    }
}

/// Typed values of one harvest submission, produced by the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSubmission {
    /// Unix timestamp (seconds) of the harvest; request time when absent
    pub timestamp: Option<i64>,
    pub asset_ids: Vec<AssetId>,
    /// Subtotals keyed by egg type, in submission order
    pub per_type_quantities: Vec<(EggTypeId, u64)>,
    /// Only ever set under the simple workflow
    pub total_quantity: Option<u64>,
    pub notes: Option<String>,
}

impl HarvestSubmission {
    pub fn quantity_for(&self, id: &EggTypeId) -> Option<u64> {
        self.per_type_quantities
            .iter()
            .find(|(type_id, _)| type_id == id)
            .map(|(_, value)| *value)
    }
}

/// Canonical log-creation payload handed to the log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestLogPayload {
    #[serde(rename = "type")]
    pub log_type: String,
    pub timestamp: i64,
    pub name: String,
    #[serde(rename = "asset")]
    pub assets: Vec<AssetId>,
    #[serde(rename = "quantity")]
    pub quantities: Vec<QuantityLineItem>,
    pub category: CategoryRef,
    #[serde(rename = "location")]
    pub locations: Vec<LocationRef>,
    pub notes: Option<String>,
}

impl HarvestLogPayload {
    /// Sum of the per-type line items.
    ///
    /// A summary item can only sit at position 0 and only precedes other
    /// items, so nothing past the first item is ever skipped.
    pub fn counted_total(&self, total_label: &str) -> u64 {
        let skip = match self.quantities.as_slice() {
            [first, _, ..] if first.label.as_deref() == Some(total_label) => 1,
            _ => 0,
        };
        self.quantities[skip..]
            .iter()
            .fold(0u64, |sum, q| sum.saturating_add(q.value))
    }
}
