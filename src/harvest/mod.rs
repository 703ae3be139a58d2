//! Harvest module - egg harvest quantity and workflow engine.
//!
//! Components, leaf first:
//! - **Workflow**: [`WorkflowMode`] and the resolved [`WorkflowPolicy`]
//! - **Catalog**: published egg types via [`EggTypeCatalog`]
//! - **Quantities**: line items and total via [`QuantityBuilder`]
//! - **Validation**: required-field rules via [`HarvestFormValidator`]
//! - **Assembly**: log name and payload via [`HarvestLogAssembler`]
//! - **Form/action**: [`HarvestForm`] descriptor and the bulk [`record_egg_harvest`] action

pub mod action;
pub mod assemble;
pub mod catalog;
pub mod error;
pub mod form;
pub mod quantity;
pub mod validate;
pub mod workflow;

// Re-export commonly used types
pub use action::{record_egg_harvest, RecordHarvestOutcome};
pub use assemble::{HarvestLogAssembler, EGGS_CATEGORY};
pub use catalog::EggTypeCatalog;
pub use error::{HarvestError, ValidationError, ValidationErrors};
pub use form::{AssetSection, EggTypeSection, HarvestForm};
pub use quantity::{BuiltQuantities, QuantityBuilder, EGG_UNITS, TOTAL_LABEL};
pub use validate::{parse_asset_list, HarvestFormValidator, HarvestFormValues};
pub use workflow::{WorkflowMode, WorkflowPolicy};
