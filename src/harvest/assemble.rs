use crate::model::{
    CategoryRef, HarvestLogPayload, HarvestSubmission, LocationRef, QuantityLineItem,
    HARVEST_LOG_TYPE,
};
use crate::traits::Translator;

/// Name of the log category term attached to every egg harvest log.
pub const EGGS_CATEGORY: &str = "Eggs";

const LOG_NAME_SINGULAR: &str = "Collected @count egg(s)";
const LOG_NAME_PLURAL: &str = "Collected @count egg(s)";

/// Builds harvest log payloads. Pure: persisting is the log store's job.
pub struct HarvestLogAssembler<'a> {
    translator: &'a dyn Translator,
}

impl<'a> HarvestLogAssembler<'a> {
    pub fn new(translator: &'a dyn Translator) -> Self {
        Self { translator }
    }

    pub fn log_name(&self, total_quantity: u64) -> String {
        self.translator
            .plural(total_quantity, LOG_NAME_SINGULAR, LOG_NAME_PLURAL)
    }

    /// Translated name of the eggs log category.
    pub fn category_name(&self) -> String {
        self.translator.translate(EGGS_CATEGORY)
    }

    pub fn assemble(
        &self,
        submission: &HarvestSubmission,
        quantities: Vec<QuantityLineItem>,
        total_quantity: u64,
        category: CategoryRef,
        locations: Vec<LocationRef>,
        request_time: i64,
    ) -> HarvestLogPayload {
        HarvestLogPayload {
            log_type: HARVEST_LOG_TYPE.to_string(),
            timestamp: submission.timestamp.unwrap_or(request_time),
            name: self.log_name(total_quantity),
            assets: submission.asset_ids.clone(),
            quantities,
            category,
            locations,
            notes: submission.notes.clone(),
        }
    }
}
