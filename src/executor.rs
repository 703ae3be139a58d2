//! Egg harvest submission executor.
//!
//! [`HarvestExecutor`] runs one submission through the linear flow
//! `Received → Validated → Built → Assembled → Dispatched`. Collaborator
//! calls are awaited one after another; a failure at any step ends the
//! submission without creating a log.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::harvest::{
    parse_asset_list, record_egg_harvest, EggTypeCatalog, HarvestError, HarvestForm,
    HarvestFormValidator, HarvestFormValues, HarvestLogAssembler, QuantityBuilder,
    RecordHarvestOutcome, WorkflowPolicy, TOTAL_LABEL,
};
use crate::model::{AssetId, HarvestLogPayload, LocationRef, LogId};
use crate::traits::{
    AssetLocationResolver, AssetStore, CatalogStore, CategoryStore, ConfigStore, LogStore,
    SourceLanguage, Translator, LOG_CATEGORY_VOCABULARY,
};

/// External collaborators a [`HarvestExecutor`] talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub config: Arc<dyn ConfigStore>,
    pub catalog: Arc<dyn CatalogStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub locations: Arc<dyn AssetLocationResolver>,
    pub assets: Arc<dyn AssetStore>,
    pub logs: Arc<dyn LogStore>,
}

impl Collaborators {
    /// Uses one backend for every store and `config` for settings.
    pub fn from_backend<B>(backend: Arc<B>, config: Arc<dyn ConfigStore>) -> Self
    where
        B: CatalogStore + CategoryStore + AssetLocationResolver + AssetStore + LogStore + 'static,
    {
        Self {
            config,
            catalog: backend.clone(),
            categories: backend.clone(),
            locations: backend.clone(),
            assets: backend.clone(),
            logs: backend,
        }
    }
}

/// A harvest log that was handed to the log store.
#[derive(Debug, Clone)]
pub struct RecordedHarvest {
    pub log_id: LogId,
    pub total: u64,
    pub payload: HarvestLogPayload,
}

pub struct HarvestExecutor {
    collaborators: Collaborators,
    translator: Arc<dyn Translator>,
    request_time: Option<i64>,
}

impl HarvestExecutor {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            collaborators,
            translator: Arc::new(SourceLanguage),
            request_time: None,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Pins the request time instead of reading the system clock.
    pub fn with_request_time(mut self, timestamp: i64) -> Self {
        self.request_time = Some(timestamp);
        self
    }

    fn request_time(&self) -> i64 {
        self.request_time.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as i64
        })
    }

    pub fn policy(&self) -> WorkflowPolicy {
        WorkflowPolicy::from_config(self.collaborators.config.as_ref())
    }

    /// Describes the harvest form; `assets_param` is the `assets` query value.
    #[instrument(skip(self))]
    pub async fn form(&self, assets_param: Option<&str>) -> Result<HarvestForm, HarvestError> {
        let policy = self.policy();
        let catalog = EggTypeCatalog::load(self.collaborators.catalog.as_ref()).await?;
        let producers = self
            .collaborators
            .assets
            .egg_producers()
            .await
            .map_err(HarvestError::persistence)?;
        let preselected = assets_param.map(parse_asset_list).unwrap_or_default();

        Ok(HarvestForm::build(
            &policy,
            &catalog,
            &producers,
            &preselected,
            self.request_time(),
            self.translator.as_ref(),
        ))
    }

    /// Runs the "record egg harvest" bulk action over the selected asset ids.
    #[instrument(skip(self, selected), fields(selected = selected.len()))]
    pub async fn record_action(
        &self,
        selected: &[AssetId],
    ) -> Result<RecordHarvestOutcome, HarvestError> {
        let assets = self
            .collaborators
            .assets
            .load(selected)
            .await
            .map_err(HarvestError::persistence)?;
        Ok(record_egg_harvest(&assets, self.translator.as_ref()))
    }

    /// Validates, builds, assembles and dispatches one harvest submission.
    #[instrument(skip(self, values))]
    pub async fn record(&self, values: &HarvestFormValues) -> Result<RecordedHarvest, HarvestError> {
        let policy = self.policy();
        info!(workflow = %policy.mode, "Received egg harvest submission");

        let catalog = EggTypeCatalog::load(self.collaborators.catalog.as_ref()).await?;

        let submission = HarvestFormValidator::new(policy, &catalog)
            .with_total_label(self.translator.translate(TOTAL_LABEL))
            .validate(values)
            .map_err(|errors| {
                warn!(errors = %errors, "Egg harvest submission failed validation");
                HarvestError::Validation(errors)
            })?;
        debug!(assets = submission.asset_ids.len(), "Submission validated");

        let built = QuantityBuilder::new(self.translator.as_ref()).build(&submission, &policy, &catalog);

        let assembler = HarvestLogAssembler::new(self.translator.as_ref());
        let category = self
            .collaborators
            .categories
            .get_or_create(&assembler.category_name(), LOG_CATEGORY_VOCABULARY)
            .await
            .map_err(HarvestError::persistence)?;

        let mut locations: Vec<LocationRef> = Vec::new();
        for asset in &submission.asset_ids {
            let found = self
                .collaborators
                .locations
                .locations_of(asset)
                .await
                .map_err(HarvestError::persistence)?;
            locations.extend(found);
        }

        let payload = assembler.assemble(
            &submission,
            built.items,
            built.total,
            category,
            locations,
            self.request_time(),
        );
        debug!(name = %payload.name, quantities = payload.quantities.len(), "Harvest log assembled");

        let log_id = self
            .collaborators
            .logs
            .create(payload.clone())
            .await
            .map_err(HarvestError::persistence)?;

        info!(log_id = %log_id, total = built.total, "Egg harvest log created");
        Ok(RecordedHarvest {
            log_id,
            total: built.total,
            payload,
        })
    }
}
