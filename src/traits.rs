use crate::model::{
    Asset, AssetId, CategoryRef, EggType, HarvestLogPayload, LocationRef, LogId,
};
use async_trait::async_trait;
use thiserror::Error;

/// Vocabulary holding the log category terms.
pub const LOG_CATEGORY_VOCABULARY: &str = "log_category";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Loads egg type terms in storage order, only published ones when `active_only`.
    async fn list_egg_types(&self, active_only: bool) -> Result<Vec<EggType>, StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Loads the term named `name` in `vocabulary`, creating it when absent.
    async fn get_or_create(&self, name: &str, vocabulary: &str)
        -> Result<CategoryRef, StoreError>;
}

#[async_trait]
pub trait AssetLocationResolver: Send + Sync {
    /// Current location(s) of an asset, possibly empty.
    async fn locations_of(&self, asset: &AssetId) -> Result<Vec<LocationRef>, StoreError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Loads the given assets, skipping ids that do not exist.
    async fn load(&self, ids: &[AssetId]) -> Result<Vec<Asset>, StoreError>;

    /// Active assets with the "produces eggs" flag set.
    async fn egg_producers(&self) -> Result<Vec<Asset>, StoreError>;
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persists a harvest log and returns its id.
    async fn create(&self, payload: HarvestLogPayload) -> Result<LogId, StoreError>;
}

/// Read-only access to the module settings.
pub trait ConfigStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;

    /// Missing keys read as `false`.
    fn get_bool(&self, key: &str) -> bool;
}

/// User-facing string translation.
///
/// `@count` in plural strings is replaced by the count.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str) -> String;

    fn plural(&self, count: u64, singular: &str, plural: &str) -> String;
}

/// Source-language translator: returns strings untranslated.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceLanguage;

impl Translator for SourceLanguage {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }

    fn plural(&self, count: u64, singular: &str, plural: &str) -> String {
        let template = if count == 1 { singular } else { plural };
        template.replace("@count", &count.to_string())
    }
}
