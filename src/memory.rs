//! In-memory farm backend.
//!
//! Implements every store trait over plain collections. Used by the CLI and
//! by tests; failure switches simulate backend outages.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::model::{
    Asset, AssetId, CategoryId, CategoryRef, EggType, HarvestLogPayload, LocationId, LocationRef,
    LogId,
};
use crate::traits::{
    AssetLocationResolver, AssetStore, CatalogStore, CategoryStore, LogStore, StoreError,
};

#[derive(Debug, Default)]
struct FarmState {
    next_id: u64,
    egg_types: Vec<EggType>,
    unpublished: Vec<EggType>,
    assets: Vec<Asset>,
    locations: HashMap<AssetId, Vec<LocationRef>>,
    categories: Vec<CategoryRef>,
    logs: Vec<(LogId, HarvestLogPayload)>,
    fail_catalog: bool,
    fail_logs: bool,
}

impl FarmState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryFarm {
    state: Mutex<FarmState>,
}

impl InMemoryFarm {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FarmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_egg_type(&self, egg_type: EggType) {
        self.state().egg_types.push(egg_type);
    }

    /// Adds an egg type that is not published.
    pub fn add_unpublished_egg_type(&self, egg_type: EggType) {
        self.state().unpublished.push(egg_type);
    }

    pub fn add_asset(&self, asset: Asset) {
        self.state().assets.push(asset);
    }

    /// Places an asset in the named locations, replacing earlier ones.
    ///
    /// Locations are identified by name: assets placed in the same named
    /// location share its id.
    pub fn set_locations(&self, asset: &AssetId, names: Vec<String>) {
        let mut state = self.state();
        let mut locations = Vec::with_capacity(names.len());
        for name in names {
            let known = state
                .locations
                .values()
                .flatten()
                .find(|l| l.name == name)
                .cloned();
            let location = match known {
                Some(location) => location,
                None => LocationRef {
                    id: LocationId::new(state.next_id()),
                    name,
                },
            };
            locations.push(location);
        }
        state.locations.insert(asset.clone(), locations);
    }

    pub fn fail_catalog(&self, fail: bool) {
        self.state().fail_catalog = fail;
    }

    pub fn fail_log_creation(&self, fail: bool) {
        self.state().fail_logs = fail;
    }

    pub fn logs(&self) -> Vec<(LogId, HarvestLogPayload)> {
        self.state().logs.clone()
    }

    pub fn categories(&self) -> Vec<CategoryRef> {
        self.state().categories.clone()
    }
}

#[async_trait]
impl CatalogStore for InMemoryFarm {
    async fn list_egg_types(&self, active_only: bool) -> Result<Vec<EggType>, StoreError> {
        let state = self.state();
        if state.fail_catalog {
            return Err(StoreError::Backend("egg type storage unavailable".into()));
        }
        let mut types = state.egg_types.clone();
        if !active_only {
            types.extend(state.unpublished.iter().cloned());
        }
        Ok(types)
    }
}

#[async_trait]
impl CategoryStore for InMemoryFarm {
    async fn get_or_create(
        &self,
        name: &str,
        vocabulary: &str,
    ) -> Result<CategoryRef, StoreError> {
        let mut state = self.state();
        if let Some(existing) = state
            .categories
            .iter()
            .find(|c| c.name == name && c.vocabulary == vocabulary)
        {
            return Ok(existing.clone());
        }

        let category = CategoryRef {
            id: CategoryId::new(state.next_id()),
            name: name.to_string(),
            vocabulary: vocabulary.to_string(),
        };
        debug!(name, vocabulary, id = %category.id, "Created category term");
        state.categories.push(category.clone());
        Ok(category)
    }
}

#[async_trait]
impl AssetLocationResolver for InMemoryFarm {
    async fn locations_of(&self, asset: &AssetId) -> Result<Vec<LocationRef>, StoreError> {
        Ok(self.state().locations.get(asset).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl AssetStore for InMemoryFarm {
    async fn load(&self, ids: &[AssetId]) -> Result<Vec<Asset>, StoreError> {
        let state = self.state();
        Ok(ids
            .iter()
            .filter_map(|id| state.assets.iter().find(|a| &a.id == id).cloned())
            .collect())
    }

    async fn egg_producers(&self) -> Result<Vec<Asset>, StoreError> {
        Ok(self
            .state()
            .assets
            .iter()
            .filter(|a| a.active && a.produces_eggs())
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LogStore for InMemoryFarm {
    async fn create(&self, payload: HarvestLogPayload) -> Result<LogId, StoreError> {
        let mut state = self.state();
        if state.fail_logs {
            return Err(StoreError::Backend("log storage unavailable".into()));
        }
        let id = LogId::new(state.next_id());
        state.logs.push((id.clone(), payload));
        Ok(id)
    }
}

/// JSON fixture describing a farm, as loaded by the CLI.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FarmFixture {
    #[serde(default)]
    pub egg_types: Vec<EggType>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Location names per asset id
    #[serde(default)]
    pub locations: HashMap<AssetId, Vec<String>>,
}

impl From<FarmFixture> for InMemoryFarm {
    fn from(fixture: FarmFixture) -> Self {
        let farm = InMemoryFarm::new();
        for egg_type in fixture.egg_types {
            farm.add_egg_type(egg_type);
        }
        for asset in fixture.assets {
            farm.add_asset(asset);
        }
        for (asset, names) in fixture.locations {
            farm.set_locations(&asset, names);
        }
        farm
    }
}
