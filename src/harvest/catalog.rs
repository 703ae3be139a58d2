use tracing::debug;

use crate::harvest::error::HarvestError;
use crate::model::{EggType, EggTypeId};
use crate::traits::CatalogStore;

/// Snapshot of the published egg types, in storage order.
///
/// An empty catalog is a valid state; a failed lookup is reported as
/// [`HarvestError::CatalogUnavailable`] instead of an empty snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EggTypeCatalog {
    types: Vec<EggType>,
}

impl EggTypeCatalog {
    pub fn new(types: Vec<EggType>) -> Self {
        Self { types }
    }

    pub async fn load(store: &dyn CatalogStore) -> Result<Self, HarvestError> {
        let types = store
            .list_egg_types(true)
            .await
            .map_err(HarvestError::catalog)?;
        debug!(egg_types = types.len(), "Loaded egg type catalog");
        Ok(Self::new(types))
    }

    pub fn list_active(&self) -> &[EggType] {
        &self.types
    }

    pub fn get(&self, id: &EggTypeId) -> Option<&EggType> {
        self.types.iter().find(|t| &t.id == id)
    }

    pub fn contains(&self, id: &EggTypeId) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StoreError;
    use async_trait::async_trait;

    struct FixedCatalog(Vec<EggType>);

    #[async_trait]
    impl CatalogStore for FixedCatalog {
        async fn list_egg_types(&self, _active_only: bool) -> Result<Vec<EggType>, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenCatalog;

    #[async_trait]
    impl CatalogStore for BrokenCatalog {
        async fn list_egg_types(&self, _active_only: bool) -> Result<Vec<EggType>, StoreError> {
            Err(StoreError::Backend("term storage offline".into()))
        }
    }

    #[tokio::test]
    async fn test_load_keeps_storage_order() {
        let store = FixedCatalog(vec![EggType::new("2", "White"), EggType::new("1", "Brown")]);
        let catalog = EggTypeCatalog::load(&store).await.unwrap();

        let labels: Vec<_> = catalog.list_active().iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["White", "Brown"]);
        assert!(catalog.contains(&EggTypeId::from("1")));
        assert!(!catalog.contains(&EggTypeId::from("3")));
    }

    #[tokio::test]
    async fn test_empty_catalog_is_not_an_error() {
        let catalog = EggTypeCatalog::load(&FixedCatalog(vec![])).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_failed_lookup_is_catalog_unavailable() {
        let err = EggTypeCatalog::load(&BrokenCatalog).await.unwrap_err();
        assert!(matches!(err, HarvestError::CatalogUnavailable(_)));
    }
}
