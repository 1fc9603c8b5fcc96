use crate::selector::CascadingSelector;
use async_trait::async_trait;
use field_primitives::{EntityId, LocationLevel, OptionItem};
use field_repository::{FieldServiceApi, RepositoryError};
use std::sync::Arc;

/// Produces the options of one level given its parent's selection
#[async_trait]
pub trait OptionLoader: Send + Sync {
    /// `parent` is `None` for the root level
    async fn load(&self, parent: Option<&EntityId>) -> Result<Vec<OptionItem>, RepositoryError>;
}

/// Loads one level of the location hierarchy from the backend
pub struct LocationOptions {
    api: Arc<dyn FieldServiceApi>,
    level: LocationLevel,
}

impl LocationOptions {
    pub fn new(api: Arc<dyn FieldServiceApi>, level: LocationLevel) -> Self {
        Self { api, level }
    }
}

#[async_trait]
impl OptionLoader for LocationOptions {
    async fn load(&self, parent: Option<&EntityId>) -> Result<Vec<OptionItem>, RepositoryError> {
        self.api.list_locations(self.level, parent).await
    }
}

/// Client → plant → area → location chain backed by `api`
pub fn location_selector(api: Arc<dyn FieldServiceApi>) -> CascadingSelector<LocationLevel> {
    CascadingSelector::new(
        LocationLevel::ALL
            .into_iter()
            .map(|level| {
                let loader: Arc<dyn OptionLoader> =
                    Arc::new(LocationOptions::new(api.clone(), level));
                (level, loader)
            })
            .collect(),
    )
}
