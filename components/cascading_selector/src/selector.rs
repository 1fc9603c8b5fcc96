use crate::level::{LevelKey, SelectionLevel};
use crate::loader::OptionLoader;
use field_primitives::{EntityId, OptionItem};
use field_repository::LoadError;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("no level '{0}' in this selector")]
    UnknownLevel(String),
}

/// A load that has been issued but not yet performed
pub struct PendingLoad<K> {
    index: usize,
    key: K,
    parent: Option<EntityId>,
    generation: u64,
    loader: Arc<dyn OptionLoader>,
}

impl<K: LevelKey> PendingLoad<K> {
    pub fn key(&self) -> K {
        self.key
    }

    /// Parent selection the load was issued for
    pub fn parent(&self) -> Option<&EntityId> {
        self.parent.as_ref()
    }

    /// Perform the I/O; never fails, failures travel inside the outcome
    pub async fn run(self) -> LoadOutcome<K> {
        let result = self
            .loader
            .load(self.parent.as_ref())
            .await
            .map_err(|e| LoadError::new(format!("loading {} options", self.key), &e));

        LoadOutcome {
            index: self.index,
            key: self.key,
            parent: self.parent,
            generation: self.generation,
            result,
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for PendingLoad<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("key", &self.key)
            .field("parent", &self.parent)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Result of a [`PendingLoad`], still tagged with what it was issued for
#[derive(Debug)]
pub struct LoadOutcome<K> {
    index: usize,
    key: K,
    parent: Option<EntityId>,
    generation: u64,
    result: Result<Vec<OptionItem>, LoadError>,
}

impl<K: LevelKey> LoadOutcome<K> {
    pub fn key(&self) -> K {
        self.key
    }
}

/// What [`CascadingSelector::resolve`] did with an outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Loaded { count: usize },
    Failed(LoadError),
    /// The level moved on before the load finished; nothing changed
    StaleResultDiscarded,
}

pub struct CascadingSelector<K> {
    levels: Vec<SelectionLevel<K>>,
}

impl<K: LevelKey> CascadingSelector<K> {
    /// Build a chain from `(key, loader)` pairs, root first
    pub fn new(levels: Vec<(K, Arc<dyn OptionLoader>)>) -> Self {
        Self {
            levels: levels
                .into_iter()
                .map(|(key, loader)| SelectionLevel::new(key, loader))
                .collect(),
        }
    }

    pub fn levels(&self) -> &[SelectionLevel<K>] {
        &self.levels
    }

    pub fn level(&self, key: K) -> Option<&SelectionLevel<K>> {
        self.levels.iter().find(|level| level.key == key)
    }

    pub fn selected(&self, key: K) -> Option<&EntityId> {
        self.level(key).and_then(SelectionLevel::selected_id)
    }

    /// Selected ids, root first, stopping at the first unselected level
    pub fn selections(&self) -> impl Iterator<Item = (K, &EntityId)> + '_ {
        self.levels
            .iter()
            .map_while(|level| level.selected.as_ref().map(|id| (level.key, id)))
    }

    /// Most specific selection made so far
    pub fn deepest_selection(&self) -> Option<(K, &EntityId)> {
        self.selections().last()
    }

    pub fn is_loading(&self) -> bool {
        self.levels.iter().any(|level| level.loading)
    }

    fn index_of(&self, key: K) -> Result<usize, SelectorError> {
        self.levels
            .iter()
            .position(|level| level.key == key)
            .ok_or_else(|| SelectorError::UnknownLevel(key.to_string()))
    }

    fn issue(&mut self, index: usize, parent: Option<EntityId>) -> PendingLoad<K> {
        let level = &mut self.levels[index];
        let generation = level.begin_load();

        tracing::debug!(level = %level.key, parent = ?parent, generation, "issuing load");
        PendingLoad {
            index,
            key: level.key,
            parent,
            generation,
            loader: level.loader.clone(),
        }
    }

    /// Start loading the root level's options
    pub fn load_root(&mut self) -> Option<PendingLoad<K>> {
        if self.levels.is_empty() {
            return None;
        }
        Some(self.issue(0, None))
    }

    /// Select `id` at `key` (or clear it with `None`)
    ///
    /// Every level below `key` loses its selection and options. When `id` is
    /// set and a child level exists, the returned ticket loads that child.
    pub fn select(
        &mut self,
        key: K,
        id: Option<EntityId>,
    ) -> Result<Option<PendingLoad<K>>, SelectorError> {
        let index = self.index_of(key)?;
        let id = id.filter(|id| !id.as_str().is_empty());

        tracing::info!(level = %key, selected = ?id, "selection changed");
        self.levels[index].selected = id.clone();
        for level in &mut self.levels[index + 1..] {
            level.invalidate();
        }

        let child = index + 1;
        match id {
            Some(parent) if child < self.levels.len() => Ok(Some(self.issue(child, Some(parent)))),
            _ => Ok(None),
        }
    }

    /// Apply a finished load unless it has been superseded
    pub fn resolve(&mut self, outcome: LoadOutcome<K>) -> Resolution {
        let current_parent = match outcome.index {
            0 => None,
            index => self.levels[index - 1].selected.clone(),
        };

        let level = &mut self.levels[outcome.index];
        if level.generation != outcome.generation || current_parent != outcome.parent {
            tracing::debug!(
                level = %outcome.key,
                parent = ?outcome.parent,
                "discarding stale options"
            );
            return Resolution::StaleResultDiscarded;
        }

        level.loading = false;
        match outcome.result {
            Ok(options) => {
                let count = options.len();
                level.options = options;
                level.error = None;
                tracing::info!(level = %outcome.key, count, "options loaded");
                Resolution::Loaded { count }
            }
            Err(error) => {
                tracing::warn!(level = %outcome.key, %error, "options failed to load");
                level.options.clear();
                level.error = Some(error.clone());
                Resolution::Failed(error)
            }
        }
    }

    /// [`Self::load_root`], run and resolve in one go
    pub async fn load_root_and_wait(&mut self) -> Option<Resolution> {
        let pending = self.load_root()?;
        let outcome = pending.run().await;
        Some(self.resolve(outcome))
    }

    /// [`Self::select`], then run and resolve the child load if one was issued
    pub async fn select_and_load(
        &mut self,
        key: K,
        id: Option<EntityId>,
    ) -> Result<Option<Resolution>, SelectorError> {
        match self.select(key, id)? {
            Some(pending) => {
                let outcome = pending.run().await;
                Ok(Some(self.resolve(outcome)))
            }
            None => Ok(None),
        }
    }

    /// Clear every level, dropping any pending loads
    pub fn reset(&mut self) {
        for level in &mut self.levels {
            level.invalidate();
        }
    }
}
