use crate::loader::OptionLoader;
use field_primitives::{EntityId, OptionItem};
use field_repository::LoadError;
use std::fmt;
use std::sync::Arc;

/// Identifier of a level within a chain
pub trait LevelKey: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> LevelKey for T where T: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// One rung of a selection chain
///
/// Fields are private: state only changes through [`crate::CascadingSelector`]
/// so the cascade rule cannot be bypassed.
pub struct SelectionLevel<K> {
    pub(crate) key: K,
    pub(crate) selected: Option<EntityId>,
    pub(crate) options: Vec<OptionItem>,
    pub(crate) loading: bool,
    pub(crate) error: Option<LoadError>,
    /// Bumped whenever the level is invalidated or a new load is issued
    pub(crate) generation: u64,
    pub(crate) loader: Arc<dyn OptionLoader>,
}

impl<K: LevelKey> SelectionLevel<K> {
    pub(crate) fn new(key: K, loader: Arc<dyn OptionLoader>) -> Self {
        Self {
            key,
            selected: None,
            options: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            loader,
        }
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn selected_id(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn options(&self) -> &[OptionItem] {
        &self.options
    }

    /// Label of the selected option, if it is among the loaded options
    pub fn selected_label(&self) -> Option<&str> {
        let selected = self.selected.as_ref()?;
        self.options
            .iter()
            .find(|option| &option.id == selected)
            .map(|option| option.label.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Drop selection, options and any pending load
    pub(crate) fn invalidate(&mut self) {
        self.selected = None;
        self.options.clear();
        self.loading = false;
        self.error = None;
        self.generation += 1;
    }

    /// Mark a new load as in flight and return its generation tag
    pub(crate) fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.generation
    }
}

impl<K: fmt::Debug> fmt::Debug for SelectionLevel<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionLevel")
            .field("key", &self.key)
            .field("selected", &self.selected)
            .field("options", &self.options.len())
            .field("loading", &self.loading)
            .field("error", &self.error)
            .field("generation", &self.generation)
            .finish()
    }
}
