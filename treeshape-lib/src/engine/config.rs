//! Engine configuration

use serde::Deserialize;
use serde::Serialize;

use crate::model::DEFAULT_PATH_SEPARATOR;
use crate::model::LoadMode;
use crate::model::LoadOperation;

/// Default cap on nodes fetched in one page.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 10_000;

/// Settings captured by a [`TreeEngine`](super::TreeEngine) at construction.
///
/// # Example
///
/// ```
/// use treeshape_lib::engine::EngineConfig;
/// use treeshape_lib::model::{LoadMode, LoadOperation};
///
/// let config = EngineConfig::default()
///     .with_load_mode(LoadMode::Async)
///     .with_operation(LoadOperation::Query)
///     .first_load(true)
///     .with_preselected_keys(["42"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// How much of the tree is fetched up front.
    ///
    /// Default: `Sync`
    pub load_mode: LoadMode,

    /// What this engine's runs ask for.
    ///
    /// Default: `Query`
    pub load_operation: LoadOperation,

    /// Page size forced on whole-tree, subtree and children fetches, and the
    /// cap on caller paging for root-level fetches.
    ///
    /// Default: 10 000
    pub max_page_size: usize,

    /// This is the first paint, so preselected keys are opened.
    pub is_first_load: bool,

    /// Open every node that has something to show.
    pub expand_all: bool,

    /// Under `RootAsync`, open the fetched root nodes right away.
    pub expand_for_root_async_root: bool,

    /// Node ids whose ancestors are opened on first load (`Async` only).
    pub preselected_keys: Vec<String>,

    /// Separator between ids in materialized paths.
    ///
    /// Default: `/`
    pub path_separator: char,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            load_mode: LoadMode::default(),
            load_operation: LoadOperation::default(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            is_first_load: false,
            expand_all: false,
            expand_for_root_async_root: false,
            preselected_keys: Vec::new(),
            path_separator: DEFAULT_PATH_SEPARATOR,
        }
    }
}

impl EngineConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load mode.
    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    /// Sets the load operation.
    pub fn with_operation(mut self, operation: LoadOperation) -> Self {
        self.load_operation = operation;
        self
    }

    /// Sets the maximum page size.
    pub fn with_max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Marks this as the first load.
    pub fn first_load(mut self, first: bool) -> Self {
        self.is_first_load = first;
        self
    }

    /// Enables or disables expand-all.
    pub fn expand_all(mut self, enabled: bool) -> Self {
        self.expand_all = enabled;
        self
    }

    /// Enables or disables opening root nodes under `RootAsync`.
    pub fn expand_for_root_async_root(mut self, enabled: bool) -> Self {
        self.expand_for_root_async_root = enabled;
        self
    }

    /// Sets the keys to open on first load.
    pub fn with_preselected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preselected_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the path separator.
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }
}
