//! Tree engine
//!
//! Runs one load operation end to end:
//!
//! 1. reject contract violations before any I/O
//! 2. normalize the query ([`init_query`])
//! 3. fetch one bounded page ([`Plan`] decides the scope)
//! 4. backfill missing ancestors and open preselected paths (`Query` only)
//! 5. hand the page to a [`ResultConverter`]

mod backfill;
mod config;
mod execute;
mod init;
mod policy;

pub use backfill::backfill;
pub use backfill::expand_preselected;
pub use backfill::missing_ancestors;
pub use config::*;
pub use execute::bound_query;
pub use init::init_query;
pub use policy::Plan;

use std::sync::Arc;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::convert::FlatConverter;
use crate::convert::NestedConverter;
use crate::convert::ResultConverter;
use crate::convert::TableResult;
use crate::convert::TreeResult;
use crate::error::ContractError;
use crate::error::Error;
use crate::hooks::NoHooks;
use crate::hooks::QueryHooks;
use crate::model::LoadMode;
use crate::model::LoadOperation;
use crate::model::Page;
use crate::model::QueryParameter;
use crate::service::TreeQueryService;
use crate::tree::ShapeContext;

/// Shapes paginated node fetches into trees under a fixed load policy.
///
/// An engine is built for one kind of operation and holds only read-only
/// configuration, so it is cheap to clone (uses `Arc` internally) and safe
/// to share across concurrent runs.
///
/// # Example
///
/// ```ignore
/// use treeshape_lib::engine::{EngineConfig, TreeEngine};
/// use treeshape_lib::model::{LoadMode, LoadOperation, QueryParameter};
///
/// let engine = TreeEngine::builder()
///     .service(my_service)
///     .config(EngineConfig::default().with_load_mode(LoadMode::Async))
///     .build()?;
///
/// let mut query = QueryParameter::new();
/// let tree = engine.tree(&mut query, &CancellationToken::new()).await?;
/// ```
#[derive(Clone)]
pub struct TreeEngine {
    inner: Arc<TreeEngineInner>,
}

struct TreeEngineInner {
    service: Arc<dyn TreeQueryService>,
    hooks: Arc<dyn QueryHooks>,
    config: EngineConfig,
    plan: Plan,
}

impl std::fmt::Debug for TreeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeEngine")
            .field("config", &self.inner.config)
            .field("plan", &self.inner.plan)
            .finish_non_exhaustive()
    }
}

impl TreeEngine {
    /// Creates a new builder for constructing an engine.
    pub fn builder() -> TreeEngineBuilder<Missing> {
        TreeEngineBuilder::new()
    }

    /// Returns the captured configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Returns the plan selected for this engine's mode and operation.
    pub fn plan(&self) -> Plan {
        self.inner.plan
    }

    /// Returns the context converters receive from this engine.
    pub fn shape_context(&self) -> ShapeContext {
        let config = &self.inner.config;
        let plan = self.inner.plan;
        plan.shape_context(config.load_mode)
            .with_expand_all(config.expand_all)
            .with_expand_roots(
                config.expand_for_root_async_root
                    && config.load_mode == LoadMode::RootAsync
                    && plan == Plan::RootLevel,
            )
    }

    /// Runs the fetch pipeline and returns the page before shaping.
    ///
    /// `query` is normalized in place. A `LoadChildren` engine rejects a
    /// query without a parent id before contacting the service.
    pub async fn fetch(&self, query: &mut QueryParameter, cancel: &CancellationToken) -> Result<Page, Error> {
        let config = &self.inner.config;
        let plan = self.inner.plan;
        let service = self.inner.service.as_ref();

        if plan.operation() == LoadOperation::LoadChildren && query.parent_key().is_none() {
            return Err(ContractError::MissingParentId.into());
        }

        debug!("Running {:?} plan under {:?}", plan, config.load_mode);
        init_query(query, plan.operation());

        let mut page = execute::execute(
            service,
            self.inner.hooks.as_ref(),
            plan,
            config.max_page_size,
            query,
            cancel,
        )
        .await?;

        if plan.backfills() {
            backfill(service, &mut page, config.path_separator, cancel).await?;
        }

        if plan == Plan::RootLevel && config.load_mode == LoadMode::Async && config.is_first_load {
            expand_preselected(
                service,
                &mut page,
                &config.preselected_keys,
                config.path_separator,
                cancel,
            )
            .await?;
        }

        self.inner.hooks.after_fetch(&mut page, query);
        Ok(page)
    }

    /// Runs the pipeline and shapes the page with `converter`.
    pub async fn run<C: ResultConverter>(
        &self,
        query: &mut QueryParameter,
        converter: &C,
        cancel: &CancellationToken,
    ) -> Result<C::Output, Error> {
        let page = self.fetch(query, cancel).await?;
        converter.to_result(page, &self.shape_context())
    }

    /// Runs the pipeline and returns a nested tree.
    pub async fn tree(&self, query: &mut QueryParameter, cancel: &CancellationToken) -> Result<TreeResult, Error> {
        self.run(query, &NestedConverter, cancel).await
    }

    /// Runs the pipeline and returns flat, depth-first rows.
    pub async fn table(&self, query: &mut QueryParameter, cancel: &CancellationToken) -> Result<TableResult, Error> {
        self.run(query, &FlatConverter, cancel).await
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`TreeEngine`].
///
/// The query service is required and enforced at compile time. Everything
/// else defaults: [`EngineConfig::default`] and [`NoHooks`].
pub struct TreeEngineBuilder<Service> {
    service: Service,
    hooks: Arc<dyn QueryHooks>,
    config: EngineConfig,
}

impl TreeEngineBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            service: Missing,
            hooks: Arc::new(NoHooks),
            config: EngineConfig::default(),
        }
    }

    /// Sets the query service.
    pub fn service<T: TreeQueryService + 'static>(
        self,
        service: T,
    ) -> TreeEngineBuilder<Set<Arc<dyn TreeQueryService>>> {
        self.shared_service(Arc::new(service))
    }

    /// Sets a query service that is shared with other owners.
    pub fn shared_service(self, service: Arc<dyn TreeQueryService>) -> TreeEngineBuilder<Set<Arc<dyn TreeQueryService>>> {
        TreeEngineBuilder {
            service: Set(service),
            hooks: self.hooks,
            config: self.config,
        }
    }
}

impl Default for TreeEngineBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TreeEngineBuilder<S> {
    /// Replaces the whole configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the load mode.
    pub fn load_mode(mut self, mode: LoadMode) -> Self {
        self.config.load_mode = mode;
        self
    }

    /// Sets the load operation.
    pub fn operation(mut self, operation: LoadOperation) -> Self {
        self.config.load_operation = operation;
        self
    }

    /// Sets the maximum page size.
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.config.max_page_size = size;
        self
    }

    /// Sets the hooks called around the fetch.
    pub fn hooks<H: QueryHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }
}

impl TreeEngineBuilder<Set<Arc<dyn TreeQueryService>>> {
    /// Builds the [`TreeEngine`].
    ///
    /// Selects the load plan once and rejects configurations that can never
    /// run: `LoadChildren` under `Sync`, or a zero maximum page size.
    pub fn build(self) -> Result<TreeEngine, Error> {
        if self.config.max_page_size == 0 {
            return Err(ContractError::InvalidPageSize.into());
        }
        let plan = Plan::select(self.config.load_mode, self.config.load_operation)?;

        Ok(TreeEngine {
            inner: Arc::new(TreeEngineInner {
                service: self.service.0,
                hooks: self.hooks,
                config: self.config,
                plan,
            }),
        })
    }
}
