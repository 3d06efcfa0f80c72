//! Shared fixtures for engine tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Once;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use simplelog::{Config, LevelFilter, TestLogger};
use tokio_util::sync::CancellationToken;
use treeshape_lib::error::ServiceError;
use treeshape_lib::model::{Node, Page, QueryParameter};
use treeshape_lib::service::{InMemoryTreeService, TreeQueryService};

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        let _ = TestLogger::init(LevelFilter::Trace, Config::default());
    });
}

fn node(id: &str, parent: &str, level: i32, sort_id: i64, path: &str) -> Node {
    Node::new(id)
        .with_parent(parent)
        .with_level(level)
        .with_sort_id(sort_id)
        .with_path(path)
        .with_label(format!("Node {id}"))
}

/// Two top-level branches:
///
/// ```text
/// 1
/// ├── 3
/// │   └── 6 (hidden)
/// └── 2
///     └── 5
/// 4
/// └── 7
///     └── 8
///         └── 9
/// ```
pub fn org_chart() -> Vec<Node> {
    vec![
        node("1", "", 1, 1, "/1/"),
        node("2", "1", 2, 2, "/1/2/"),
        node("3", "1", 2, 1, "/1/3/"),
        node("4", "", 1, 2, "/4/"),
        node("5", "2", 3, 1, "/1/2/5/"),
        node("6", "3", 3, 1, "/1/3/6/").hidden(true),
        node("7", "4", 2, 1, "/4/7/"),
        node("8", "7", 3, 1, "/4/7/8/"),
        node("9", "8", 4, 1, "/4/7/8/9/"),
    ]
}

pub fn ids(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

#[derive(Debug, thiserror::Error)]
#[error("backend unavailable: {0}")]
pub struct Backend(pub String);

/// Wraps an in-memory service, counting calls and recording dispatched queries.
#[derive(Default)]
pub struct RecordingService {
    inner: InMemoryTreeService,
    pub fetches: AtomicUsize,
    pub lookups: AtomicUsize,
    pub child_lookups: AtomicUsize,
    pub queries: Mutex<Vec<QueryParameter>>,
    pub fail_fetch: Option<String>,
    pub fail_lookup: Option<String>,
}

impl RecordingService {
    pub fn new(nodes: Vec<Node>) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryTreeService::from_nodes(nodes),
            ..Default::default()
        })
    }

    /// Every call fails.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryTreeService::from_nodes(org_chart()),
            fail_fetch: Some(message.to_string()),
            fail_lookup: Some(message.to_string()),
            ..Default::default()
        })
    }

    /// Page fetches work, id and parent lookups fail.
    pub fn failing_lookups(message: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryTreeService::from_nodes(org_chart()),
            fail_lookup: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
            + self.lookups.load(Ordering::SeqCst)
            + self.child_lookups.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<QueryParameter> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn check(failure: &Option<String>) -> Result<(), ServiceError> {
        match failure {
            Some(message) => Err(Box::new(Backend(message.clone()))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TreeQueryService for RecordingService {
    async fn fetch_page(&self, query: &QueryParameter, cancel: &CancellationToken) -> Result<Page, ServiceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        Self::check(&self.fail_fetch)?;
        self.inner.fetch_page(query, cancel).await
    }

    async fn get_by_ids(&self, ids: &[String], cancel: &CancellationToken) -> Result<Vec<Node>, ServiceError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_lookup)?;
        self.inner.get_by_ids(ids, cancel).await
    }

    async fn get_by_parent_ids(
        &self,
        parent_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Node>, ServiceError> {
        self.child_lookups.fetch_add(1, Ordering::SeqCst);
        Self::check(&self.fail_lookup)?;
        self.inner.get_by_parent_ids(parent_ids, cancel).await
    }
}
