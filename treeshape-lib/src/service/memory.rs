//! In-memory query service backed by DashMap

use std::cmp::Ordering;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering as AtomicOrdering;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use super::TreeQueryService;
use crate::error::ServiceError;
use crate::model::DEFAULT_PATH_SEPARATOR;
use crate::model::Direction;
use crate::model::Node;
use crate::model::NodePath;
use crate::model::OrderBy;
use crate::model::Page;
use crate::model::QueryParameter;

/// A [`TreeQueryService`] over nodes held in a concurrent hash map.
///
/// Useful for fixtures and small, fully-loaded hierarchies. Without an
/// explicit order, nodes come back in insertion order.
///
/// Orderable fields are `SortId`, `Level`, `Id`, `ParentId` and `Path`;
/// other field names are ignored.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::Node;
/// use treeshape_lib::service::InMemoryTreeService;
///
/// let service = InMemoryTreeService::from_nodes([
///     Node::new("1").with_level(1),
///     Node::new("2").with_parent("1").with_level(2),
/// ]);
/// assert_eq!(service.len(), 2);
/// ```
#[derive(Debug)]
pub struct InMemoryTreeService {
    store: DashMap<String, (u64, Node)>,
    next_seq: AtomicU64,
    separator: char,
}

impl Default for InMemoryTreeService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTreeService {
    /// Creates an empty service.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
            next_seq: AtomicU64::new(0),
            separator: DEFAULT_PATH_SEPARATOR,
        }
    }

    /// Creates a service holding the given nodes.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let service = Self::new();
        service.extend(nodes);
        service
    }

    /// Sets the separator used when matching path-scoped fetches.
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Inserts or replaces a node, keeping its original position if replaced.
    pub fn insert(&self, node: Node) {
        let seq = match self.store.get(&node.id) {
            Some(existing) => existing.0,
            None => self.next_seq.fetch_add(1, AtomicOrdering::Relaxed),
        };
        self.store.insert(node.id.clone(), (seq, node));
    }

    /// Inserts every node.
    pub fn extend(&self, nodes: impl IntoIterator<Item = Node>) {
        for node in nodes {
            self.insert(node);
        }
    }

    /// Removes a node by id.
    pub fn remove(&self, id: &str) -> Option<Node> {
        self.store.remove(id).map(|(_, (_, node))| node)
    }

    /// Returns the number of stored nodes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if no nodes are stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn matches(&self, node: &Node, query: &QueryParameter) -> bool {
        if let Some(parent) = query.parent_key()
            && node.parent_key() != Some(parent)
        {
            return false;
        }
        if let Some(level) = query.level
            && node.level != Some(level)
        {
            return false;
        }
        if let Some(scope) = query.path.as_deref().filter(|p| !p.is_empty()) {
            let scope = NodePath::parse(scope, self.separator);
            let within = node
                .path
                .as_deref()
                .is_some_and(|p| scope.contains(&NodePath::parse(p, self.separator)));
            if !within {
                return false;
            }
        }
        true
    }

    /// Snapshot of stored nodes in insertion order.
    fn snapshot(&self) -> Vec<(u64, Node)> {
        let mut nodes: Vec<(u64, Node)> = self
            .store
            .iter()
            .map(|entry| (entry.value().0, entry.value().1.clone()))
            .collect();
        nodes.sort_by_key(|(seq, _)| *seq);
        nodes
    }
}

fn compare_field(a: &Node, b: &Node, field: &str) -> Ordering {
    // Unset values sort after set ones.
    fn opt<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    match field {
        "SortId" | "sortId" => opt(&a.sort_id, &b.sort_id),
        "Level" | "level" => opt(&a.level, &b.level),
        "Id" | "id" => a.id.cmp(&b.id),
        "ParentId" | "parentId" => opt(&a.parent_id, &b.parent_id),
        "Path" | "path" => opt(&a.path, &b.path),
        _ => Ordering::Equal,
    }
}

fn compare(a: &Node, b: &Node, order: &OrderBy) -> Ordering {
    order
        .fields()
        .iter()
        .map(|(field, direction)| match direction {
            Direction::Asc => compare_field(a, b, field),
            Direction::Desc => compare_field(a, b, field).reverse(),
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[async_trait]
impl TreeQueryService for InMemoryTreeService {
    async fn fetch_page(
        &self,
        query: &QueryParameter,
        _cancel: &CancellationToken,
    ) -> Result<Page, ServiceError> {
        let mut nodes: Vec<Node> = self
            .snapshot()
            .into_iter()
            .map(|(_, node)| node)
            .filter(|node| self.matches(node, query))
            .collect();

        if let Some(order) = &query.order {
            nodes.sort_by(|a, b| compare(a, b, order));
        }

        let total = nodes.len();
        let data = match query.page_size {
            Some(size) => {
                let page = query.page.unwrap_or(1).max(1);
                nodes.into_iter().skip((page - 1) * size).take(size).collect()
            }
            None => nodes,
        };

        Ok(Page::new(data, total))
    }

    async fn get_by_ids(&self, ids: &[String], _cancel: &CancellationToken) -> Result<Vec<Node>, ServiceError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.store.get(id).map(|entry| entry.value().1.clone()))
            .collect())
    }

    async fn get_by_parent_ids(
        &self,
        parent_ids: &[String],
        _cancel: &CancellationToken,
    ) -> Result<Vec<Node>, ServiceError> {
        Ok(self
            .snapshot()
            .into_iter()
            .map(|(_, node)| node)
            .filter(|node| {
                node.parent_key()
                    .is_some_and(|parent| parent_ids.iter().any(|id| id == parent))
            })
            .collect())
    }
}
