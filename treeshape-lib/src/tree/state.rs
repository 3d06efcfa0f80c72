//! Leaf and expansion state

use std::collections::HashMap;
use std::collections::HashSet;

use log::trace;

use crate::model::LoadMode;
use crate::model::Node;

/// What a converter needs to know to derive node state.
///
/// Built by the engine from its load policy and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeContext {
    /// The engine's load mode.
    pub load_mode: LoadMode,
    /// The fetch holds only part of each subtree (one level, or the root level).
    pub partial: bool,
    /// The caller asked for every node to be expanded.
    pub expand_all: bool,
    /// Top-level nodes of the result should open immediately.
    pub expand_roots: bool,
}

impl ShapeContext {
    /// Context for a fetch that holds whole subtrees.
    pub fn complete(load_mode: LoadMode) -> Self {
        Self {
            load_mode,
            partial: false,
            expand_all: false,
            expand_roots: false,
        }
    }

    /// Context for a fetch that holds one level at a time.
    pub fn partial(load_mode: LoadMode) -> Self {
        Self {
            partial: true,
            ..Self::complete(load_mode)
        }
    }

    /// Sets the expand-all flag.
    pub fn with_expand_all(mut self, expand_all: bool) -> Self {
        self.expand_all = expand_all;
        self
    }

    /// Sets the expand-roots flag.
    pub fn with_expand_roots(mut self, expand_roots: bool) -> Self {
        self.expand_roots = expand_roots;
        self
    }

    /// Leaf status can only be known when whole subtrees are in hand.
    pub fn computes_leaves(&self) -> bool {
        !self.partial && self.load_mode != LoadMode::Async
    }
}

/// Marks a node as a leaf when none of its children in `nodes` is visible.
pub fn compute_leaves(nodes: &mut [Node]) {
    let visible = parents_with_visible_children(nodes);
    for node in nodes.iter_mut() {
        node.leaf = Some(!visible.contains(&node.id));
    }
}

/// Marks every node as a branch so the UI offers to expand it.
pub fn mark_unknown_leaves(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        node.leaf = Some(false);
    }
}

/// Expands every node.
pub fn expand_all(nodes: &mut [Node]) {
    for node in nodes.iter_mut() {
        node.expanded = Some(true);
    }
}

/// Expands nodes that have a visible child in `nodes`.
///
/// Does nothing when the set is a single level deep, i.e. no node's parent
/// is part of the set.
pub fn expand_branches(nodes: &mut [Node]) {
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let single_level = nodes
        .iter()
        .all(|node| node.parent_key().is_none_or(|parent| !ids.contains(parent)));
    if single_level {
        trace!("Skipping expansion of a single-level set of {} nodes", nodes.len());
        return;
    }

    let visible = parents_with_visible_children(nodes);
    for node in nodes.iter_mut() {
        if visible.contains(&node.id) {
            node.expanded = Some(true);
        }
    }
}

/// Expands the nodes whose parent is not part of the set.
pub fn expand_top_level(nodes: &mut [Node]) {
    let ids: HashSet<String> = nodes.iter().map(|node| node.id.clone()).collect();
    for node in nodes.iter_mut() {
        if node.parent_key().is_none_or(|parent| !ids.contains(parent)) {
            node.expanded = Some(true);
            node.leaf = Some(false);
        }
    }
}

/// Derives `leaf` and `expanded` for every node according to `context`.
pub fn apply_state(nodes: &mut [Node], context: &ShapeContext) {
    if context.computes_leaves() {
        compute_leaves(nodes);
    } else {
        mark_unknown_leaves(nodes);
    }

    if context.expand_all {
        if context.load_mode == LoadMode::Sync && !context.partial {
            expand_all(nodes);
        } else {
            expand_branches(nodes);
        }
    }

    if context.expand_roots {
        expand_top_level(nodes);
    }
}

fn parents_with_visible_children(nodes: &[Node]) -> HashSet<String> {
    let mut visible: HashMap<&str, bool> = HashMap::new();
    for node in nodes {
        if let Some(parent) = node.parent_key() {
            let entry = visible.entry(parent).or_insert(false);
            *entry |= !node.is_hidden();
        }
    }
    visible
        .into_iter()
        .filter(|(_, any_visible)| *any_visible)
        .map(|(parent, _)| parent.to_string())
        .collect()
}
