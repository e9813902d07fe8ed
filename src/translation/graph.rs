/*!
 * Translator dependency graph resolution.
 *
 * Builds a directed graph (dependent -> dependency) over translator ids and
 * produces the initialization order: ascending dependency rank, where
 * sources have rank 0 and every other node ranks one above its deepest
 * dependency. Validation covers dangling edges and cycles; cycle
 * diagnostics report one group per non-trivial strongly-connected
 * component, listing each member's in-group dependencies.
 */

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::debug;

use crate::class_ref::TranslatorId;
use crate::errors::TranslatorError;

/// Directed dependency graph over translator ids.
///
/// Duplicate node ids are rejected by the engine builder before nodes reach
/// this graph; resolution here validates edges and ordering.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    // node -> its declared dependencies
    deps: BTreeMap<TranslatorId, BTreeSet<TranslatorId>>,
}

impl DependencyGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_node(&mut self, id: TranslatorId, dependencies: BTreeSet<TranslatorId>) {
        self.deps.insert(id, dependencies);
    }

    /// Validate the graph and return the initialization order.
    ///
    /// Validation order: dangling edges first, then cycles. Ties among
    /// same-rank nodes are broken by id so the result is deterministic for
    /// a fixed input set.
    pub(crate) fn resolve(&self) -> Result<Vec<TranslatorId>, TranslatorError> {
        self.check_edges()?;
        let ranks = self.assign_ranks()?;

        let mut order: Vec<(usize, TranslatorId)> = ranks
            .iter()
            .map(|(id, rank)| (*rank, id.clone()))
            .collect();
        order.sort();
        let order: Vec<TranslatorId> = order.into_iter().map(|(_, id)| id).collect();
        debug!("resolved translator order: {:?}", order);
        Ok(order)
    }

    /// Every edge endpoint must be a registered node.
    fn check_edges(&self) -> Result<(), TranslatorError> {
        // missing id -> the dependents that declared it
        let mut missing: BTreeMap<&TranslatorId, BTreeSet<&TranslatorId>> = BTreeMap::new();
        for (dependent, dependencies) in &self.deps {
            for dependency in dependencies {
                if !self.deps.contains_key(dependency) {
                    missing.entry(dependency).or_default().insert(dependent);
                }
            }
        }
        if missing.is_empty() {
            return Ok(());
        }
        let details = missing
            .iter()
            .map(|(id, dependents)| {
                format!("{} required by [{}]", id, join_ids(dependents.iter().copied()))
            })
            .collect::<Vec<_>>()
            .join("; ");
        Err(TranslatorError::MissingTranslator { details })
    }

    /// Assign ranks bottom-up; nodes left unranked belong to or depend on
    /// a cycle.
    fn assign_ranks(&self) -> Result<BTreeMap<TranslatorId, usize>, TranslatorError> {
        let mut ranks: BTreeMap<TranslatorId, usize> = BTreeMap::new();
        loop {
            let mut progressed = false;
            for (id, dependencies) in &self.deps {
                if ranks.contains_key(id) {
                    continue;
                }
                if dependencies.iter().all(|d| ranks.contains_key(d)) {
                    let rank = dependencies
                        .iter()
                        .map(|d| ranks[d] + 1)
                        .max()
                        .unwrap_or(0);
                    ranks.insert(id.clone(), rank);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }
        if ranks.len() == self.deps.len() {
            return Ok(ranks);
        }

        // Unranked nodes form the cyclic remainder; decompose it into
        // strongly-connected components for the diagnostic
        let unranked: BTreeSet<TranslatorId> = self
            .deps
            .keys()
            .filter(|id| !ranks.contains_key(*id))
            .cloned()
            .collect();
        let groups = self.cyclic_groups(&unranked);
        let details = groups
            .iter()
            .map(|group| {
                let members: BTreeSet<&TranslatorId> = group.iter().collect();
                let lines = group
                    .iter()
                    .map(|id| {
                        let in_group: Vec<&TranslatorId> = self.deps[id]
                            .iter()
                            .filter(|d| members.contains(d))
                            .collect();
                        format!("{} requires [{}]", id, join_ids(in_group.into_iter()))
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{{{}}}", lines)
            })
            .collect::<Vec<_>>()
            .join("; ");
        Err(TranslatorError::CircularTranslatorDependencies { details })
    }

    /// Non-trivial strongly-connected components of the subgraph induced by
    /// `nodes`, via iterative Tarjan. Components are returned sorted, each
    /// with sorted members.
    fn cyclic_groups(&self, nodes: &BTreeSet<TranslatorId>) -> Vec<Vec<TranslatorId>> {
        // Adjacency restricted to the subgraph
        let adjacency: HashMap<&TranslatorId, Vec<&TranslatorId>> = nodes
            .iter()
            .map(|id| {
                let neighbors: Vec<&TranslatorId> = self.deps[id]
                    .iter()
                    .filter(|d| nodes.contains(*d))
                    .collect();
                (id, neighbors)
            })
            .collect();

        let mut index: HashMap<&TranslatorId, usize> = HashMap::new();
        let mut lowlink: HashMap<&TranslatorId, usize> = HashMap::new();
        let mut on_stack: BTreeSet<&TranslatorId> = BTreeSet::new();
        let mut stack: Vec<&TranslatorId> = Vec::new();
        let mut next_index = 0usize;
        let mut components: Vec<Vec<TranslatorId>> = Vec::new();

        struct Frame<'a> {
            node: &'a TranslatorId,
            neighbor: usize,
        }

        for root in nodes {
            if index.contains_key(root) {
                continue;
            }
            let mut frames = vec![Frame { node: root, neighbor: 0 }];
            index.insert(root, next_index);
            lowlink.insert(root, next_index);
            next_index += 1;
            stack.push(root);
            on_stack.insert(root);

            while let Some(frame) = frames.last_mut() {
                let node = frame.node;
                let neighbor = frame.neighbor;
                frame.neighbor += 1;
                if let Some(&next) = adjacency[node].get(neighbor) {
                    if !index.contains_key(next) {
                        index.insert(next, next_index);
                        lowlink.insert(next, next_index);
                        next_index += 1;
                        stack.push(next);
                        on_stack.insert(next);
                        frames.push(Frame { node: next, neighbor: 0 });
                    } else if on_stack.contains(next) {
                        let candidate = index[next];
                        if let Some(low) = lowlink.get_mut(node) {
                            if candidate < *low {
                                *low = candidate;
                            }
                        }
                    }
                } else {
                    frames.pop();
                    let low = lowlink[node];
                    if let Some(parent) = frames.last() {
                        let parent_node = parent.node;
                        if let Some(parent_low) = lowlink.get_mut(parent_node) {
                            if low < *parent_low {
                                *parent_low = low;
                            }
                        }
                    }
                    if low == index[node] {
                        // Pop the component rooted here
                        let mut component = Vec::new();
                        while let Some(member) = stack.pop() {
                            on_stack.remove(member);
                            component.push(member.clone());
                            if member == node {
                                break;
                            }
                        }
                        if component.len() > 1 || self.deps[node].contains(node) {
                            component.sort();
                            components.push(component);
                        }
                    }
                }
            }
        }
        components.sort();
        components
    }
}

fn join_ids<'a>(ids: impl Iterator<Item = &'a TranslatorId>) -> String {
    ids.map(|id| id.as_str().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
