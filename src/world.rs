//! Shared registry of interned nodes and blank node identifiers
//!
//! A [`World`] is shared between models by `Arc` and may be used from any
//! thread. It owns the counter that issues fresh blank node labels and the
//! interner that lets models hold one allocation per distinct node.

use crate::error::{Status, TrellisError};
use crate::node::{Node, NodeType};
use crate::vocab::{rdf, xsd};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};

/// Prefix of labels issued by [`World::get_blank`]
pub const BLANK_PREFIX: char = 'b';

/// Well-known URIs interned for the lifetime of every world
const PREINTERNED: &[&str] = &[
    rdf::FIRST,
    rdf::REST,
    rdf::NIL,
    rdf::TYPE,
    xsd::BOOLEAN,
    xsd::DECIMAL,
    xsd::INTEGER,
];

/// Node interner and blank id source
pub struct World {
    nodes: DashMap<Node, ()>,
    /// Holds the pre-interned nodes so garbage collection never drops them
    pinned: Vec<Node>,
    next_blank_id: AtomicU32,
}

impl World {
    pub fn new() -> Self {
        let nodes = DashMap::new();
        let pinned: Vec<Node> = PREINTERNED
            .iter()
            .map(|iri| Node::build(NodeType::Uri, *iri, None, None))
            .collect();
        for node in &pinned {
            nodes.insert(node.clone(), ());
        }
        Self {
            nodes,
            pinned,
            next_blank_id: AtomicU32::new(1),
        }
    }

    /// Issue a fresh blank node (`b1`, `b2`, ...)
    pub fn get_blank(&self) -> Node {
        let id = self.next_blank_id.fetch_add(1, Ordering::Relaxed);
        Node::build(NodeType::Blank, format!("{}{}", BLANK_PREFIX, id), None, None)
    }

    /// The most recently issued blank id, or 0 if none has been issued
    pub fn last_blank_id(&self) -> u32 {
        self.next_blank_id.load(Ordering::Relaxed).saturating_sub(1)
    }

    /// Return the shared instance equal to `node`, interning it if new
    pub fn intern(&self, node: &Node) -> Node {
        if let Some(entry) = self.nodes.get(node) {
            return entry.key().clone();
        }
        // Literal datatypes are shared as well
        let node = match node.datatype() {
            Some(dt) => Node::build(NodeType::Literal, node.as_str(), Some(self.intern(dt)), None),
            None => node.clone(),
        };
        self.nodes.entry(node).or_insert(()).key().clone()
    }

    /// Number of distinct interned nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drop interned nodes that nothing outside the world refers to.
    ///
    /// Returns the number of nodes released.
    pub fn collect_garbage(&self) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|node, _| node.ref_count() > 1);
        let released = before - self.nodes.len();
        tracing::debug!(released, remaining = self.nodes.len(), "collected unused nodes");
        released
    }

    /// Log an error and return the status it maps to
    pub fn report(&self, error: &TrellisError) -> Status {
        let status = error.status();
        tracing::error!(status = status.code(), "{}", error);
        status
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("nodes", &self.nodes.len())
            .field("pinned", &self.pinned.len())
            .field("last_blank_id", &self.last_blank_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_blank_ids_are_sequential() {
        let world = World::new();
        assert_eq!(world.last_blank_id(), 0);
        assert_eq!(world.get_blank().as_str(), "b1");
        assert_eq!(world.get_blank().as_str(), "b2");
        assert_eq!(world.last_blank_id(), 2);
    }

    #[test]
    fn test_blank_ids_unique_across_threads() {
        let world = Arc::new(World::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let world = Arc::clone(&world);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| world.get_blank().as_str().to_string())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut labels: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 200);
    }

    #[test]
    fn test_intern_shares_storage() {
        let world = World::new();
        let a = world.intern(&Node::uri("http://example.org/a").unwrap());
        let b = world.intern(&Node::uri("http://example.org/a").unwrap());
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn test_intern_shares_literal_datatypes() {
        let world = World::new();
        let x = world.intern(&Node::integer(1, None));
        let y = world.intern(&Node::integer(2, None));
        assert!(x.datatype().unwrap().ptr_eq(y.datatype().unwrap()));
    }

    #[test]
    fn test_preinterned_nodes() {
        let world = World::new();
        assert_eq!(world.node_count(), PREINTERNED.len());
        let first = world.intern(&Node::uri(rdf::FIRST).unwrap());
        assert_eq!(world.node_count(), PREINTERNED.len());
        assert_eq!(first.as_str(), rdf::FIRST);
    }

    #[test]
    fn test_collect_garbage_keeps_live_nodes() {
        let world = World::new();
        let kept = world.intern(&Node::uri("http://example.org/kept").unwrap());
        world.intern(&Node::uri("http://example.org/dropped").unwrap());

        assert_eq!(world.collect_garbage(), 1);
        assert_eq!(world.node_count(), PREINTERNED.len() + 1);
        assert!(world.intern(&Node::uri(kept.as_str()).unwrap()).ptr_eq(&kept));
    }

    #[test]
    fn test_report_returns_status() {
        let world = World::new();
        assert_eq!(world.report(&TrellisError::BadIter), Status::ErrBadIter);
    }
}
