//! Common test utilities for trellis integration tests
//!
//! Helpers for building nodes in a fixed namespace and for populating small
//! models with a known shape.

#![allow(dead_code)]

use std::sync::Arc;
use trellis::{Model, ModelFlags, Node, Statement, World};

pub const NS: &str = "http://example.org/";

/// A URI in the test namespace
pub fn uri(local: &str) -> Node {
    Node::uri(&format!("{}{}", NS, local)).unwrap()
}

/// Every triple index plus graph-first variants
pub fn all_indexes() -> ModelFlags {
    ModelFlags::INDEX_SPO
        | ModelFlags::INDEX_SOP
        | ModelFlags::INDEX_OPS
        | ModelFlags::INDEX_OSP
        | ModelFlags::INDEX_PSO
        | ModelFlags::INDEX_POS
        | ModelFlags::INDEX_GRAPHS
}

pub fn new_model(flags: ModelFlags) -> Model {
    Model::new(Arc::new(World::new()), flags).unwrap()
}

pub fn quad(s: &str, p: &str, o: &str, g: Option<&str>) -> Statement {
    Statement::new(uri(s), uri(p), uri(o), g.map(uri)).unwrap()
}

/// A model of `n_subjects × n_predicates × n_objects` statements.
///
/// Subjects are `s0..`, predicates `p0..`, objects `o0..`; statements whose
/// indices sum to an odd number go in graph `g1`, the rest have no graph.
pub fn grid_model(flags: ModelFlags, n_subjects: usize, n_predicates: usize, n_objects: usize) -> Model {
    let mut model = new_model(flags);
    for s in 0..n_subjects {
        for p in 0..n_predicates {
            for o in 0..n_objects {
                let graph = ((s + p + o) % 2 == 1).then_some("g1");
                let st = quad(&format!("s{}", s), &format!("p{}", p), &format!("o{}", o), graph);
                model.insert(&st).unwrap();
            }
        }
    }
    model
}
