//! Trellis: an indexed RDF statement store
//!
//! Trellis holds RDF statements (triples with an optional graph) under
//! several field orders at once, so any pattern query can scan a narrow,
//! contiguous slice of one index.
//!
//! # Core Concepts
//!
//! - **Nodes**: literals, URIs, CURIEs, blank nodes and variables, with
//!   canonical lexical forms for numbers, booleans and binary data
//! - **World**: shared node interner and blank node id source
//! - **Model**: the statement set and its indexes; ranges over a model are
//!   invalidated, not corrupted, by mutation
//! - **Env**: base URI and prefixes for CURIE expansion
//! - **Sink**: the streaming interface readers and writers connect through
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::{Model, ModelFlags, Node, World};
//!
//! let world = Arc::new(World::new());
//! let mut model = Model::new(world, ModelFlags::INDEX_SPO | ModelFlags::INDEX_POS).unwrap();
//!
//! let alice = Node::uri("http://example.org/alice").unwrap();
//! let age = Node::uri("http://example.org/age").unwrap();
//! model.add(&alice, &age, &Node::integer(42, None), None).unwrap();
//!
//! let found = model.get(Some(&alice), Some(&age), None, None).unwrap();
//! assert_eq!(found.unwrap().as_str(), "42");
//! ```

mod config;
mod env;
mod error;
pub mod model;
pub mod node;
pub mod sink;
mod statement;
pub mod vocab;
mod world;

pub use config::ModelConfig;
pub use env::Env;
pub use error::{Status, TrellisError, TrellisResult};
pub use model::{IndexOrder, Iter, Model, ModelFlags, Range};
pub use node::{Node, NodeFlags, NodeType};
pub use sink::{CollectSink, Inserter, Sink, StatementFlags, Syntax};
pub use statement::{Cursor, Field, Statement};
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
