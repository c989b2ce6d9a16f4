//! Statement store with multiple synchronized indexes
//!
//! A [`Model`] keeps one set of statements under every index order its
//! flags select. All indexes always hold the same statements; the first
//! one is canonical and answers duplicate checks and exact lookups, while
//! pattern queries pick whichever index pins the most leading fields.
//!
//! A model and its iterators share state through `Rc<RefCell<_>>`, so they
//! stay on one thread. Every mutation bumps a generation counter that
//! outstanding iterators check before each use.

mod flags;
mod index;
mod iter;

pub use flags::ModelFlags;
pub use index::IndexOrder;
pub use iter::{Iter, Range};

use crate::error::{TrellisError, TrellisResult};
use crate::node::Node;
use crate::statement::{Field, Statement};
use crate::world::World;
use index::{Index, Pattern};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub(crate) struct Store {
    world: Arc<World>,
    flags: ModelFlags,
    indexes: Vec<Index>,
    generation: u64,
}

impl Store {
    fn size(&self) -> usize {
        let size = self.indexes[0].len();
        debug_assert!(
            self.indexes.iter().all(|index| index.len() == size),
            "index sizes diverged"
        );
        size
    }

    /// Pick the index whose leading fields are most pinned by `pattern`
    ///
    /// Ties go to the earliest index, so the canonical index wins when no
    /// other index does better.
    fn select(&self, pattern: &Pattern) -> (usize, usize) {
        let mut best = (0, self.indexes[0].order().prefix_len(pattern));
        for (slot, index) in self.indexes.iter().enumerate().skip(1) {
            let len = index.order().prefix_len(pattern);
            if len > best.1 {
                best = (slot, len);
            }
        }
        tracing::debug!(
            index = %self.indexes[best.0].order(),
            prefix_len = best.1,
            "selected index"
        );
        best
    }

    fn remove(&mut self, statement: &Statement) {
        for index in &mut self.indexes {
            index.remove(statement);
        }
        self.generation += 1;
    }
}

/// An indexed set of statements
pub struct Model {
    store: Rc<RefCell<Store>>,
}

impl Model {
    /// Create an empty model; `flags` must enable at least one index
    pub fn new(world: Arc<World>, flags: ModelFlags) -> TrellisResult<Self> {
        let orders = flags.index_orders();
        if orders.is_empty() {
            return Err(TrellisError::bad_arg("model needs at least one index"));
        }
        tracing::debug!(
            indexes = ?orders.iter().map(IndexOrder::name).collect::<Vec<_>>(),
            store_cursors = flags.contains(ModelFlags::STORE_CURSORS),
            "created model"
        );
        let store = Store {
            world,
            flags,
            indexes: orders.into_iter().map(Index::new).collect(),
            generation: 0,
        };
        Ok(Self {
            store: Rc::new(RefCell::new(store)),
        })
    }

    pub fn world(&self) -> Arc<World> {
        Arc::clone(&self.store.borrow().world)
    }

    pub fn flags(&self) -> ModelFlags {
        self.store.borrow().flags
    }

    /// Active index orders, canonical first
    pub fn index_orders(&self) -> Vec<IndexOrder> {
        self.store.borrow().indexes.iter().map(Index::order).collect()
    }

    /// Number of statements
    pub fn size(&self) -> usize {
        self.store.borrow().size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // === Mutation ===

    /// Insert a statement into every index.
    ///
    /// Returns `Ok(false)` if the model already contains it.
    pub fn insert(&mut self, statement: &Statement) -> TrellisResult<bool> {
        let mut store = self.store.borrow_mut();
        let world = Arc::clone(&store.world);
        let mut statement = statement.map_nodes(|node| Ok(world.intern(node)))?;
        if !store.flags.contains(ModelFlags::STORE_CURSORS) {
            statement = statement.without_cursor();
        }
        if store.indexes[0].contains(&statement) {
            return Ok(false);
        }

        tracing::trace!(statement = %statement, "insert");
        let statement = Arc::new(statement);
        for index in &mut store.indexes {
            index.insert(Arc::clone(&statement));
        }
        store.generation += 1;
        Ok(true)
    }

    /// Build a statement from its nodes and insert it
    pub fn add(
        &mut self,
        subject: &Node,
        predicate: &Node,
        object: &Node,
        graph: Option<&Node>,
    ) -> TrellisResult<bool> {
        let statement = Statement::new(
            subject.clone(),
            predicate.clone(),
            object.clone(),
            graph.cloned(),
        )?;
        self.insert(&statement)
    }

    /// Erase the statement at `iter`.
    ///
    /// Returns an iterator at the next statement in the same range. Every
    /// other outstanding iterator becomes stale.
    ///
    /// Nodes interned for the statement stay in the [`World`] until
    /// [`World::collect_garbage`] is called.
    pub fn erase(&mut self, iter: Iter) -> TrellisResult<Iter> {
        if !iter.belongs_to(&self.store) {
            return Err(TrellisError::bad_arg("iterator belongs to another model"));
        }
        let statement = iter.get()?;
        let (slot, position, pattern, prefix_len) = iter.parts();
        let key = position.cloned().ok_or(TrellisError::BadIter)?;

        let next = {
            let mut store = self.store.borrow_mut();
            tracing::trace!(statement = %statement, "erase");
            store.remove(&statement);
            store.indexes[slot].successor(&key, pattern, prefix_len)
        };
        Ok(Iter::new(
            Rc::clone(&self.store),
            slot,
            next,
            pattern.clone(),
            prefix_len,
        ))
    }

    /// Remove a statement if present; returns whether it was found.
    ///
    /// As with [`Model::erase`], the world keeps its nodes until collected.
    pub fn remove(&mut self, statement: &Statement) -> TrellisResult<bool> {
        let found = self.find(
            Some(statement.subject()),
            Some(statement.predicate()),
            Some(statement.object()),
            statement.graph(),
        )?;
        if found.is_end() {
            return Ok(false);
        }
        self.erase(found)?;
        Ok(true)
    }

    // === Queries ===

    fn iter_at(&self, slot: usize, position: Option<index::Key>, pattern: Pattern, prefix_len: usize) -> Iter {
        Iter::new(Rc::clone(&self.store), slot, position, pattern, prefix_len)
    }

    /// Iterator at the first statement in canonical order
    pub fn begin(&self) -> Iter {
        let position = self.store.borrow().indexes[0].seek(&Pattern::default(), 0);
        self.iter_at(0, position, Pattern::default(), 0)
    }

    /// The end iterator
    pub fn end(&self) -> Iter {
        self.iter_at(0, None, Pattern::default(), 0)
    }

    /// Range over every statement in canonical order
    pub fn all(&self) -> Range {
        Range::new(self.begin())
    }

    /// Iterator at exactly the given statement, or the end iterator.
    ///
    /// Unlike [`Model::range`], a `None` graph here means "no graph", so a
    /// statement in a named graph is never found without naming its graph.
    /// The subject, predicate and object must all be given.
    pub fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> TrellisResult<Iter> {
        let (Some(s), Some(p), Some(o)) = (subject, predicate, object) else {
            return Err(TrellisError::bad_arg("find needs subject, predicate and object"));
        };
        let target = Statement::new(s.clone(), p.clone(), o.clone(), graph.cloned())?;
        let position = {
            let store = self.store.borrow();
            let key = store.indexes[0].order().key(&target);
            store.indexes[0].get(&key).map(|_| key)
        };
        Ok(self.iter_at(0, position, Pattern::default(), 0))
    }

    /// Statements matching a pattern; `None` fields, including the graph, match anything
    pub fn range(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> Range {
        let pattern = Pattern::new(subject, predicate, object, graph);
        let (slot, prefix_len, position) = {
            let store = self.store.borrow();
            let (slot, prefix_len) = store.select(&pattern);
            (slot, prefix_len, store.indexes[slot].seek(&pattern, prefix_len))
        };
        Range::new(self.iter_at(slot, position, pattern, prefix_len))
    }

    /// The first statement matching a pattern
    pub fn get_statement(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> TrellisResult<Option<Statement>> {
        self.range(subject, predicate, object, graph).front()
    }

    /// The value of the one missing field in the first matching statement.
    ///
    /// Exactly one of subject, predicate and object may be `None`; the graph
    /// then acts as a filter (or wildcard if `None`). With all three given
    /// and no graph, the graph of the first matching quad is returned.
    pub fn get(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> TrellisResult<Option<Node>> {
        let missing: Vec<Field> = [Field::Subject, Field::Predicate, Field::Object]
            .into_iter()
            .zip([subject, predicate, object])
            .filter(|(_, node)| node.is_none())
            .map(|(field, _)| field)
            .collect();

        let wanted = match (missing.as_slice(), graph) {
            ([field], _) => *field,
            ([], None) => Field::Graph,
            _ => {
                return Err(TrellisError::bad_arg(
                    "get needs exactly one unspecified field",
                ))
            }
        };

        for statement in self.range(subject, predicate, object, graph) {
            if let Some(node) = statement?.node(wanted) {
                return Ok(Some(node.clone()));
            }
        }
        Ok(None)
    }

    /// True if any statement matches the pattern
    pub fn ask(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> bool {
        !self.range(subject, predicate, object, graph).is_empty()
    }

    /// Number of statements matching the pattern
    pub fn count(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Node>,
        object: Option<&Node>,
        graph: Option<&Node>,
    ) -> TrellisResult<usize> {
        let mut count = 0;
        for statement in self.range(subject, predicate, object, graph) {
            statement?;
            count += 1;
        }
        Ok(count)
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Model")
            .field("flags", &store.flags)
            .field("size", &store.size())
            .field("generation", &store.generation)
            .finish()
    }
}
