//! Iterators and ranges over a model's indexes
//!
//! An [`Iter`] is a position in one index. It shares the model's store and
//! remembers the store generation it was created at; once the model is
//! mutated, dereferencing or advancing it fails with
//! [`TrellisError::BadIter`] instead of reading a stale position.

use super::index::{Key, Pattern};
use super::Store;
use crate::error::{TrellisError, TrellisResult};
use crate::sink::{Sink, StatementFlags};
use crate::statement::Statement;
use std::cell::RefCell;
use std::rc::Rc;

/// A position in a model index
#[derive(Clone)]
pub struct Iter {
    store: Rc<RefCell<Store>>,
    slot: usize,
    position: Option<Key>,
    generation: u64,
    pattern: Pattern,
    prefix_len: usize,
}

impl Iter {
    pub(crate) fn new(
        store: Rc<RefCell<Store>>,
        slot: usize,
        position: Option<Key>,
        pattern: Pattern,
        prefix_len: usize,
    ) -> Self {
        let generation = store.borrow().generation;
        Self {
            store,
            slot,
            position,
            generation,
            pattern,
            prefix_len,
        }
    }

    /// True if this is the end position
    pub fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// True if the model has changed since this iterator was created
    pub fn is_stale(&self) -> bool {
        self.store.borrow().generation != self.generation
    }

    fn check(&self) -> TrellisResult<()> {
        if self.is_stale() {
            Err(TrellisError::BadIter)
        } else {
            Ok(())
        }
    }

    /// The statement at this position
    pub fn get(&self) -> TrellisResult<Statement> {
        self.check()?;
        let key = self.position.as_ref().ok_or(TrellisError::BadIter)?;
        let store = self.store.borrow();
        store.indexes[self.slot]
            .get(key)
            .map(|statement| Statement::clone(statement))
            .ok_or_else(|| TrellisError::Internal("iterator key missing from index".into()))
    }

    /// Move to the next matching statement, or to the end
    pub fn advance(&mut self) -> TrellisResult<()> {
        self.check()?;
        if let Some(key) = self.position.take() {
            let store = self.store.borrow();
            self.position = store.indexes[self.slot].successor(&key, &self.pattern, self.prefix_len);
        }
        Ok(())
    }

    pub(crate) fn belongs_to(&self, store: &Rc<RefCell<Store>>) -> bool {
        Rc::ptr_eq(&self.store, store)
    }

    pub(crate) fn parts(&self) -> (usize, Option<&Key>, &Pattern, usize) {
        (self.slot, self.position.as_ref(), &self.pattern, self.prefix_len)
    }
}

impl PartialEq for Iter {
    fn eq(&self, other: &Self) -> bool {
        if !Rc::ptr_eq(&self.store, &other.store) {
            return false;
        }
        match (&self.position, &other.position) {
            (None, None) => true,
            (Some(a), Some(b)) => self.slot == other.slot && a == b,
            _ => false,
        }
    }
}

impl std::fmt::Debug for Iter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Iter")
            .field("slot", &self.slot)
            .field("position", &self.position)
            .field("generation", &self.generation)
            .finish()
    }
}

/// A lazy, forward sequence of the statements matching a pattern
///
/// Cloning a range gives an independent cursor over the same statements.
#[derive(Debug, Clone)]
pub struct Range {
    iter: Iter,
    failed: bool,
}

impl Range {
    pub(crate) fn new(iter: Iter) -> Self {
        Self {
            iter,
            failed: false,
        }
    }

    /// True if the range has no (remaining) statements
    pub fn is_empty(&self) -> bool {
        self.iter.is_end()
    }

    /// Position of the first remaining statement
    pub fn begin(&self) -> &Iter {
        &self.iter
    }

    /// First remaining statement, if any
    pub fn front(&self) -> TrellisResult<Option<Statement>> {
        if self.is_empty() {
            self.iter.check()?;
            return Ok(None);
        }
        self.iter.get().map(Some)
    }

    /// Stream every remaining statement into a sink, stopping at the first failure
    pub fn write_to(self, sink: &mut dyn Sink, flags: StatementFlags) -> TrellisResult<()> {
        for statement in self {
            sink.on_statement(flags, &statement?)?;
        }
        Ok(())
    }
}

impl Iterator for Range {
    type Item = TrellisResult<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.iter.is_end() {
            return None;
        }
        let item = self.iter.get().and_then(|statement| {
            self.iter.advance()?;
            Ok(statement)
        });
        self.failed = item.is_err();
        Some(item)
    }
}

impl std::iter::FusedIterator for Range {}
